use tracing::debug;

use super::finance::{
    MONTHS_PER_YEAR, inflation_multiplier, monthly_rate, required_monthly_contribution,
};
use super::types::{PlanSnapshot, RateComparisonRow, RealEstateHoldings, ShortfallSummary};

/// Illustrative annual returns shown next to the configured active rate.
pub const ACTIVE_COMPARISON_RATES: [f64; 7] = [3.0, 4.0, 5.0, 6.0, 6.5, 7.0, 8.0];
/// Illustrative annual returns shown next to the configured index rate.
pub const INDEX_COMPARISON_RATES: [f64; 6] = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RealEstateTotals {
    lifetime: f64,
    retirement_phase: f64,
}

fn real_estate_totals(
    holdings: &RealEstateHoldings,
    current_age: u32,
    retirement_age: u32,
    final_age: u32,
) -> RealEstateTotals {
    let mut totals = RealEstateTotals::default();
    if !holdings.enabled {
        return totals;
    }

    for age in current_age..=final_age {
        let yearly = holdings.monthly_income_at(age) * holdings.months_per_year;
        totals.lifetime += yearly;
        if age >= retirement_age {
            totals.retirement_phase += yearly;
        }
    }
    totals
}

/// Lifetime retirement income against both lifestyle tiers, and the level
/// monthly contributions that close each gap by retirement.
pub fn retirement_shortfall(snapshot: &PlanSnapshot) -> ShortfallSummary {
    let profile = &snapshot.profile;
    let income = &snapshot.retirement_income;
    let targets = &snapshot.expense_targets;
    let rates = &snapshot.assumptions;

    let total_pension = income.pension_monthly * income.pension_months_per_year * income.pension_years;
    let retirement_bonus = income.effective_bonus();
    let real_estate = real_estate_totals(
        &snapshot.real_estate,
        profile.current_age,
        profile.retirement_age,
        profile.final_age,
    );
    let total_income = total_pension + retirement_bonus + real_estate.retirement_phase;

    let loan_end_age = snapshot.loan.end_age();
    let real_estate_start_age = snapshot
        .real_estate
        .earliest_start_age()
        .unwrap_or(loan_end_age);
    let real_estate_years = if snapshot.real_estate.enabled {
        profile.final_age.saturating_sub(real_estate_start_age)
    } else {
        0
    };

    let years_until_retirement = profile.years_to_retirement();
    let multiplier = inflation_multiplier(rates.inflation_rate, years_until_retirement as i32);

    let adjusted_min_retirement = targets.min_monthly * multiplier;
    let total_min_expenses = adjusted_min_retirement * targets.min_months_per_year * targets.min_years;
    let adjusted_comfortable_retirement = targets.comfortable_monthly * multiplier;
    let total_comfortable_expenses = adjusted_comfortable_retirement
        * targets.comfortable_months_per_year
        * targets.comfortable_years;

    let raw_min_shortfall = total_min_expenses - total_income;
    let raw_comfortable_shortfall = total_comfortable_expenses - total_income;
    let min_monthly_shortfall = monthly_spread(raw_min_shortfall, targets.min_years);
    let comfortable_monthly_shortfall =
        monthly_spread(raw_comfortable_shortfall, targets.comfortable_years);

    // The comfort bucket only funds the gap above the minimum tier.
    let min_shortfall = raw_min_shortfall.max(0.0);
    let comfort_diff_shortfall = (raw_comfortable_shortfall - raw_min_shortfall).max(0.0);

    let months = years_until_retirement.saturating_mul(MONTHS_PER_YEAR);
    let min_monthly_investment =
        required_monthly_contribution(min_shortfall, monthly_rate(rates.active_return), months);
    let comfort_diff_monthly_investment = required_monthly_contribution(
        comfort_diff_shortfall,
        monthly_rate(rates.index_return),
        months,
    );

    debug!(
        total_income,
        total_min_expenses,
        total_comfortable_expenses,
        min_monthly_investment,
        comfort_diff_monthly_investment,
        "retirement shortfall computed"
    );

    ShortfallSummary {
        total_pension,
        retirement_bonus,
        total_real_estate: real_estate.lifetime,
        retirement_real_estate_income: real_estate.retirement_phase,
        total_income,
        years_until_retirement,
        inflation_multiplier: multiplier,
        adjusted_min_retirement,
        adjusted_comfortable_retirement,
        total_min_expenses,
        total_comfortable_expenses,
        min_shortfall,
        comfortable_shortfall: raw_comfortable_shortfall.max(0.0),
        min_monthly_shortfall,
        comfortable_monthly_shortfall,
        comfort_diff_shortfall,
        min_monthly_investment,
        comfort_diff_monthly_investment,
        loan_end_age,
        real_estate_start_age,
        real_estate_years,
        active_rate_comparison: rate_comparison(
            &ACTIVE_COMPARISON_RATES,
            rates.active_return,
            min_shortfall,
            months,
        ),
        index_rate_comparison: rate_comparison(
            &INDEX_COMPARISON_RATES,
            rates.index_return,
            comfort_diff_shortfall,
            months,
        ),
    }
}

fn monthly_spread(shortfall: f64, years: f64) -> f64 {
    let months = years * MONTHS_PER_YEAR as f64;
    if shortfall > 0.0 && months > 0.0 {
        shortfall / months
    } else {
        0.0
    }
}

fn rate_comparison(
    rates: &[f64],
    configured: f64,
    target: f64,
    months: u32,
) -> Vec<RateComparisonRow> {
    rates
        .iter()
        .map(|&rate| RateComparisonRow {
            rate,
            monthly_investment: required_monthly_contribution(target, monthly_rate(rate), months),
            is_configured: (rate - configured).abs() < 1e-9,
        })
        .collect()
}
