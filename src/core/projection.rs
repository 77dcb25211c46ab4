use tracing::debug;

use super::education::{education_investment_at_age, yearly_school_outflow};
use super::finance::{MONTHS_PER_YEAR, compound_month, monthly_rate, round1};
use super::types::{
    EducationSummary, InvestmentRecord, LedgerSummary, Phase, PlanSnapshot, ProjectionRecord,
    ShortfallSummary, SimulationAssumptions,
};

/// The two dedicated retirement funds: `active` carries the minimum tier,
/// `index` the comfortable tier's increment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Buckets {
    active: f64,
    index: f64,
}

#[derive(Debug, Clone, Copy)]
struct BucketPlan {
    active_rate: f64,
    index_rate: f64,
    active_contribution: f64,
    index_contribution: f64,
}

impl BucketPlan {
    fn new(assumptions: &SimulationAssumptions, shortfall: &ShortfallSummary) -> Self {
        Self {
            active_rate: monthly_rate(assumptions.active_return),
            index_rate: monthly_rate(assumptions.index_return),
            active_contribution: shortfall.min_monthly_investment,
            index_contribution: shortfall.comfort_diff_monthly_investment,
        }
    }

    fn monthly_total(self) -> f64 {
        self.active_contribution + self.index_contribution
    }
}

impl Buckets {
    fn total(self) -> f64 {
        self.active + self.index
    }

    fn compound_month(&mut self, plan: BucketPlan) {
        self.active = compound_month(self.active, plan.active_rate, plan.active_contribution);
        self.index = compound_month(self.index, plan.index_rate, plan.index_contribution);
    }

    fn compound_year(&mut self, plan: BucketPlan) {
        for _ in 0..MONTHS_PER_YEAR {
            self.compound_month(plan);
        }
    }

    /// One retirement year of withdrawals. Each bucket bottoms out at zero and
    /// any unmet part of the draw is dropped, not carried forward.
    fn draw_down(&mut self, min_draw: f64, comfort_diff_draw: f64) {
        self.active = (self.active - min_draw).max(0.0);
        self.index = (self.index - comfort_diff_draw).max(0.0);
    }
}

#[derive(Debug, Clone, Copy)]
struct Balances {
    buckets: Buckets,
    general_savings: f64,
}

impl Balances {
    fn total(self) -> f64 {
        self.buckets.total() + self.general_savings
    }
}

/// Year-by-year balance sheet across the working and retirement phases.
///
/// One record per age from `current_age` to `final_age`. Amounts are carried
/// at full precision and rounded to one decimal only on the emitted records.
pub fn simulate_balances(
    snapshot: &PlanSnapshot,
    ledger: &LedgerSummary,
    education: &EducationSummary,
    shortfall: &ShortfallSummary,
) -> Vec<ProjectionRecord> {
    let profile = &snapshot.profile;
    let years_to_retirement = profile.years_to_retirement();
    let retirement_years = profile.retirement_years();
    let mut records = Vec::with_capacity((years_to_retirement + retirement_years + 1) as usize);

    let plan = BucketPlan::new(&snapshot.assumptions, shortfall);
    let mut balances = Balances {
        buckets: Buckets::default(),
        general_savings: snapshot.ledger.current_savings,
    };

    for year in 0..=years_to_retirement {
        let age = profile.current_age + year;
        let spouse_age = profile.spouse_age_at(age);
        let spouse_income = profile.spouse_income_at(spouse_age);
        let monthly_income = snapshot.ledger.primary_income_at_year(year)
            + spouse_income
            + snapshot.ledger.bonus
            + snapshot.ledger.side_income;
        let monthly_surplus = monthly_income - ledger.total_expense;

        let education_expense = if year == 0 {
            0.0
        } else {
            let yearly_outflow = yearly_school_outflow(profile, year);
            for _ in 0..MONTHS_PER_YEAR {
                balances.buckets.compound_month(plan);
                balances.general_savings +=
                    monthly_surplus - plan.monthly_total() - yearly_outflow / MONTHS_PER_YEAR as f64;
            }
            yearly_outflow
        };

        records.push(ProjectionRecord {
            age,
            year,
            phase: Phase::Working,
            active_bucket: round1(balances.buckets.active),
            index_bucket: round1(balances.buckets.index),
            general_savings: round1(balances.general_savings),
            total_balance: round1(balances.total()),
            monthly_income: round1(monthly_income),
            monthly_expense: round1(ledger.total_expense),
            monthly_balance: round1(monthly_surplus),
            education_expense: round1(education_expense),
            retirement_contribution: round1(plan.monthly_total()),
            education_contribution: round1(education_investment_at_age(
                education,
                profile.current_age,
                age,
                &snapshot.assumptions,
            )),
            spouse_age,
            spouse_income: round1(spouse_income),
        });
    }

    for year in 1..=retirement_years {
        let age = profile.retirement_age + year;
        let spouse_age = profile.spouse_age_at(age);
        let spouse_income = profile.spouse_income_at(spouse_age);
        let monthly_income = snapshot.retirement_income.pension_monthly
            + snapshot.real_estate.monthly_income_at(age)
            + spouse_income;

        let min_expense = shortfall.adjusted_min_retirement;
        let comfort_expense = shortfall.adjusted_comfortable_retirement;
        let yearly_min_shortfall = (min_expense - monthly_income) * MONTHS_PER_YEAR as f64;
        let yearly_comfort_shortfall = (comfort_expense - monthly_income) * MONTHS_PER_YEAR as f64;

        balances
            .buckets
            .draw_down(yearly_min_shortfall, yearly_comfort_shortfall - yearly_min_shortfall);

        // General savings step in only once both buckets are empty, and then
        // cover the whole comfortable shortfall for the year.
        let general_draw = if balances.buckets.total() > 0.0 {
            0.0
        } else {
            yearly_comfort_shortfall.max(0.0)
        };
        balances.general_savings = (balances.general_savings - general_draw).max(0.0);

        records.push(ProjectionRecord {
            age,
            year: years_to_retirement + year,
            phase: Phase::Retirement,
            active_bucket: round1(balances.buckets.active),
            index_bucket: round1(balances.buckets.index),
            general_savings: round1(balances.general_savings),
            total_balance: round1(balances.total()),
            monthly_income: round1(monthly_income),
            monthly_expense: round1(comfort_expense),
            monthly_balance: round1(monthly_income - comfort_expense),
            education_expense: 0.0,
            retirement_contribution: 0.0,
            education_contribution: 0.0,
            spouse_age,
            spouse_income: round1(spouse_income),
        });
    }

    if let Some(last) = records.last() {
        debug!(
            records = records.len(),
            final_age = last.age,
            final_total = last.total_balance,
            "balance projection complete"
        );
    }
    records
}

/// Growth of the two retirement buckets alone, from today to retirement.
pub fn project_investments(
    snapshot: &PlanSnapshot,
    shortfall: &ShortfallSummary,
) -> Vec<InvestmentRecord> {
    let profile = &snapshot.profile;
    let plan = BucketPlan::new(&snapshot.assumptions, shortfall);
    let mut buckets = Buckets::default();

    (0..=profile.years_to_retirement())
        .map(|year| {
            if year > 0 {
                buckets.compound_year(plan);
            }
            InvestmentRecord {
                age: profile.current_age + year,
                year,
                active_bucket: round1(buckets.active),
                index_bucket: round1(buckets.index),
                total: round1(buckets.total()),
            }
        })
        .collect()
}
