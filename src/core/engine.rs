use std::sync::Arc;

use tracing::{debug, warn};

use super::education::education_costs;
use super::projection::{project_investments, simulate_balances};
use super::shortfall::retirement_shortfall;
use super::types::{ContributionPlan, MAX_AGE, PlanSnapshot, ProjectionResult};

/// Runs the full pipeline on one snapshot.
///
/// Pure and total: non-finite numbers are read as 0, an ill-ordered age
/// horizon is clamped, and every age is capped at [`MAX_AGE`], so every
/// snapshot produces a bounded result.
pub fn compute_projection(snapshot: &PlanSnapshot) -> ProjectionResult {
    let snapshot = normalize(snapshot);
    let profile = &snapshot.profile;

    let ledger = snapshot.ledger.summarize(profile);
    let education = education_costs(profile, &snapshot.assumptions);
    let shortfall = retirement_shortfall(&snapshot);
    let savings_balance = simulate_balances(&snapshot, &ledger, &education, &shortfall);
    let investment = project_investments(&snapshot, &shortfall);

    let retirement_monthly = shortfall.monthly_retirement_contribution();
    let education_monthly = education.university_monthly_total;
    let contribution_plan = ContributionPlan {
        retirement_monthly,
        education_monthly,
        minimum_with_education: shortfall.min_monthly_investment + education_monthly,
        comfortable_with_education: retirement_monthly + education_monthly,
    };

    debug!(
        current_age = profile.current_age,
        retirement_age = profile.retirement_age,
        final_age = profile.final_age,
        balance_rows = savings_balance.len(),
        "projection computed"
    );

    ProjectionResult {
        ledger,
        education,
        shortfall,
        contribution_plan,
        savings_balance,
        investment,
    }
}

fn normalize(snapshot: &PlanSnapshot) -> PlanSnapshot {
    let mut snapshot = snapshot.sanitized();
    let profile = &mut snapshot.profile;

    let current_age = profile.current_age.min(MAX_AGE - 2);
    let retirement_age = profile.retirement_age.clamp(current_age + 1, MAX_AGE - 1);
    let final_age = profile.final_age.clamp(retirement_age + 1, MAX_AGE);
    if current_age != profile.current_age
        || retirement_age != profile.retirement_age
        || final_age != profile.final_age
    {
        warn!(
            current_age = profile.current_age,
            retirement_age = profile.retirement_age,
            final_age = profile.final_age,
            clamped_current_age = current_age,
            clamped_retirement_age = retirement_age,
            clamped_final_age = final_age,
            "age horizon out of order or range, clamping"
        );
        profile.current_age = current_age;
        profile.retirement_age = retirement_age;
        profile.final_age = final_age;
    }

    let mut clamped = false;
    let mut cap = |age: &mut u32| {
        if *age > MAX_AGE {
            *age = MAX_AGE;
            clamped = true;
        }
    };
    cap(&mut profile.spouse_age);
    for period in &mut profile.spouse_income_periods {
        cap(&mut period.start_age);
        cap(&mut period.end_age);
    }
    cap(&mut snapshot.loan.start_age);
    cap(&mut snapshot.loan.loan_years);
    for property in &mut snapshot.real_estate.properties {
        cap(&mut property.loan_end_age);
    }

    let bound = MAX_AGE as i32;
    for age in profile.children.iter_mut().filter_map(|child| child.age.as_mut()) {
        if !(-bound..=bound).contains(&*age) {
            *age = (*age).clamp(-bound, bound);
            clamped = true;
        }
    }

    if clamped {
        warn!(max_age = MAX_AGE, "age fields beyond the supported range, clamping");
    }
    snapshot
}

/// Remembers the last snapshot and its result so that resubmitting an
/// unchanged plan skips the recomputation.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    entry: Option<(PlanSnapshot, Arc<ProjectionResult>)>,
    hits: u64,
    misses: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, snapshot: &PlanSnapshot) -> Arc<ProjectionResult> {
        if let Some((cached, result)) = &self.entry {
            if cached == snapshot {
                self.hits += 1;
                return Arc::clone(result);
            }
        }

        self.misses += 1;
        let result = Arc::new(compute_projection(snapshot));
        self.entry = Some((snapshot.clone(), Arc::clone(&result)));
        result
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{
        Child, EmploymentType, ExpenseTargets, FinanceLedger, HighSchoolType, HouseholdProfile,
        LoanTerms, MonthlyExpenses, Phase, RealEstateHoldings, RetirementIncome,
        SimulationAssumptions, SpouseIncomePeriod, UniversityType,
    };
    use proptest::prelude::{prop_assert_eq, proptest};

    fn sample_snapshot() -> PlanSnapshot {
        PlanSnapshot {
            profile: HouseholdProfile {
                current_age: 30,
                retirement_age: 60,
                final_age: 90,
                has_spouse: false,
                spouse_age: 0,
                has_children: true,
                children: vec![Child {
                    id: 1,
                    age: Some(3),
                    high_school_type: HighSchoolType::Private,
                    university_type: UniversityType::PrivateScience,
                }],
                spouse_income_periods: Vec::new(),
            },
            ledger: FinanceLedger {
                primary_income: 40.0,
                salary_growth_rate: 1.0,
                bonus: 2.0,
                side_income: 1.0,
                expenses: MonthlyExpenses {
                    housing: 8.0,
                    groceries: 4.0,
                    investment: 3.0,
                    ..MonthlyExpenses::default()
                },
                current_savings: 250.0,
            },
            retirement_income: RetirementIncome {
                pension_monthly: 12.0,
                pension_months_per_year: 12.0,
                pension_years: 30.0,
                has_retirement_bonus: true,
                retirement_bonus: 800.0,
            },
            real_estate: RealEstateHoldings {
                enabled: false,
                months_per_year: 12.0,
                properties: Vec::new(),
            },
            loan: LoanTerms {
                start_age: 30,
                loan_years: 35,
                monthly_payment: 0.0,
            },
            expense_targets: ExpenseTargets {
                min_monthly: 25.0,
                min_months_per_year: 12.0,
                min_years: 30.0,
                comfortable_monthly: 35.0,
                comfortable_months_per_year: 12.0,
                comfortable_years: 30.0,
            },
            assumptions: SimulationAssumptions {
                index_return: 4.0,
                active_return: 6.5,
                education_return: 3.0,
                inflation_rate: 2.0,
            },
        }
    }

    #[test]
    fn pipeline_is_idempotent() {
        let snapshot = sample_snapshot();
        let first = compute_projection(&snapshot);
        let second = compute_projection(&snapshot);
        assert_eq!(first, second);
        let json_a = serde_json::to_string(&first).expect("serialize");
        let json_b = serde_json::to_string(&second).expect("serialize");
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn contribution_plan_combines_retirement_and_university_set_asides() {
        let result = compute_projection(&sample_snapshot());
        let plan = &result.contribution_plan;
        let university = result.education.children[0].university_monthly_investment;

        assert!(university > 0.0);
        assert_eq!(plan.education_monthly, university);
        assert_eq!(
            plan.minimum_with_education,
            result.shortfall.min_monthly_investment + university
        );
        assert_eq!(
            plan.comfortable_with_education,
            result.shortfall.min_monthly_investment
                + result.shortfall.comfort_diff_monthly_investment
                + university
        );
    }

    #[test]
    fn ill_ordered_ages_are_clamped_instead_of_failing() {
        let mut snapshot = sample_snapshot();
        snapshot.profile.retirement_age = 20;
        snapshot.profile.final_age = 10;
        let result = compute_projection(&snapshot);

        let ages = result
            .savings_balance
            .iter()
            .map(|r| (r.age, r.phase))
            .collect::<Vec<_>>();
        assert_eq!(
            ages,
            vec![(30, Phase::Working), (31, Phase::Working), (32, Phase::Retirement)]
        );
        assert_eq!(result.investment.len(), 2);
    }

    #[test]
    fn non_finite_inputs_are_read_as_zero() {
        let mut snapshot = sample_snapshot();
        snapshot.ledger.bonus = f64::NAN;
        snapshot.ledger.expenses.housing = f64::INFINITY;
        snapshot.assumptions.inflation_rate = f64::NAN;
        let result = compute_projection(&snapshot);

        assert_eq!(result.ledger.total_income, 41.0);
        assert_eq!(result.ledger.total_expense, 7.0);
        assert_eq!(result.shortfall.inflation_multiplier, 1.0);
        for record in &result.savings_balance {
            assert!(record.total_balance.is_finite());
            assert!(record.monthly_income.is_finite());
        }
    }

    #[test]
    fn negative_spouse_income_flows_through_the_ledger() {
        let mut snapshot = sample_snapshot();
        snapshot.profile.has_spouse = true;
        snapshot.profile.spouse_age = 30;
        snapshot.profile.spouse_income_periods = vec![SpouseIncomePeriod {
            id: 1,
            start_age: 20,
            end_age: 60,
            employment_type: EmploymentType::Parttime,
            monthly_income: -5.0,
        }];
        let result = compute_projection(&snapshot);

        assert_eq!(result.ledger.spouse_income, -5.0);
        assert_eq!(result.ledger.total_income, 38.0);
        assert_eq!(result.savings_balance[0].monthly_income, 38.0);
    }

    #[test]
    fn oversized_ages_are_capped() {
        let mut snapshot = sample_snapshot();
        snapshot.profile.retirement_age = 400_000_000;
        snapshot.profile.final_age = 300_000_000;
        snapshot.profile.has_spouse = true;
        snapshot.profile.spouse_age = u32::MAX;
        snapshot.profile.children[0].age = Some(i32::MIN);
        snapshot.loan.start_age = u32::MAX;
        snapshot.loan.loan_years = 1;
        let result = compute_projection(&snapshot);

        let last = result.savings_balance.last().expect("final record");
        assert_eq!(last.age, MAX_AGE);
        assert_eq!(result.savings_balance.len(), (MAX_AGE - 30 + 1) as usize);
        assert_eq!(result.shortfall.years_until_retirement, MAX_AGE - 1 - 30);
        assert_eq!(result.shortfall.loan_end_age, MAX_AGE + 1);
        assert_eq!(result.education.children[0].child_age, -(MAX_AGE as i32));
    }

    #[test]
    fn current_age_near_the_cap_still_leaves_a_horizon() {
        let mut snapshot = sample_snapshot();
        snapshot.profile.current_age = u32::MAX;
        let result = compute_projection(&snapshot);

        let ages = result.savings_balance.iter().map(|r| r.age).collect::<Vec<_>>();
        assert_eq!(ages, vec![MAX_AGE - 2, MAX_AGE - 1, MAX_AGE]);
    }

    #[test]
    fn cache_reuses_result_for_equal_snapshot() {
        let mut cache = ProjectionCache::new();
        let snapshot = sample_snapshot();

        let first = cache.get_or_compute(&snapshot);
        let second = cache.get_or_compute(&snapshot.clone());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });

        let mut changed = snapshot.clone();
        changed.ledger.current_savings += 1.0;
        let third = cache.get_or_compute(&changed);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*third, compute_projection(&changed));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_pipeline_is_idempotent(
            current_age in 20u32..50,
            working_years in 1u32..30,
            retired_years in 1u32..30,
            inflation in -1.0f64..5.0,
            savings in 0.0f64..1_000.0,
            child_age in -3i32..20,
        ) {
            let mut snapshot = sample_snapshot();
            snapshot.profile.current_age = current_age;
            snapshot.profile.retirement_age = current_age + working_years;
            snapshot.profile.final_age = current_age + working_years + retired_years;
            snapshot.profile.children[0].age = Some(child_age);
            snapshot.assumptions.inflation_rate = inflation;
            snapshot.ledger.current_savings = savings;

            let first = serde_json::to_string(&compute_projection(&snapshot)).expect("serialize");
            let second = serde_json::to_string(&compute_projection(&snapshot)).expect("serialize");
            prop_assert_eq!(first, second);
        }
    }
}
