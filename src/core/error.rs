use thiserror::Error;

use super::types::{MAX_AGE, PlanSnapshot};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("{name} is outside the supported range of +/-{max} years (got {value})")]
    AgeOutOfRange { name: &'static str, value: i64, max: u32 },
    #[error(
        "ages must satisfy current < retirement < final (got current={current}, retirement={retirement}, final={final_age})"
    )]
    AgeOrder {
        current: u32,
        retirement: u32,
        final_age: u32,
    },
    #[error("{name} must be > -100 (got {value})")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be >= 0 (got {value})")]
    NegativeMultiplier { name: &'static str, value: f64 },
    #[error("spouse income period {id} starts at {start_age} after it ends at {end_age}")]
    SpousePeriodOrder { id: u32, start_age: u32, end_age: u32 },
}

impl PlanSnapshot {
    /// Boundary checks applied before a snapshot from the outside world is
    /// accepted. The engine itself clamps instead of failing.
    pub fn validate(&self) -> Result<(), PlanError> {
        let profile = &self.profile;
        self.check_age_ranges()?;
        if !(profile.current_age < profile.retirement_age
            && profile.retirement_age < profile.final_age)
        {
            return Err(PlanError::AgeOrder {
                current: profile.current_age,
                retirement: profile.retirement_age,
                final_age: profile.final_age,
            });
        }

        let rates = &self.assumptions;
        for (name, value) in [
            ("indexReturn", rates.index_return),
            ("activeReturn", rates.active_return),
            ("educationReturn", rates.education_return),
            ("inflationRate", rates.inflation_rate),
            ("salaryIncreaseRate", self.ledger.salary_growth_rate),
        ] {
            if value <= -100.0 {
                return Err(PlanError::RateOutOfRange { name, value });
            }
        }

        let targets = &self.expense_targets;
        let income = &self.retirement_income;
        for (name, value) in [
            ("minRetirementMonths", targets.min_months_per_year),
            ("minRetirementYears", targets.min_years),
            ("comfortableRetirementMonths", targets.comfortable_months_per_year),
            ("comfortableRetirementYears", targets.comfortable_years),
            ("pensionMonths", income.pension_months_per_year),
            ("pensionYears", income.pension_years),
            ("realEstateMonths", self.real_estate.months_per_year),
        ] {
            if value < 0.0 {
                return Err(PlanError::NegativeMultiplier { name, value });
            }
        }

        if let Some(period) = profile
            .spouse_income_periods
            .iter()
            .find(|period| period.start_age > period.end_age)
        {
            return Err(PlanError::SpousePeriodOrder {
                id: period.id,
                start_age: period.start_age,
                end_age: period.end_age,
            });
        }

        Ok(())
    }

    fn check_age_ranges(&self) -> Result<(), PlanError> {
        let profile = &self.profile;
        let ages = [
            ("currentAge", profile.current_age),
            ("retirementAge", profile.retirement_age),
            ("finalAge", profile.final_age),
            ("spouseAge", profile.spouse_age),
            ("loanStartAge", self.loan.start_age),
            ("loanYears", self.loan.loan_years),
        ]
        .into_iter()
        .chain(profile.spouse_income_periods.iter().flat_map(|period| {
            [
                ("spouseIncomePeriods.startAge", period.start_age),
                ("spouseIncomePeriods.endAge", period.end_age),
            ]
        }))
        .chain(
            self.real_estate
                .properties
                .iter()
                .map(|property| ("realEstateProperties.loanEndAge", property.loan_end_age)),
        )
        .map(|(name, age)| (name, i64::from(age)))
        .chain(
            profile
                .children
                .iter()
                .filter_map(|child| child.age)
                .map(|age| ("children.age", i64::from(age))),
        );

        let max = i64::from(MAX_AGE);
        for (name, value) in ages {
            if !(-max..=max).contains(&value) {
                return Err(PlanError::AgeOutOfRange {
                    name,
                    value,
                    max: MAX_AGE,
                });
            }
        }
        Ok(())
    }
}
