mod education;
mod engine;
mod error;
mod finance;
mod projection;
mod shortfall;
mod types;

pub use education::{education_costs, education_investment_at_age, yearly_school_outflow};
pub use engine::{CacheStats, ProjectionCache, compute_projection};
pub use error::PlanError;
pub use finance::{inflation_multiplier, monthly_rate, required_monthly_contribution, round1};
pub use projection::{project_investments, simulate_balances};
pub use shortfall::retirement_shortfall;
pub use types::{
    Child, ChildEducationCost, ContributionPlan, EducationStage, EducationStageCost,
    EducationSummary, EmploymentType, ExpenseTargets, FinanceLedger, HighSchoolType,
    HouseholdProfile, InvestmentRecord, LedgerSummary, LoanTerms, MAX_AGE, MonthlyExpenses, Phase,
    PlanSnapshot, ProjectionRecord, ProjectionResult, RateComparisonRow, RealEstateHoldings,
    RealEstateProperty, RetirementIncome, ShortfallSummary, SimulationAssumptions,
    SpouseIncomePeriod, UniversityType,
};
