use serde::{Deserialize, Serialize};

use super::finance::finite_or_zero;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[serde(alias = "fullTime", alias = "full-time")]
    Fulltime,
    #[serde(alias = "partTime", alias = "part-time")]
    Parttime,
    Housewife,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighSchoolType {
    Public,
    Private,
}

impl HighSchoolType {
    pub fn as_str(self) -> &'static str {
        match self {
            HighSchoolType::Public => "public",
            HighSchoolType::Private => "private",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniversityType {
    #[serde(alias = "publicScience")]
    PublicScience,
    #[serde(alias = "publicLiberal")]
    PublicLiberal,
    #[serde(alias = "privateScience")]
    PrivateScience,
    #[serde(alias = "privateLiberal")]
    PrivateLiberal,
}

impl UniversityType {
    pub fn as_str(self) -> &'static str {
        match self {
            UniversityType::PublicScience => "public_science",
            UniversityType::PublicLiberal => "public_liberal",
            UniversityType::PrivateScience => "private_science",
            UniversityType::PrivateLiberal => "private_liberal",
        }
    }
}

/// One row of the spouse employment table. Ages are inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SpouseIncomePeriod {
    pub id: u32,
    pub start_age: u32,
    pub end_age: u32,
    pub employment_type: EmploymentType,
    pub monthly_income: f64,
}

impl SpouseIncomePeriod {
    pub fn contains(&self, age: u32) -> bool {
        age >= self.start_age && age <= self.end_age
    }

    pub fn effective_income(&self) -> f64 {
        match self.employment_type {
            EmploymentType::Housewife => 0.0,
            EmploymentType::Fulltime | EmploymentType::Parttime => self.monthly_income,
        }
    }
}

/// A child as seen by the engine. `age` is already resolved against the
/// reference date; a negative age means the child is born in `|age|` years and
/// `None` means no birth date has been entered yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub id: u32,
    pub age: Option<i32>,
    pub high_school_type: HighSchoolType,
    pub university_type: UniversityType,
}

/// Oldest age any part of a plan may refer to.
pub const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdProfile {
    pub current_age: u32,
    pub retirement_age: u32,
    pub final_age: u32,
    pub has_spouse: bool,
    pub spouse_age: u32,
    pub has_children: bool,
    pub children: Vec<Child>,
    pub spouse_income_periods: Vec<SpouseIncomePeriod>,
}

impl HouseholdProfile {
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn retirement_years(&self) -> u32 {
        self.final_age.saturating_sub(self.retirement_age)
    }

    /// Spouse age in the year the primary earner reaches `age`; 0 when there is no spouse.
    pub fn spouse_age_at(&self, age: u32) -> u32 {
        if !self.has_spouse {
            return 0;
        }
        self.spouse_age
            .saturating_add(age.saturating_sub(self.current_age))
    }

    /// First period containing `spouse_age` wins; overlapping rows are not reconciled.
    pub fn spouse_income_at(&self, spouse_age: u32) -> f64 {
        if !self.has_spouse || spouse_age == 0 {
            return 0.0;
        }
        self.spouse_income_periods
            .iter()
            .find(|period| period.contains(spouse_age))
            .map(SpouseIncomePeriod::effective_income)
            .unwrap_or(0.0)
    }

    pub fn dated_children(&self) -> impl Iterator<Item = (usize, &Child, i32)> {
        let enabled = self.has_children;
        self.children
            .iter()
            .enumerate()
            .filter(move |_| enabled)
            .filter_map(|(idx, child)| child.age.map(|age| (idx, child, age)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyExpenses {
    pub housing: f64,
    pub groceries: f64,
    pub snacks: f64,
    pub dining: f64,
    pub utilities: f64,
    pub communication: f64,
    pub insurance: f64,
    pub medical: f64,
    pub education: f64,
    pub car_maintenance: f64,
    pub transportation: f64,
    pub clothing: f64,
    pub entertainment: f64,
    pub socializing: f64,
    pub miscellaneous: f64,
    pub loans: f64,
    pub investment: f64,
    pub savings1: f64,
    pub savings2: f64,
}

impl MonthlyExpenses {
    fn items_mut(&mut self) -> [&mut f64; 19] {
        [
            &mut self.housing,
            &mut self.groceries,
            &mut self.snacks,
            &mut self.dining,
            &mut self.utilities,
            &mut self.communication,
            &mut self.insurance,
            &mut self.medical,
            &mut self.education,
            &mut self.car_maintenance,
            &mut self.transportation,
            &mut self.clothing,
            &mut self.entertainment,
            &mut self.socializing,
            &mut self.miscellaneous,
            &mut self.loans,
            &mut self.investment,
            &mut self.savings1,
            &mut self.savings2,
        ]
    }

    pub fn total(&self) -> f64 {
        self.housing
            + self.groceries
            + self.snacks
            + self.dining
            + self.utilities
            + self.communication
            + self.insurance
            + self.medical
            + self.education
            + self.car_maintenance
            + self.transportation
            + self.clothing
            + self.entertainment
            + self.socializing
            + self.miscellaneous
            + self.loans
            + self.investment
            + self.savings1
            + self.savings2
    }
}

/// Current monthly cash flow of the household.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceLedger {
    pub primary_income: f64,
    /// Annual pay rise in percent.
    pub salary_growth_rate: f64,
    pub bonus: f64,
    pub side_income: f64,
    pub expenses: MonthlyExpenses,
    pub current_savings: f64,
}

impl FinanceLedger {
    pub fn primary_income_at_year(&self, year: u32) -> f64 {
        self.primary_income * (1.0 + self.salary_growth_rate / 100.0).powi(year as i32)
    }

    pub fn summarize(&self, profile: &HouseholdProfile) -> LedgerSummary {
        let spouse_income = profile.spouse_income_at(profile.spouse_age);
        let total_income = self.primary_income + spouse_income + self.bonus + self.side_income;
        let total_expense = self.expenses.total();
        LedgerSummary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
            spouse_income,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetirementIncome {
    pub pension_monthly: f64,
    pub pension_months_per_year: f64,
    pub pension_years: f64,
    pub has_retirement_bonus: bool,
    pub retirement_bonus: f64,
}

impl RetirementIncome {
    pub fn effective_bonus(&self) -> f64 {
        if self.has_retirement_bonus {
            self.retirement_bonus
        } else {
            0.0
        }
    }
}

/// A rental property whose income starts once its loan is paid off.
#[derive(Debug, Clone, PartialEq)]
pub struct RealEstateProperty {
    pub id: u32,
    pub monthly_income: f64,
    pub loan_end_age: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RealEstateHoldings {
    pub enabled: bool,
    pub months_per_year: f64,
    pub properties: Vec<RealEstateProperty>,
}

impl RealEstateHoldings {
    pub fn monthly_income_at(&self, age: u32) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        self.properties
            .iter()
            .filter(|property| age >= property.loan_end_age)
            .map(|property| property.monthly_income)
            .sum()
    }

    pub fn earliest_start_age(&self) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        self.properties.iter().map(|p| p.loan_end_age).min()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    pub start_age: u32,
    pub loan_years: u32,
    pub monthly_payment: f64,
}

impl LoanTerms {
    pub fn end_age(&self) -> u32 {
        self.start_age.saturating_add(self.loan_years)
    }
}

/// Monthly lifestyle targets in today's money, each with its own months × years span.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseTargets {
    pub min_monthly: f64,
    pub min_months_per_year: f64,
    pub min_years: f64,
    pub comfortable_monthly: f64,
    pub comfortable_months_per_year: f64,
    pub comfortable_years: f64,
}

/// Annual rates in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationAssumptions {
    pub index_return: f64,
    pub active_return: f64,
    pub education_return: f64,
    pub inflation_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanSnapshot {
    pub profile: HouseholdProfile,
    pub ledger: FinanceLedger,
    pub retirement_income: RetirementIncome,
    pub real_estate: RealEstateHoldings,
    pub loan: LoanTerms,
    pub expense_targets: ExpenseTargets,
    pub assumptions: SimulationAssumptions,
}

impl PlanSnapshot {
    /// Copy of the snapshot with every non-finite amount or rate replaced by 0.
    pub fn sanitized(&self) -> Self {
        let mut snapshot = self.clone();

        for period in &mut snapshot.profile.spouse_income_periods {
            period.monthly_income = finite_or_zero(period.monthly_income);
        }

        let ledger = &mut snapshot.ledger;
        ledger.primary_income = finite_or_zero(ledger.primary_income);
        ledger.salary_growth_rate = finite_or_zero(ledger.salary_growth_rate);
        ledger.bonus = finite_or_zero(ledger.bonus);
        ledger.side_income = finite_or_zero(ledger.side_income);
        ledger.current_savings = finite_or_zero(ledger.current_savings);
        for item in ledger.expenses.items_mut() {
            *item = finite_or_zero(*item);
        }

        let income = &mut snapshot.retirement_income;
        income.pension_monthly = finite_or_zero(income.pension_monthly);
        income.pension_months_per_year = finite_or_zero(income.pension_months_per_year);
        income.pension_years = finite_or_zero(income.pension_years);
        income.retirement_bonus = finite_or_zero(income.retirement_bonus);

        snapshot.real_estate.months_per_year = finite_or_zero(snapshot.real_estate.months_per_year);
        for property in &mut snapshot.real_estate.properties {
            property.monthly_income = finite_or_zero(property.monthly_income);
        }

        snapshot.loan.monthly_payment = finite_or_zero(snapshot.loan.monthly_payment);

        let targets = &mut snapshot.expense_targets;
        targets.min_monthly = finite_or_zero(targets.min_monthly);
        targets.min_months_per_year = finite_or_zero(targets.min_months_per_year);
        targets.min_years = finite_or_zero(targets.min_years);
        targets.comfortable_monthly = finite_or_zero(targets.comfortable_monthly);
        targets.comfortable_months_per_year = finite_or_zero(targets.comfortable_months_per_year);
        targets.comfortable_years = finite_or_zero(targets.comfortable_years);

        let rates = &mut snapshot.assumptions;
        rates.index_return = finite_or_zero(rates.index_return);
        rates.active_return = finite_or_zero(rates.active_return);
        rates.education_return = finite_or_zero(rates.education_return);
        rates.inflation_rate = finite_or_zero(rates.inflation_rate);

        snapshot
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub spouse_income: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationStage {
    Elementary,
    JuniorHigh,
    HighSchool,
    University,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationStageCost {
    pub stage: EducationStage,
    pub school_type: &'static str,
    pub start_age: i32,
    pub end_age: i32,
    pub years: i32,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildEducationCost {
    /// 1-based position in the household's child list.
    pub child_index: usize,
    pub child_id: u32,
    pub child_age: i32,
    pub years_until_18: i32,
    pub total: f64,
    /// Flat, uncompounded set-aside: `total / months until 18`.
    pub monthly_investment: f64,
    pub university_cost: f64,
    /// Annuity set-aside covering the university lump only.
    pub university_monthly_investment: f64,
    pub projected_university_fund: f64,
    pub breakdown: Vec<EducationStageCost>,
}

impl ChildEducationCost {
    pub fn stage(&self, stage: EducationStage) -> Option<&EducationStageCost> {
        self.breakdown.iter().find(|item| item.stage == stage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationSummary {
    pub total: f64,
    pub children: Vec<ChildEducationCost>,
    pub max_years_until_18: i32,
    pub university_monthly_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateComparisonRow {
    pub rate: f64,
    pub monthly_investment: f64,
    pub is_configured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortfallSummary {
    pub total_pension: f64,
    pub retirement_bonus: f64,
    pub total_real_estate: f64,
    pub retirement_real_estate_income: f64,
    pub total_income: f64,
    pub years_until_retirement: u32,
    pub inflation_multiplier: f64,
    pub adjusted_min_retirement: f64,
    pub adjusted_comfortable_retirement: f64,
    pub total_min_expenses: f64,
    pub total_comfortable_expenses: f64,
    pub min_shortfall: f64,
    pub comfortable_shortfall: f64,
    pub min_monthly_shortfall: f64,
    pub comfortable_monthly_shortfall: f64,
    pub comfort_diff_shortfall: f64,
    pub min_monthly_investment: f64,
    pub comfort_diff_monthly_investment: f64,
    pub loan_end_age: u32,
    pub real_estate_start_age: u32,
    pub real_estate_years: u32,
    pub active_rate_comparison: Vec<RateComparisonRow>,
    pub index_rate_comparison: Vec<RateComparisonRow>,
}

impl ShortfallSummary {
    pub fn monthly_retirement_contribution(&self) -> f64 {
        self.min_monthly_investment + self.comfort_diff_monthly_investment
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Working,
    Retirement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRecord {
    pub age: u32,
    pub year: u32,
    pub phase: Phase,
    pub active_bucket: f64,
    pub index_bucket: f64,
    pub general_savings: f64,
    pub total_balance: f64,
    pub monthly_income: f64,
    pub monthly_expense: f64,
    pub monthly_balance: f64,
    pub education_expense: f64,
    pub retirement_contribution: f64,
    pub education_contribution: f64,
    pub spouse_age: u32,
    pub spouse_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub age: u32,
    pub year: u32,
    pub active_bucket: f64,
    pub index_bucket: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionPlan {
    pub retirement_monthly: f64,
    pub education_monthly: f64,
    pub minimum_with_education: f64,
    pub comfortable_with_education: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub ledger: LedgerSummary,
    pub education: EducationSummary,
    pub shortfall: ShortfallSummary,
    pub contribution_plan: ContributionPlan,
    pub savings_balance: Vec<ProjectionRecord>,
    pub investment: Vec<InvestmentRecord>,
}
