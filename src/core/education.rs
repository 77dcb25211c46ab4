use tracing::debug;

use super::finance::{
    MONTHS_PER_YEAR, accumulate, inflation_multiplier, monthly_rate, required_monthly_contribution,
};
use super::types::{
    Child, ChildEducationCost, EducationStage, EducationStageCost, EducationSummary,
    HighSchoolType, HouseholdProfile, SimulationAssumptions, UniversityType,
};

pub const UNIVERSITY_ENTRY_AGE: i32 = 18;

// Stage totals in today's man-yen. Elementary and junior high are always public.
const ELEMENTARY_TOTAL: f64 = 210.0;
const JUNIOR_HIGH_TOTAL: f64 = 150.0;
const UNIVERSITY_YEARS: i32 = 4;

#[derive(Copy, Clone, Debug)]
struct SchoolStage {
    stage: EducationStage,
    start_age: i32,
    end_age: i32,
}

const ELEMENTARY: SchoolStage = SchoolStage {
    stage: EducationStage::Elementary,
    start_age: 6,
    end_age: 12,
};
const JUNIOR_HIGH: SchoolStage = SchoolStage {
    stage: EducationStage::JuniorHigh,
    start_age: 12,
    end_age: 15,
};
const HIGH_SCHOOL: SchoolStage = SchoolStage {
    stage: EducationStage::HighSchool,
    start_age: 15,
    end_age: UNIVERSITY_ENTRY_AGE,
};

impl SchoolStage {
    fn years(self) -> i32 {
        self.end_age - self.start_age
    }

    fn contains(self, age: i32) -> bool {
        age >= self.start_age && age < self.end_age
    }
}

pub fn high_school_total(kind: HighSchoolType) -> f64 {
    match kind {
        HighSchoolType::Public => 140.0,
        HighSchoolType::Private => 290.0,
    }
}

pub fn university_base_cost(kind: UniversityType) -> f64 {
    match kind {
        UniversityType::PublicScience | UniversityType::PublicLiberal => 400.0,
        UniversityType::PrivateScience => 800.0,
        UniversityType::PrivateLiberal => 700.0,
    }
}

/// Per-child education breakdown for every dated child still under 18.
pub fn education_costs(
    profile: &HouseholdProfile,
    assumptions: &SimulationAssumptions,
) -> EducationSummary {
    let children = profile
        .dated_children()
        .filter_map(|(idx, child, age)| child_education_cost(idx + 1, child, age, assumptions))
        .collect::<Vec<_>>();

    let total = children.iter().map(|c| c.total).sum();
    let max_years_until_18 = children
        .iter()
        .map(|c| c.years_until_18)
        .max()
        .unwrap_or(0)
        .max(0);
    let university_monthly_total = children
        .iter()
        .map(|c| c.university_monthly_investment)
        .sum();

    debug!(
        children = children.len(),
        total, max_years_until_18, "education costs computed"
    );

    EducationSummary {
        total,
        children,
        max_years_until_18,
        university_monthly_total,
    }
}

fn child_education_cost(
    child_index: usize,
    child: &Child,
    age: i32,
    assumptions: &SimulationAssumptions,
) -> Option<ChildEducationCost> {
    let years_until_18 = UNIVERSITY_ENTRY_AGE - age;
    if years_until_18 <= 0 {
        return None;
    }

    let high_school = high_school_total(child.high_school_type);
    let mut breakdown = [
        prorated_stage(ELEMENTARY, "public", ELEMENTARY_TOTAL, age),
        prorated_stage(JUNIOR_HIGH, "public", JUNIOR_HIGH_TOTAL, age),
        prorated_stage(HIGH_SCHOOL, child.high_school_type.as_str(), high_school, age),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    let base_cost = university_base_cost(child.university_type);
    let university_cost = base_cost * inflation_multiplier(assumptions.inflation_rate, years_until_18);
    breakdown.push(EducationStageCost {
        stage: EducationStage::University,
        school_type: child.university_type.as_str(),
        start_age: UNIVERSITY_ENTRY_AGE,
        end_age: UNIVERSITY_ENTRY_AGE + UNIVERSITY_YEARS,
        years: UNIVERSITY_YEARS,
        cost: university_cost,
        base_cost: Some(base_cost),
    });

    let total: f64 = breakdown.iter().map(|item| item.cost).sum();
    let months_until_18 = years_until_18 as u32 * MONTHS_PER_YEAR;
    let monthly_investment = if total > 0.0 {
        total / months_until_18 as f64
    } else {
        0.0
    };

    let rate = monthly_rate(assumptions.education_return);
    let university_monthly_investment =
        required_monthly_contribution(university_cost, rate, months_until_18);
    let projected_university_fund = accumulate(university_monthly_investment, rate, months_until_18);

    Some(ChildEducationCost {
        child_index,
        child_id: child.id,
        child_age: age,
        years_until_18,
        total,
        monthly_investment,
        university_cost,
        university_monthly_investment,
        projected_university_fund,
        breakdown,
    })
}

/// Charges the part of a stage not yet behind the child, linearly per year.
fn prorated_stage(
    stage: SchoolStage,
    school_type: &'static str,
    stage_total: f64,
    age: i32,
) -> Option<EducationStageCost> {
    if age >= stage.end_age {
        return None;
    }
    let start_age = stage.start_age.max(age);
    let years = stage.end_age - start_age;
    if years <= 0 {
        return None;
    }

    Some(EducationStageCost {
        stage: stage.stage,
        school_type,
        start_age,
        end_age: stage.end_age,
        years,
        cost: stage_total / stage.years() as f64 * years as f64,
        base_cost: None,
    })
}

/// School fees paid out of general savings in the year `year_offset` years
/// from now. University is excluded; it is pre-funded separately.
pub fn yearly_school_outflow(profile: &HouseholdProfile, year_offset: u32) -> f64 {
    profile
        .dated_children()
        .map(|(_, child, age)| {
            let age_this_year = age + year_offset as i32;
            if ELEMENTARY.contains(age_this_year) {
                ELEMENTARY_TOTAL / ELEMENTARY.years() as f64
            } else if JUNIOR_HIGH.contains(age_this_year) {
                JUNIOR_HIGH_TOTAL / JUNIOR_HIGH.years() as f64
            } else if HIGH_SCHOOL.contains(age_this_year) {
                high_school_total(child.high_school_type) / HIGH_SCHOOL.years() as f64
            } else {
                0.0
            }
        })
        .sum()
}

/// Monthly university set-aside in force when the primary earner is `age`.
///
/// Each child's amount is fixed once, from the later of birth or today up to
/// age 18, and applies only while that child is aged 0..18.
pub fn education_investment_at_age(
    education: &EducationSummary,
    current_age: u32,
    age: u32,
    assumptions: &SimulationAssumptions,
) -> f64 {
    let rate = monthly_rate(assumptions.education_return);
    let elapsed = age as i32 - current_age as i32;

    education
        .children
        .iter()
        .filter(|child| child.university_cost > 0.0)
        .filter(|child| (0..UNIVERSITY_ENTRY_AGE).contains(&(child.child_age + elapsed)))
        .map(|child| {
            let funding_start = child.child_age.max(0);
            let months = (UNIVERSITY_ENTRY_AGE - funding_start) as u32 * MONTHS_PER_YEAR;
            required_monthly_contribution(child.university_cost, rate, months)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SpouseIncomePeriod;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn child(id: u32, age: Option<i32>) -> Child {
        Child {
            id,
            age,
            high_school_type: HighSchoolType::Public,
            university_type: UniversityType::PublicScience,
        }
    }

    fn profile_with(children: Vec<Child>) -> HouseholdProfile {
        HouseholdProfile {
            current_age: 25,
            retirement_age: 65,
            final_age: 95,
            has_spouse: false,
            spouse_age: 0,
            has_children: true,
            children,
            spouse_income_periods: Vec::<SpouseIncomePeriod>::new(),
        }
    }

    fn assumptions() -> SimulationAssumptions {
        SimulationAssumptions {
            index_return: 4.0,
            active_return: 6.5,
            education_return: 3.0,
            inflation_rate: 2.0,
        }
    }

    #[test]
    fn five_year_old_is_charged_every_stage_in_full() {
        let summary = education_costs(&profile_with(vec![child(1, Some(5))]), &assumptions());
        assert_eq!(summary.children.len(), 1);
        let cost = &summary.children[0];

        assert_eq!(cost.years_until_18, 13);
        let elementary = cost.stage(EducationStage::Elementary).expect("elementary");
        assert_eq!(elementary.start_age, 6);
        assert_eq!(elementary.years, 6);
        assert_approx(elementary.cost, 210.0);
        assert_approx(cost.stage(EducationStage::JuniorHigh).expect("junior").cost, 150.0);
        assert_approx(cost.stage(EducationStage::HighSchool).expect("high").cost, 140.0);

        let university = 400.0 * 1.02_f64.powi(13);
        assert_approx(cost.university_cost, university);
        assert_approx(cost.total, 210.0 + 150.0 + 140.0 + university);
        assert_approx(cost.monthly_investment, cost.total / (13.0 * 12.0));

        assert!(cost.university_monthly_investment > 0.0);
        assert!(cost.university_monthly_investment < cost.monthly_investment);
        assert!((cost.projected_university_fund - university).abs() < 1e-6);
        assert_eq!(summary.max_years_until_18, 13);
    }

    #[test]
    fn mid_stage_child_is_prorated() {
        let mut kid = child(1, Some(9));
        kid.high_school_type = HighSchoolType::Private;
        let summary = education_costs(&profile_with(vec![kid]), &assumptions());
        let cost = &summary.children[0];

        let elementary = cost.stage(EducationStage::Elementary).expect("elementary");
        assert_eq!(elementary.start_age, 9);
        assert_eq!(elementary.years, 3);
        assert_approx(elementary.cost, 105.0);
        let high = cost.stage(EducationStage::HighSchool).expect("high");
        assert_eq!(high.school_type, "private");
        assert_approx(high.cost, 290.0);
    }

    #[test]
    fn high_schooler_only_pays_remaining_years_and_university() {
        let summary = education_costs(&profile_with(vec![child(1, Some(16))]), &assumptions());
        let cost = &summary.children[0];
        assert!(cost.stage(EducationStage::Elementary).is_none());
        assert!(cost.stage(EducationStage::JuniorHigh).is_none());
        assert_approx(
            cost.stage(EducationStage::HighSchool).expect("high").cost,
            140.0 / 3.0 * 2.0,
        );
        assert_eq!(cost.breakdown.len(), 2);
    }

    #[test]
    fn unborn_child_inflates_university_over_longer_horizon() {
        let mut kid = child(1, Some(-2));
        kid.university_type = UniversityType::PrivateLiberal;
        let summary = education_costs(&profile_with(vec![kid]), &assumptions());
        let cost = &summary.children[0];
        assert_eq!(cost.years_until_18, 20);
        assert_approx(cost.university_cost, 700.0 * 1.02_f64.powi(20));
        assert_approx(cost.stage(EducationStage::Elementary).expect("elementary").cost, 210.0);
    }

    #[test]
    fn adults_undated_children_and_disabled_flag_are_skipped() {
        let summary = education_costs(
            &profile_with(vec![child(1, Some(18)), child(2, None), child(3, Some(30))]),
            &assumptions(),
        );
        assert!(summary.children.is_empty());
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.max_years_until_18, 0);

        let mut profile = profile_with(vec![child(1, Some(3))]);
        profile.has_children = false;
        let summary = education_costs(&profile, &assumptions());
        assert!(summary.children.is_empty());
    }

    #[test]
    fn child_index_tracks_position_in_list() {
        let summary = education_costs(
            &profile_with(vec![child(7, None), child(8, Some(2))]),
            &assumptions(),
        );
        assert_eq!(summary.children[0].child_index, 2);
        assert_eq!(summary.children[0].child_id, 8);
    }

    #[test]
    fn yearly_outflow_follows_each_childs_stage() {
        let mut older = child(2, Some(14));
        older.high_school_type = HighSchoolType::Private;
        let profile = profile_with(vec![child(1, Some(5)), older]);

        // Now: a 5-year-old (nothing) and a 14-year-old in junior high.
        assert_approx(yearly_school_outflow(&profile, 0), 50.0);
        // Next year: 6 in elementary, 15 in private high school.
        assert_approx(yearly_school_outflow(&profile, 1), 35.0 + 290.0 / 3.0);
        // Four years on: 9 in elementary, older child is 18.
        assert_approx(yearly_school_outflow(&profile, 4), 35.0);
    }

    #[test]
    fn education_investment_runs_only_while_child_is_under_18() {
        let profile = profile_with(vec![child(1, Some(-2))]);
        let rates = assumptions();
        let summary = education_costs(&profile, &rates);
        let cost = &summary.children[0];

        // Not born yet: nothing set aside.
        assert_eq!(education_investment_at_age(&summary, 25, 26, &rates), 0.0);

        let expected = required_monthly_contribution(
            cost.university_cost,
            monthly_rate(rates.education_return),
            18 * 12,
        );
        assert_approx(education_investment_at_age(&summary, 25, 27, &rates), expected);
        assert_approx(education_investment_at_age(&summary, 25, 44, &rates), expected);
        assert_eq!(education_investment_at_age(&summary, 25, 45, &rates), 0.0);
    }
}
