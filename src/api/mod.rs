use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    Child, EmploymentType, ExpenseTargets, FinanceLedger, HighSchoolType, HouseholdProfile,
    LoanTerms, MonthlyExpenses, PlanError, PlanSnapshot, ProjectionCache, RealEstateHoldings,
    RealEstateProperty, RetirementIncome, SimulationAssumptions, SpouseIncomePeriod,
    UniversityType, compute_projection,
};

#[derive(Parser, Debug)]
#[command(
    name = "lifeplan",
    about = "Household life planner: education costs, retirement shortfall and balance projection",
    version
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
    },
    /// Evaluate one plan built from flags and print it as JSON
    Plan(PlanArgs),
}

#[derive(Debug, Clone, PartialEq)]
struct ChildArg {
    age: Option<i32>,
    high_school_type: HighSchoolType,
    university_type: UniversityType,
}

#[derive(Debug, Clone, PartialEq)]
struct SpousePeriodArg {
    start_age: u32,
    end_age: u32,
    employment_type: EmploymentType,
    monthly_income: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct PropertyArg {
    monthly_income: f64,
    loan_end_age: u32,
}

/// Amounts are monthly unless noted; rates are annual percentages.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PlanArgs {
    #[arg(long, default_value_t = 25)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 95)]
    final_age: u32,

    #[arg(long)]
    has_spouse: bool,
    #[arg(long, default_value_t = 0)]
    spouse_age: u32,
    #[arg(
        long = "spouse-period",
        value_parser = parse_spouse_period,
        default_value = "25:65:fulltime:20",
        help = "Spouse employment period START:END:TYPE:INCOME (repeatable)"
    )]
    spouse_periods: Vec<SpousePeriodArg>,
    #[arg(long)]
    has_children: bool,
    #[arg(
        long = "child",
        value_parser = parse_child,
        allow_hyphen_values = true,
        help = "Child AGE[:HIGH_SCHOOL[:UNIVERSITY]]; negative AGE for a child not yet born, ? for unknown (repeatable)"
    )]
    children: Vec<ChildArg>,

    #[arg(long, default_value_t = 30.0)]
    primary_income: f64,
    #[arg(long, default_value_t = 1.0, help = "Annual pay rise in percent")]
    salary_increase_rate: f64,
    #[arg(long, default_value_t = 0.0)]
    bonus: f64,
    #[arg(long, default_value_t = 0.0)]
    side_income: f64,

    #[arg(long, default_value_t = 3.0)]
    housing: f64,
    #[arg(long, default_value_t = 2.0)]
    groceries: f64,
    #[arg(long, default_value_t = 1.0)]
    snacks: f64,
    #[arg(long, default_value_t = 2.0)]
    dining: f64,
    #[arg(long, default_value_t = 2.0)]
    utilities: f64,
    #[arg(long, default_value_t = 1.0)]
    communication: f64,
    #[arg(long, default_value_t = 1.0)]
    insurance: f64,
    #[arg(long, default_value_t = 0.0)]
    medical: f64,
    #[arg(long, default_value_t = 0.0)]
    education: f64,
    #[arg(long, default_value_t = 0.0)]
    car_maintenance: f64,
    #[arg(long, default_value_t = 1.0)]
    transportation: f64,
    #[arg(long, default_value_t = 1.0)]
    clothing: f64,
    #[arg(long, default_value_t = 3.0)]
    entertainment: f64,
    #[arg(long, default_value_t = 0.0)]
    socializing: f64,
    #[arg(long, default_value_t = 1.0)]
    miscellaneous: f64,
    #[arg(long, default_value_t = 0.0)]
    loans: f64,
    #[arg(long, default_value_t = 3.0)]
    investment: f64,
    #[arg(long, default_value_t = 0.0)]
    savings1: f64,
    #[arg(long, default_value_t = 3.0)]
    savings2: f64,
    #[arg(long, default_value_t = 100.0)]
    current_savings: f64,

    #[arg(long, default_value_t = 10.7)]
    pension_monthly: f64,
    #[arg(long, default_value_t = 12.0)]
    pension_months: f64,
    #[arg(long, default_value_t = 30.0)]
    pension_years: f64,
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    has_retirement_bonus: bool,
    #[arg(long, default_value_t = 600.0)]
    retirement_bonus: f64,

    #[arg(long)]
    has_real_estate: bool,
    #[arg(long, default_value_t = 12.0)]
    real_estate_months: f64,
    #[arg(
        long = "property",
        value_parser = parse_property,
        default_value = "0:60",
        help = "Rental property INCOME:LOAN_END_AGE (repeatable)"
    )]
    properties: Vec<PropertyArg>,

    #[arg(long, default_value_t = 30)]
    loan_start_age: u32,
    #[arg(long, default_value_t = 35)]
    loan_years: u32,
    #[arg(long, default_value_t = 0.0)]
    loan_monthly_payment: f64,

    #[arg(long, default_value_t = 28.2)]
    min_retirement_monthly: f64,
    #[arg(long, default_value_t = 12.0)]
    min_retirement_months: f64,
    #[arg(long, default_value_t = 30.0)]
    min_retirement_years: f64,
    #[arg(long, default_value_t = 37.9)]
    comfortable_retirement_monthly: f64,
    #[arg(long, default_value_t = 12.0)]
    comfortable_retirement_months: f64,
    #[arg(long, default_value_t = 30.0)]
    comfortable_retirement_years: f64,

    #[arg(long, default_value_t = 4.0)]
    index_return: f64,
    #[arg(long, default_value_t = 6.5)]
    active_return: f64,
    #[arg(long, default_value_t = 3.0)]
    education_return: f64,
    #[arg(long, default_value_t = 2.0)]
    inflation_rate: f64,
}

fn parse_field<T: std::str::FromStr>(
    value: Option<&str>,
    what: &str,
    raw: &str,
) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("'{raw}' is missing {what}"))?;
    value
        .parse::<T>()
        .map_err(|_| format!("'{raw}' has an invalid {what} '{value}'"))
}

fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_employment_type(raw: &str) -> Result<EmploymentType, String> {
    match normalize_label(raw).as_str() {
        "fulltime" => Ok(EmploymentType::Fulltime),
        "parttime" => Ok(EmploymentType::Parttime),
        "housewife" => Ok(EmploymentType::Housewife),
        _ => Err(format!(
            "unknown employment type '{raw}' (expected fulltime, parttime or housewife)"
        )),
    }
}

fn parse_high_school_type(raw: &str) -> Result<HighSchoolType, String> {
    match normalize_label(raw).as_str() {
        "public" => Ok(HighSchoolType::Public),
        "private" => Ok(HighSchoolType::Private),
        _ => Err(format!("unknown high school type '{raw}' (expected public or private)")),
    }
}

fn parse_university_type(raw: &str) -> Result<UniversityType, String> {
    match normalize_label(raw).as_str() {
        "publicscience" => Ok(UniversityType::PublicScience),
        "publicliberal" => Ok(UniversityType::PublicLiberal),
        "privatescience" => Ok(UniversityType::PrivateScience),
        "privateliberal" => Ok(UniversityType::PrivateLiberal),
        _ => Err(format!(
            "unknown university type '{raw}' (expected public_science, public_liberal, private_science or private_liberal)"
        )),
    }
}

fn parse_child(raw: &str) -> Result<ChildArg, String> {
    let mut fields = raw.split(':').map(str::trim);
    let age = match fields.next() {
        Some("?") | Some("") | None => None,
        Some(age) => Some(parse_field::<i32>(Some(age), "age", raw)?),
    };
    let high_school_type = fields
        .next()
        .map(parse_high_school_type)
        .transpose()?
        .unwrap_or(HighSchoolType::Public);
    let university_type = fields
        .next()
        .map(parse_university_type)
        .transpose()?
        .unwrap_or(UniversityType::PublicScience);
    if fields.next().is_some() {
        return Err(format!("'{raw}' has too many fields for AGE[:HIGH_SCHOOL[:UNIVERSITY]]"));
    }
    Ok(ChildArg {
        age,
        high_school_type,
        university_type,
    })
}

fn parse_spouse_period(raw: &str) -> Result<SpousePeriodArg, String> {
    let mut fields = raw.split(':').map(str::trim);
    let start_age = parse_field(fields.next(), "start age", raw)?;
    let end_age = parse_field(fields.next(), "end age", raw)?;
    let employment_type = fields
        .next()
        .ok_or_else(|| format!("'{raw}' is missing employment type"))
        .and_then(parse_employment_type)?;
    let monthly_income = parse_field(fields.next(), "income", raw)?;
    if fields.next().is_some() {
        return Err(format!("'{raw}' has too many fields for START:END:TYPE:INCOME"));
    }
    Ok(SpousePeriodArg {
        start_age,
        end_age,
        employment_type,
        monthly_income,
    })
}

fn parse_property(raw: &str) -> Result<PropertyArg, String> {
    let mut fields = raw.split(':').map(str::trim);
    let monthly_income = parse_field(fields.next(), "income", raw)?;
    let loan_end_age = parse_field(fields.next(), "loan end age", raw)?;
    if fields.next().is_some() {
        return Err(format!("'{raw}' has too many fields for INCOME:LOAN_END_AGE"));
    }
    Ok(PropertyArg {
        monthly_income,
        loan_end_age,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildPayload {
    #[serde(default)]
    age: Option<i32>,
    #[serde(default)]
    high_school_type: Option<HighSchoolType>,
    #[serde(default)]
    university_type: Option<UniversityType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpousePeriodPayload {
    start_age: u32,
    end_age: u32,
    #[serde(rename = "type", alias = "employmentType")]
    employment_type: EmploymentType,
    #[serde(alias = "monthlyIncome")]
    income: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyPayload {
    #[serde(alias = "monthlyIncome")]
    income: f64,
    loan_end_age: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    final_age: Option<u32>,

    has_spouse: Option<bool>,
    spouse_age: Option<u32>,
    spouse_income_periods: Option<Vec<SpousePeriodPayload>>,
    has_children: Option<bool>,
    children: Option<Vec<ChildPayload>>,

    primary_income: Option<f64>,
    salary_increase_rate: Option<f64>,
    bonus: Option<f64>,
    side_income: Option<f64>,

    housing: Option<f64>,
    groceries: Option<f64>,
    snacks: Option<f64>,
    dining: Option<f64>,
    utilities: Option<f64>,
    communication: Option<f64>,
    insurance: Option<f64>,
    medical: Option<f64>,
    education: Option<f64>,
    car_maintenance: Option<f64>,
    transportation: Option<f64>,
    clothing: Option<f64>,
    entertainment: Option<f64>,
    socializing: Option<f64>,
    miscellaneous: Option<f64>,
    loans: Option<f64>,
    investment: Option<f64>,
    savings1: Option<f64>,
    savings2: Option<f64>,
    current_savings: Option<f64>,

    pension_monthly: Option<f64>,
    pension_months: Option<f64>,
    pension_years: Option<f64>,
    has_retirement_bonus: Option<bool>,
    retirement_bonus: Option<f64>,

    has_real_estate: Option<bool>,
    real_estate_months: Option<f64>,
    real_estate_properties: Option<Vec<PropertyPayload>>,

    loan_start_age: Option<u32>,
    loan_years: Option<u32>,
    loan_monthly_payment: Option<f64>,

    min_retirement_monthly: Option<f64>,
    min_retirement_months: Option<f64>,
    min_retirement_years: Option<f64>,
    comfortable_retirement_monthly: Option<f64>,
    comfortable_retirement_months: Option<f64>,
    comfortable_retirement_years: Option<f64>,

    index_return: Option<f64>,
    active_return: Option<f64>,
    education_return: Option<f64>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("failed to encode plan as JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone, Default)]
struct AppState {
    cache: Arc<Mutex<ProjectionCache>>,
}

fn build_snapshot(args: &PlanArgs) -> Result<PlanSnapshot, PlanError> {
    let snapshot = PlanSnapshot {
        profile: HouseholdProfile {
            current_age: args.current_age,
            retirement_age: args.retirement_age,
            final_age: args.final_age,
            has_spouse: args.has_spouse,
            spouse_age: args.spouse_age,
            has_children: args.has_children,
            children: args
                .children
                .iter()
                .zip(1..)
                .map(|(child, id)| Child {
                    id,
                    age: child.age,
                    high_school_type: child.high_school_type,
                    university_type: child.university_type,
                })
                .collect(),
            spouse_income_periods: args
                .spouse_periods
                .iter()
                .zip(1..)
                .map(|(period, id)| SpouseIncomePeriod {
                    id,
                    start_age: period.start_age,
                    end_age: period.end_age,
                    employment_type: period.employment_type,
                    monthly_income: period.monthly_income,
                })
                .collect(),
        },
        ledger: FinanceLedger {
            primary_income: args.primary_income,
            salary_growth_rate: args.salary_increase_rate,
            bonus: args.bonus,
            side_income: args.side_income,
            expenses: MonthlyExpenses {
                housing: args.housing,
                groceries: args.groceries,
                snacks: args.snacks,
                dining: args.dining,
                utilities: args.utilities,
                communication: args.communication,
                insurance: args.insurance,
                medical: args.medical,
                education: args.education,
                car_maintenance: args.car_maintenance,
                transportation: args.transportation,
                clothing: args.clothing,
                entertainment: args.entertainment,
                socializing: args.socializing,
                miscellaneous: args.miscellaneous,
                loans: args.loans,
                investment: args.investment,
                savings1: args.savings1,
                savings2: args.savings2,
            },
            current_savings: args.current_savings,
        },
        retirement_income: RetirementIncome {
            pension_monthly: args.pension_monthly,
            pension_months_per_year: args.pension_months,
            pension_years: args.pension_years,
            has_retirement_bonus: args.has_retirement_bonus,
            retirement_bonus: args.retirement_bonus,
        },
        real_estate: RealEstateHoldings {
            enabled: args.has_real_estate,
            months_per_year: args.real_estate_months,
            properties: args
                .properties
                .iter()
                .zip(1..)
                .map(|(property, id)| RealEstateProperty {
                    id,
                    monthly_income: property.monthly_income,
                    loan_end_age: property.loan_end_age,
                })
                .collect(),
        },
        loan: LoanTerms {
            start_age: args.loan_start_age,
            loan_years: args.loan_years,
            monthly_payment: args.loan_monthly_payment,
        },
        expense_targets: ExpenseTargets {
            min_monthly: args.min_retirement_monthly,
            min_months_per_year: args.min_retirement_months,
            min_years: args.min_retirement_years,
            comfortable_monthly: args.comfortable_retirement_monthly,
            comfortable_months_per_year: args.comfortable_retirement_months,
            comfortable_years: args.comfortable_retirement_years,
        },
        assumptions: SimulationAssumptions {
            index_return: args.index_return,
            active_return: args.active_return,
            education_return: args.education_return,
            inflation_rate: args.inflation_rate,
        },
    };

    snapshot.validate()?;
    Ok(snapshot)
}

/// Builds, evaluates and pretty-prints the plan described by `args`.
pub fn render_plan(args: &PlanArgs) -> Result<String, CliError> {
    let snapshot = build_snapshot(args)?;
    let result = compute_projection(&snapshot);
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .fallback(not_found_handler)
        .with_state(AppState::default())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "lifeplan HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(
    State(state): State<AppState>,
    payload: Result<Query<PlanPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => plan_handler_impl(&state, payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn plan_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<PlanPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => plan_handler_impl(&state, payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn plan_handler_impl(state: &AppState, payload: PlanPayload) -> Response {
    let snapshot = match snapshot_from_payload(payload) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "rejected plan request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    // A request that panicked mid-compute leaves the previous entry intact.
    let mut cache = state.cache.lock().unwrap_or_else(PoisonError::into_inner);
    let result = cache.get_or_compute(&snapshot);
    let stats = cache.stats();
    drop(cache);

    debug!(
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        "plan request served"
    );
    json_response(StatusCode::OK, result.as_ref())
}

fn no_store() -> HeaderValue {
    HeaderValue::from_static("no-store")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, no_store());
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn snapshot_from_json(json: &str) -> Result<PlanSnapshot, String> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    snapshot_from_payload(payload).map_err(|e| e.to_string())
}

fn snapshot_from_payload(payload: PlanPayload) -> Result<PlanSnapshot, PlanError> {
    let mut args = default_plan_args();

    if let Some(v) = payload.current_age {
        args.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.final_age {
        args.final_age = v;
    }

    if let Some(v) = payload.has_spouse {
        args.has_spouse = v;
    }
    if let Some(v) = payload.spouse_age {
        args.spouse_age = v;
    }
    if let Some(periods) = payload.spouse_income_periods {
        args.spouse_periods = periods
            .into_iter()
            .map(|p| SpousePeriodArg {
                start_age: p.start_age,
                end_age: p.end_age,
                employment_type: p.employment_type,
                monthly_income: p.income,
            })
            .collect();
    }
    if let Some(v) = payload.has_children {
        args.has_children = v;
    }
    if let Some(children) = payload.children {
        args.children = children
            .into_iter()
            .map(|c| ChildArg {
                age: c.age,
                high_school_type: c.high_school_type.unwrap_or(HighSchoolType::Public),
                university_type: c.university_type.unwrap_or(UniversityType::PublicScience),
            })
            .collect();
    }

    if let Some(v) = payload.primary_income {
        args.primary_income = v;
    }
    if let Some(v) = payload.salary_increase_rate {
        args.salary_increase_rate = v;
    }
    if let Some(v) = payload.bonus {
        args.bonus = v;
    }
    if let Some(v) = payload.side_income {
        args.side_income = v;
    }

    for (slot, value) in [
        (&mut args.housing, payload.housing),
        (&mut args.groceries, payload.groceries),
        (&mut args.snacks, payload.snacks),
        (&mut args.dining, payload.dining),
        (&mut args.utilities, payload.utilities),
        (&mut args.communication, payload.communication),
        (&mut args.insurance, payload.insurance),
        (&mut args.medical, payload.medical),
        (&mut args.education, payload.education),
        (&mut args.car_maintenance, payload.car_maintenance),
        (&mut args.transportation, payload.transportation),
        (&mut args.clothing, payload.clothing),
        (&mut args.entertainment, payload.entertainment),
        (&mut args.socializing, payload.socializing),
        (&mut args.miscellaneous, payload.miscellaneous),
        (&mut args.loans, payload.loans),
        (&mut args.investment, payload.investment),
        (&mut args.savings1, payload.savings1),
        (&mut args.savings2, payload.savings2),
    ] {
        if let Some(v) = value {
            *slot = v;
        }
    }
    if let Some(v) = payload.current_savings {
        args.current_savings = v;
    }

    if let Some(v) = payload.pension_monthly {
        args.pension_monthly = v;
    }
    if let Some(v) = payload.pension_months {
        args.pension_months = v;
    }
    if let Some(v) = payload.pension_years {
        args.pension_years = v;
    }
    if let Some(v) = payload.has_retirement_bonus {
        args.has_retirement_bonus = v;
    }
    if let Some(v) = payload.retirement_bonus {
        args.retirement_bonus = v;
    }

    if let Some(v) = payload.has_real_estate {
        args.has_real_estate = v;
    }
    if let Some(v) = payload.real_estate_months {
        args.real_estate_months = v;
    }
    if let Some(properties) = payload.real_estate_properties {
        args.properties = properties
            .into_iter()
            .map(|p| PropertyArg {
                monthly_income: p.income,
                loan_end_age: p.loan_end_age,
            })
            .collect();
    }

    if let Some(v) = payload.loan_start_age {
        args.loan_start_age = v;
    }
    if let Some(v) = payload.loan_years {
        args.loan_years = v;
    }
    if let Some(v) = payload.loan_monthly_payment {
        args.loan_monthly_payment = v;
    }

    if let Some(v) = payload.min_retirement_monthly {
        args.min_retirement_monthly = v;
    }
    if let Some(v) = payload.min_retirement_months {
        args.min_retirement_months = v;
    }
    if let Some(v) = payload.min_retirement_years {
        args.min_retirement_years = v;
    }
    if let Some(v) = payload.comfortable_retirement_monthly {
        args.comfortable_retirement_monthly = v;
    }
    if let Some(v) = payload.comfortable_retirement_months {
        args.comfortable_retirement_months = v;
    }
    if let Some(v) = payload.comfortable_retirement_years {
        args.comfortable_retirement_years = v;
    }

    if let Some(v) = payload.index_return {
        args.index_return = v;
    }
    if let Some(v) = payload.active_return {
        args.active_return = v;
    }
    if let Some(v) = payload.education_return {
        args.education_return = v;
    }
    if let Some(v) = payload.inflation_rate {
        args.inflation_rate = v;
    }

    build_snapshot(&args)
}

fn default_plan_args() -> PlanArgs {
    PlanArgs {
        current_age: 25,
        retirement_age: 65,
        final_age: 95,
        has_spouse: false,
        spouse_age: 0,
        spouse_periods: vec![SpousePeriodArg {
            start_age: 25,
            end_age: 65,
            employment_type: EmploymentType::Fulltime,
            monthly_income: 20.0,
        }],
        has_children: false,
        children: Vec::new(),
        primary_income: 30.0,
        salary_increase_rate: 1.0,
        bonus: 0.0,
        side_income: 0.0,
        housing: 3.0,
        groceries: 2.0,
        snacks: 1.0,
        dining: 2.0,
        utilities: 2.0,
        communication: 1.0,
        insurance: 1.0,
        medical: 0.0,
        education: 0.0,
        car_maintenance: 0.0,
        transportation: 1.0,
        clothing: 1.0,
        entertainment: 3.0,
        socializing: 0.0,
        miscellaneous: 1.0,
        loans: 0.0,
        investment: 3.0,
        savings1: 0.0,
        savings2: 3.0,
        current_savings: 100.0,
        pension_monthly: 10.7,
        pension_months: 12.0,
        pension_years: 30.0,
        has_retirement_bonus: true,
        retirement_bonus: 600.0,
        has_real_estate: false,
        real_estate_months: 12.0,
        properties: vec![PropertyArg {
            monthly_income: 0.0,
            loan_end_age: 60,
        }],
        loan_start_age: 30,
        loan_years: 35,
        loan_monthly_payment: 0.0,
        min_retirement_monthly: 28.2,
        min_retirement_months: 12.0,
        min_retirement_years: 30.0,
        comfortable_retirement_monthly: 37.9,
        comfortable_retirement_months: 12.0,
        comfortable_retirement_years: 30.0,
        index_return: 4.0,
        active_return: 6.5,
        education_return: 3.0,
        inflation_rate: 2.0,
    }
}
