//! Compounding and annuity helpers shared by every calculator.
//!
//! All amounts are in man-yen; rates passed in here are already per month
//! unless the function name says otherwise.

pub const MONTHS_PER_YEAR: u32 = 12;

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Annual percentage rate to a simple monthly rate (`6.5` -> `0.065 / 12`).
pub fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / MONTHS_PER_YEAR as f64
}

/// `(1 + rate%)^years`, with negative `years` allowed for children born later.
pub fn inflation_multiplier(annual_percent: f64, years: i32) -> f64 {
    (1.0 + annual_percent / 100.0).powi(years)
}

/// Level monthly payment that grows to `target` after `months` deposits at
/// `monthly_rate`, i.e. the future-value-of-annuity relation solved for PMT.
///
/// Degenerate inputs (non-positive target, zero horizon, or a rate that makes
/// the growth factor non-positive) yield 0. A zero rate falls back to
/// straight-line saving.
pub fn required_monthly_contribution(target: f64, monthly_rate: f64, months: u32) -> f64 {
    if !(target > 0.0) || months == 0 {
        return 0.0;
    }
    if monthly_rate.abs() < 1e-12 {
        return target / months as f64;
    }

    let growth = (1.0 + monthly_rate).powi(months as i32) - 1.0;
    if !(growth > 0.0) {
        return 0.0;
    }
    finite_or_zero(target * monthly_rate / growth)
}

/// One month of the bucket recurrence: interest first, then the deposit.
pub fn compound_month(balance: f64, monthly_rate: f64, contribution: f64) -> f64 {
    balance * (1.0 + monthly_rate) + contribution
}

pub fn accumulate(contribution: f64, monthly_rate: f64, months: u32) -> f64 {
    (0..months).fold(0.0, |balance, _| {
        compound_month(balance, monthly_rate, contribution)
    })
}

/// Rounds to one decimal, half-up (`-1.25` -> `-1.2`).
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
