const MONTHS_PER_YEAR: f64 = 12.0;

/// Total owed after `months` of monthly compounding, `P * (1 + r/12)^n`.
///
/// `annual_rate` is a decimal fraction (0.05 for 5%). Inputs are not
/// validated. The result is rounded to cents, ties to even.
pub fn total_amount(principal: f64, annual_rate: f64, months: i32) -> f64 {
    let accrued = principal * (1.0 + annual_rate / MONTHS_PER_YEAR).powi(months);
    round_cents(accrued)
}

// Above this magnitude an f64 has no cent digits left, and scaling by 100
// could overflow to infinity.
const MAX_ROUNDED: f64 = 1e15;

fn round_cents(amount: f64) -> f64 {
    if !amount.is_finite() || amount.abs() >= MAX_ROUNDED {
        return amount;
    }
    (amount * 100.0).round_ties_even() / 100.0
}
