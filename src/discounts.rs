//! Discount utilities
//!
//! Minor-unit arithmetic shared by rule application and suggestion
//! estimates. All percentage maths happens in decimal space and rounds
//! half-away-from-zero once, at the minor-unit boundary.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::rules::RuleEffect;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate the weekly unit price in minor units after applying a rule effect.
///
/// Percentage effects subtract the rounded percentage of the base price;
/// fixed effects replace the base price outright. The result is clamped at
/// zero so an over-large percentage never yields a negative price.
///
/// # Errors
///
/// Returns an error if:
/// - Percentage calculation overflows or cannot be safely represented.
pub fn discounted_weekly_minor(
    effect: &RuleEffect<'_>,
    base_minor: i64,
) -> Result<i64, DiscountError> {
    let discounted_minor = match effect {
        RuleEffect::PercentOff(percent) => base_minor
            .checked_sub(percent_of_minor(percent, base_minor)?)
            .ok_or(DiscountError::PercentConversion)?,
        RuleEffect::FixedWeekly(amount) => amount.to_minor_units(),
    };

    Ok(0.max(discounted_minor))
}
