//! Quotes
//!
//! Availability-checked price previews for adding one panel to an existing
//! cart. Range validity is checked before availability, so an inverted range
//! surfaces as its own error rather than a spurious blocked-day report.

use jiff::civil::Date;
use thiserror::Error;

use crate::{
    availability::AvailabilityError,
    cart::{Cart, CartError},
    items::LineItem,
    panels::{Panel, PanelKey},
    pricing::{CartTotals, PricedLine, PricingError, price_cart},
    rental::{InvalidDateRange, RentalPeriod},
    rules::DiscountRule,
};

/// Errors raised while validating and pricing a candidate addition.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The requested range is inverted.
    #[error(transparent)]
    InvalidRange(#[from] InvalidDateRange),

    /// The panel is blocked in the range or the range is too short.
    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    /// The candidate item could not join the cart.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Pricing the extended cart failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The priced result did not contain the candidate line.
    #[error("priced cart did not contain the candidate line")]
    MissingCandidate,
}

/// Price preview for adding one panel to a cart.
#[derive(Debug, Clone)]
pub struct Quote<'a> {
    line: PricedLine<'a>,
    totals: CartTotals<'a>,
}

impl<'a> Quote<'a> {
    /// Pricing outcome for the candidate line itself.
    pub fn line(&self) -> &PricedLine<'a> {
        &self.line
    }

    /// Totals for the cart including the candidate.
    pub fn totals(&self) -> &CartTotals<'a> {
        &self.totals
    }
}

/// Validate a requested rental against a panel and preview the price of the
/// cart with the candidate added.
///
/// The cart itself is not modified; on success the caller can commit the
/// candidate item knowing its dates are rentable.
///
/// # Errors
///
/// - [`QuoteError::InvalidRange`]: `end` precedes `start`.
/// - [`QuoteError::Availability`]: the range is shorter than the panel's
///   minimum rental length, or covers a blocked day.
/// - [`QuoteError::Cart`]: the panel's currency does not match the cart.
/// - [`QuoteError::Pricing`]: pricing the extended cart failed.
pub fn validate_and_price<'a>(
    panel_key: PanelKey,
    panel: &Panel<'a>,
    start: Date,
    end: Date,
    cart: &Cart<'a>,
    rules: &[DiscountRule<'a>],
) -> Result<Quote<'a>, QuoteError> {
    let period = RentalPeriod::new(start, end)?;

    panel.check_minimum_duration(&period)?;
    panel.validate_range(&period)?;

    let candidate = LineItem::for_panel(panel_key, panel).with_rental(period);

    let mut items: Vec<LineItem<'a>> = cart.items().to_vec();
    items.push(candidate);

    let extended = Cart::with_items(items, cart.currency())?;
    let totals = price_cart(&extended, rules)?;

    let line = totals
        .lines()
        .last()
        .cloned()
        .ok_or(QuoteError::MissingCandidate)?;

    Ok(Quote { line, totals })
}
