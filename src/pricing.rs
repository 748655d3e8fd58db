//! Cart Pricing
//!
//! The single pricing pipeline: aggregate quantities, match rules, price each
//! line, then compute threshold suggestions. Every call site (cart view,
//! checkout summary, quote preview) goes through [`price_cart`] so totals can
//! never drift apart.
//!
//! Pricing is a pure function of the supplied snapshot: calling it twice with
//! the same cart and rule set yields identical totals, and nothing is cached
//! between calls.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cart::Cart,
    discounts::{DiscountError, discounted_weekly_minor},
    items::LineItem,
    matching::best_rule,
    rules::{DiscountRule, RuleKey},
    suggestions::{Suggestion, suggestions},
};

/// Errors that can occur while pricing a cart.
///
/// Well-formed carts price without error; these cover arithmetic overflow and
/// mismatched modifier currencies.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Discount arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// A line or cart total overflowed the minor-unit range.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// A flat fee used a different currency than the cart.
    #[error("fee currency {fee} does not match cart currency {cart}")]
    FeeCurrencyMismatch {
        /// Currency of the rejected fee.
        fee: &'static str,

        /// Currency of the cart being priced.
        cart: &'static str,
    },
}

/// Cart-wide pricing modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingOptions<'a> {
    /// Flat design-service fee added to the total only; it is never part of
    /// the subtotal and never discounted.
    pub design_fee: Option<Money<'a, Currency>>,
}

/// Pricing outcome for a single cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine<'a> {
    /// Index of the line in the cart.
    pub item_idx: usize,

    /// Rule whose effect is reflected in the unit price, if any.
    pub applied_rule: Option<RuleKey>,

    /// Weekly price per side before any discount.
    pub base_weekly: Money<'a, Currency>,

    /// Weekly price per side after the rule effect.
    pub unit_weekly: Money<'a, Currency>,

    /// Number of charged weeks.
    pub weeks: i64,

    /// Number of charged sides (2 for a double-sided CLP rental).
    pub sides: i64,

    /// Line total at base prices.
    pub line_subtotal: Money<'a, Currency>,

    /// Line total after the rule effect.
    pub line_total: Money<'a, Currency>,

    /// Amount saved on this line.
    pub savings: Money<'a, Currency>,
}

/// Computed totals for a priced cart. Never persisted; recomputed from a
/// fresh snapshot on every cart mutation.
#[derive(Debug, Clone)]
pub struct CartTotals<'a> {
    lines: Vec<PricedLine<'a>>,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    design_fee: Option<Money<'a, Currency>>,
    suggestions: SmallVec<[Suggestion<'a>; 4]>,
    currency: &'static Currency,
}

impl<'a> CartTotals<'a> {
    /// Per-line pricing outcomes, in cart order.
    pub fn lines(&self) -> &[PricedLine<'a>] {
        &self.lines
    }

    /// Sum of line totals at base prices.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Sum of per-line savings.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable: subtotal minus discount, plus any flat fee.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Flat fee included in the total, if one was applied.
    pub fn design_fee(&self) -> Option<&Money<'a, Currency>> {
        self.design_fee.as_ref()
    }

    /// Threshold-unlock nudges, one per eligible panel format.
    pub fn suggestions(&self) -> &[Suggestion<'a>] {
        &self.suggestions
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Discount relative to the pre-discount subtotal, as a fraction.
    pub fn savings_percent(&self) -> Percentage {
        let discount_minor = self.discount.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Percentage::from(0.0);
        }

        let discount_dec = Decimal::from_i64(discount_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Percentage::from(discount_dec / subtotal_dec)
    }
}

/// Price a cart against the supplied rule set.
///
/// # Errors
///
/// Returns a [`PricingError`] if discount arithmetic fails or a total
/// overflows the minor-unit range.
pub fn price_cart<'a>(
    cart: &Cart<'a>,
    rules: &[DiscountRule<'a>],
) -> Result<CartTotals<'a>, PricingError> {
    price_cart_with_options(cart, rules, PricingOptions::default())
}

/// Price a cart against the supplied rule set with cart-wide modifiers.
///
/// # Errors
///
/// Returns a [`PricingError`] if discount arithmetic fails, a total overflows
/// the minor-unit range, or a fee uses a different currency than the cart.
pub fn price_cart_with_options<'a>(
    cart: &Cart<'a>,
    rules: &[DiscountRule<'a>],
    options: PricingOptions<'a>,
) -> Result<CartTotals<'a>, PricingError> {
    let currency = cart.currency();
    let items = cart.items();

    let mut lines = Vec::with_capacity(items.len());
    let mut subtotal_minor = 0i64;
    let mut discount_minor = 0i64;

    for (item_idx, item) in items.iter().enumerate() {
        let line = price_line(item_idx, item, items, rules, currency)?;

        subtotal_minor = subtotal_minor
            .checked_add(line.line_subtotal.to_minor_units())
            .ok_or(PricingError::Overflow)?;

        discount_minor = discount_minor
            .checked_add(line.savings.to_minor_units())
            .ok_or(PricingError::Overflow)?;

        lines.push(line);
    }

    let mut total_minor = subtotal_minor
        .checked_sub(discount_minor)
        .ok_or(PricingError::Overflow)?;

    if let Some(fee) = options.design_fee {
        if fee.currency() != currency {
            return Err(PricingError::FeeCurrencyMismatch {
                fee: fee.currency().iso_alpha_code,
                cart: currency.iso_alpha_code,
            });
        }

        total_minor = total_minor
            .checked_add(fee.to_minor_units())
            .ok_or(PricingError::Overflow)?;
    }

    let suggestions = suggestions(items, rules)?;

    Ok(CartTotals {
        lines,
        subtotal: Money::from_minor(subtotal_minor, currency),
        discount: Money::from_minor(discount_minor, currency),
        total: Money::from_minor(total_minor, currency),
        design_fee: options.design_fee,
        suggestions,
        currency,
    })
}

fn price_line<'a>(
    item_idx: usize,
    item: &LineItem<'a>,
    items: &[LineItem<'a>],
    rules: &[DiscountRule<'a>],
    currency: &'static Currency,
) -> Result<PricedLine<'a>, PricingError> {
    let base_minor = item.weekly_price().to_minor_units();

    // Discounts apply to the single-sided weekly price; the double-sided
    // multiplier scales base and discounted amounts alike afterwards.
    let (applied_rule, unit_minor) = match best_rule(item, items, rules) {
        Some(rule) => {
            let discounted = discounted_weekly_minor(rule.effect(), base_minor)?;

            // A rule never raises a line's price; a fixed weekly price above
            // the base is treated as not applying.
            if discounted < base_minor {
                (Some(rule.key()), discounted)
            } else {
                (None, base_minor)
            }
        }
        None => (None, base_minor),
    };

    let weeks = item.weeks();
    let sides = item.sides();

    let factor = weeks.checked_mul(sides).ok_or(PricingError::Overflow)?;

    let line_subtotal = base_minor
        .checked_mul(factor)
        .ok_or(PricingError::Overflow)?;

    let line_total = unit_minor
        .checked_mul(factor)
        .ok_or(PricingError::Overflow)?;

    let savings = line_subtotal
        .checked_sub(line_total)
        .ok_or(PricingError::Overflow)?;

    Ok(PricedLine {
        item_idx,
        applied_rule,
        base_weekly: Money::from_minor(base_minor, currency),
        unit_weekly: Money::from_minor(unit_minor, currency),
        weeks,
        sides,
        line_subtotal: Money::from_minor(line_subtotal, currency),
        line_total: Money::from_minor(line_total, currency),
        savings: Money::from_minor(savings, currency),
    })
}
