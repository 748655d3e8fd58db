//! Pano prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    availability::{AvailabilityError, BlockedRange, DEFAULT_MIN_RENTAL_DAYS},
    cart::{Cart, CartError},
    discounts::DiscountError,
    fixtures::{Fixture, FixtureError},
    items::LineItem,
    matching::{best_rule, matching_quantity, quantity_gate_met},
    panels::{Panel, PanelKey, PanelKind},
    pricing::{
        CartTotals, PricedLine, PricingError, PricingOptions, price_cart,
        price_cart_with_options,
    },
    quotes::{Quote, QuoteError, validate_and_price},
    rental::{InvalidDateRange, RentalPeriod},
    rules::{DiscountRule, RuleEffect, RuleError, RuleKey},
    suggestions::{Suggestion, suggestions},
    summary::{SummaryError, write_summary},
};
