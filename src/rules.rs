//! Discount Rules
//!
//! Bulk-quantity discount rules configured by administrators. Rules are
//! read-only input to the pricing pipeline; loose rule-store shapes are
//! validated into [`RuleEffect`] at the boundary so malformed rules can never
//! reach pricing.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

use crate::{items::LineItem, panels::PanelKind};

new_key_type! {
    /// Discount Rule Key
    pub struct RuleKey;
}

/// Errors raised when validating rule definitions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RuleError {
    /// A rule defined both a percentage and a fixed weekly price.
    #[error("rule defines both a percentage and a fixed weekly price")]
    ConflictingEffects,

    /// A rule defined neither a percentage nor a fixed weekly price.
    #[error("rule defines neither a percentage nor a fixed weekly price")]
    MissingEffect,

    /// Percentage outside the valid range.
    #[error("discount percentage must be above 0% and at most 100%")]
    PercentOutOfRange,

    /// Fixed weekly price below zero.
    #[error("fixed weekly price cannot be negative")]
    NegativeFixedPrice,

    /// Quantity threshold that could never gate anything.
    #[error("minimum quantity must be at least 1")]
    ZeroMinimumQuantity,
}

/// Price effect applied by a matched rule.
///
/// Exactly one effect applies per rule; the conflicting "both or neither set"
/// shapes seen in loose rule stores are rejected by [`RuleEffect::from_parts`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RuleEffect<'a> {
    /// Fractional percentage off the weekly price (e.g. 0.15 for 15% off).
    PercentOff(Percentage),

    /// The weekly price is replaced with a fixed amount.
    FixedWeekly(Money<'a, Currency>),
}

impl<'a> RuleEffect<'a> {
    /// Build an effect from the loose optional pair used by rule stores.
    ///
    /// # Errors
    ///
    /// - [`RuleError::ConflictingEffects`]: both fields were set.
    /// - [`RuleError::MissingEffect`]: neither field was set.
    /// - [`RuleError::PercentOutOfRange`]: percentage not in (0%, 100%].
    /// - [`RuleError::NegativeFixedPrice`]: fixed weekly price below zero.
    pub fn from_parts(
        percent: Option<Percentage>,
        fixed_weekly: Option<Money<'a, Currency>>,
    ) -> Result<Self, RuleError> {
        match (percent, fixed_weekly) {
            (Some(_), Some(_)) => Err(RuleError::ConflictingEffects),
            (None, None) => Err(RuleError::MissingEffect),
            (Some(percent), None) => {
                let fraction = percent * Decimal::ONE;

                if fraction > Decimal::ZERO && fraction <= Decimal::ONE {
                    Ok(Self::PercentOff(percent))
                } else {
                    Err(RuleError::PercentOutOfRange)
                }
            }
            (None, Some(amount)) => {
                if amount.to_minor_units() < 0 {
                    Err(RuleError::NegativeFixedPrice)
                } else {
                    Ok(Self::FixedWeekly(amount))
                }
            }
        }
    }
}

/// A bulk-quantity discount rule.
///
/// Each filter dimension is optional; `None` matches anything. The rule only
/// applies to an item once enough cart items satisfy all of its filters.
#[derive(Debug, Clone)]
pub struct DiscountRule<'a> {
    key: RuleKey,
    name: String,
    kind: Option<PanelKind>,
    owner: Option<String>,
    city: Option<String>,
    min_quantity: usize,
    effect: RuleEffect<'a>,
    priority: i32,
    active: bool,
}

impl<'a> DiscountRule<'a> {
    /// Create an unfiltered rule with the given threshold and effect.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError::ZeroMinimumQuantity`] if `min_quantity` is zero.
    pub fn new(
        key: RuleKey,
        name: impl Into<String>,
        min_quantity: usize,
        effect: RuleEffect<'a>,
    ) -> Result<Self, RuleError> {
        if min_quantity == 0 {
            return Err(RuleError::ZeroMinimumQuantity);
        }

        Ok(Self {
            key,
            name: name.into(),
            kind: None,
            owner: None,
            city: None,
            min_quantity,
            effect,
            priority: 0,
            active: true,
        })
    }

    /// Restrict the rule to a panel format.
    #[must_use]
    pub fn with_kind(mut self, kind: PanelKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict the rule to panels of one owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Restrict the rule to panels in one city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the tie-break priority; higher wins.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Enable or disable the rule; inactive rules never match.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Return the rule key.
    pub fn key(&self) -> RuleKey {
        self.key
    }

    /// Administrator-facing rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Panel format filter.
    pub fn kind(&self) -> Option<PanelKind> {
        self.kind
    }

    /// Owner filter.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// City filter.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Cart quantity required before the rule applies.
    pub fn min_quantity(&self) -> usize {
        self.min_quantity
    }

    /// Price effect applied once the quantity gate is met.
    pub fn effect(&self) -> &RuleEffect<'a> {
        &self.effect
    }

    /// Tie-break priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the rule participates in matching at all.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of filter dimensions this rule constrains.
    ///
    /// Used as the second tie-break: at equal priority, the more specific
    /// rule wins.
    pub fn specificity(&self) -> usize {
        usize::from(self.kind.is_some())
            + usize::from(self.owner.is_some())
            + usize::from(self.city.is_some())
    }

    /// Whether the rule's filters accept the given item.
    ///
    /// Every `None` filter is a wildcard; set filters require exact equality.
    pub fn matches(&self, item: &LineItem<'_>) -> bool {
        if self.kind.is_some_and(|kind| kind != item.kind()) {
            return false;
        }

        if self
            .owner
            .as_deref()
            .is_some_and(|owner| item.owner() != Some(owner))
        {
            return false;
        }

        if self.city.as_deref().is_some_and(|city| item.city() != city) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::TRY;
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::panels::PanelKey;

    use super::*;

    fn clp_item<'a>() -> LineItem<'a> {
        LineItem::new(
            PanelKey::default(),
            PanelKind::Clp,
            "Kocaeli",
            Money::from_minor(2000, TRY),
        )
        .with_owner("CityVision")
    }

    #[test]
    fn from_parts_rejects_both_fields_set() {
        let result = RuleEffect::from_parts(
            Some(Percentage::from(0.10)),
            Some(Money::from_minor(1500, TRY)),
        );

        assert_eq!(result, Err(RuleError::ConflictingEffects));
    }

    #[test]
    fn from_parts_rejects_neither_field_set() {
        let result = RuleEffect::from_parts(None, None);

        assert_eq!(result, Err(RuleError::MissingEffect));
    }

    #[test]
    fn from_parts_rejects_zero_and_over_100_percent() {
        assert_eq!(
            RuleEffect::from_parts(Some(Percentage::from(0.0)), None),
            Err(RuleError::PercentOutOfRange)
        );
        assert_eq!(
            RuleEffect::from_parts(Some(Percentage::from(1.5)), None),
            Err(RuleError::PercentOutOfRange)
        );
    }

    #[test]
    fn from_parts_accepts_full_discount() -> TestResult {
        let effect = RuleEffect::from_parts(Some(Percentage::from(1.0)), None)?;

        assert!(matches!(effect, RuleEffect::PercentOff(_)));

        Ok(())
    }

    #[test]
    fn from_parts_rejects_negative_fixed_price() {
        let result = RuleEffect::from_parts(None, Some(Money::from_minor(-1, TRY)));

        assert_eq!(result, Err(RuleError::NegativeFixedPrice));
    }

    #[test]
    fn new_rejects_zero_minimum_quantity() {
        let result = DiscountRule::new(
            RuleKey::default(),
            "Bulk CLP",
            0,
            RuleEffect::PercentOff(Percentage::from(0.10)),
        );

        assert!(matches!(result, Err(RuleError::ZeroMinimumQuantity)));
    }

    #[test]
    fn key_returns_constructor_key() -> TestResult {
        let mut keys = SlotMap::<RuleKey, ()>::with_key();
        let key = keys.insert(());

        let rule = DiscountRule::new(
            key,
            "Bulk CLP",
            20,
            RuleEffect::FixedWeekly(Money::from_minor(1500, TRY)),
        )?;

        assert_eq!(rule.key(), key);
        assert_ne!(rule.key(), RuleKey::default());

        Ok(())
    }

    #[test]
    fn unfiltered_rule_matches_any_item() -> TestResult {
        let rule = DiscountRule::new(
            RuleKey::default(),
            "Everything",
            1,
            RuleEffect::PercentOff(Percentage::from(0.05)),
        )?;

        assert!(rule.matches(&clp_item()));
        assert_eq!(rule.specificity(), 0);

        Ok(())
    }

    #[test]
    fn filters_require_exact_equality() -> TestResult {
        let rule = DiscountRule::new(
            RuleKey::default(),
            "CLP Kocaeli CityVision",
            1,
            RuleEffect::PercentOff(Percentage::from(0.05)),
        )?
        .with_kind(PanelKind::Clp)
        .with_city("Kocaeli")
        .with_owner("CityVision");

        assert!(rule.matches(&clp_item()));
        assert_eq!(rule.specificity(), 3);

        let other_city = LineItem::new(
            PanelKey::default(),
            PanelKind::Clp,
            "İstanbul",
            Money::from_minor(2000, TRY),
        )
        .with_owner("CityVision");

        assert!(!rule.matches(&other_city));

        Ok(())
    }

    #[test]
    fn owner_filter_rejects_items_without_owner() -> TestResult {
        let rule = DiscountRule::new(
            RuleKey::default(),
            "CityVision only",
            1,
            RuleEffect::PercentOff(Percentage::from(0.05)),
        )?
        .with_owner("CityVision");

        let no_owner = LineItem::new(
            PanelKey::default(),
            PanelKind::Clp,
            "Kocaeli",
            Money::from_minor(2000, TRY),
        );

        assert!(!rule.matches(&no_owner));
        assert!(rule.matches(&clp_item()));

        Ok(())
    }

    #[test]
    fn builder_setters_are_reflected_in_accessors() -> TestResult {
        let rule = DiscountRule::new(
            RuleKey::default(),
            "Seasonal",
            5,
            RuleEffect::PercentOff(Percentage::from(0.15)),
        )?
        .with_kind(PanelKind::Billboard)
        .with_priority(10)
        .with_active(false);

        assert_eq!(rule.name(), "Seasonal");
        assert_eq!(rule.kind(), Some(PanelKind::Billboard));
        assert_eq!(rule.min_quantity(), 5);
        assert_eq!(rule.priority(), 10);
        assert!(!rule.is_active());

        Ok(())
    }
}
