//! Rule Fixtures

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, panels::parse_price},
    panels::PanelKind,
    rules::{DiscountRule, RuleEffect, RuleKey},
};

/// Wrapper for rules in YAML
#[derive(Debug, Deserialize)]
pub struct RulesFixture {
    /// Map of rule key -> rule fixture
    pub rules: FxHashMap<String, RuleFixture>,
}

/// Discount rule fixture from YAML
///
/// Carries the loose optional effect pair exactly as rule stores do; the
/// mutually-exclusive check happens in [`RuleEffect::from_parts`].
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// Rule name
    pub name: String,

    /// Panel format filter
    pub kind: Option<PanelKind>,

    /// Owner filter
    pub owner: Option<String>,

    /// City filter
    pub city: Option<String>,

    /// Cart quantity required before the rule applies
    pub min_quantity: usize,

    /// Percentage off (e.g., "15%" or "0.15")
    pub percent: Option<String>,

    /// Fixed weekly price (e.g., "1500.00 TRY")
    pub fixed_weekly: Option<String>,

    /// Tie-break priority
    #[serde(default)]
    pub priority: i32,

    /// Whether the rule participates in matching
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl RuleFixture {
    /// Convert into a validated [`DiscountRule`] under the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage or price strings cannot be parsed,
    /// or the effect pair is conflicting, missing, or out of range.
    pub fn try_into_rule(self, key: RuleKey) -> Result<DiscountRule<'static>, FixtureError> {
        let percent = self
            .percent
            .as_deref()
            .map(parse_percentage)
            .transpose()?;

        let fixed_weekly = self
            .fixed_weekly
            .as_deref()
            .map(|price| {
                let (minor_units, currency) = parse_price(price)?;

                Ok::<_, FixtureError>(Money::from_minor(minor_units, currency))
            })
            .transpose()?;

        let effect = RuleEffect::from_parts(percent, fixed_weekly)?;

        let mut rule = DiscountRule::new(key, self.name, self.min_quantity, effect)?
            .with_priority(self.priority)
            .with_active(self.active);

        if let Some(kind) = self.kind {
            rule = rule.with_kind(kind);
        }

        if let Some(owner) = self.owner {
            rule = rule.with_owner(owner);
        }

        if let Some(city) = self.city {
            rule = rule.with_city(city);
        }

        Ok(rule)
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        // Convert from percent points to a fraction (15 -> 0.15)
        Ok(Percentage::from(value / 100.0))
    } else {
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::rules::RuleError;

    use super::*;

    fn fixture_from_yaml(yaml: &str) -> Result<RuleFixture, serde_norway::Error> {
        serde_norway::from_str(yaml)
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("15%")?, Percentage::from(0.15));
        assert_eq!(parse_percentage("0.15")?, Percentage::from(0.15));
        assert_eq!(parse_percentage("  25%  ")?, Percentage::from(0.25));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_format() {
        let result = parse_percentage("invalid");

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(_))));
    }

    #[test]
    fn rule_fixture_builds_fixed_weekly_rule() -> TestResult {
        let fixture = fixture_from_yaml(
            r#"
name: "CLP Kocaeli 20+"
kind: clp
owner: ~
city: Kocaeli
min_quantity: 20
percent: ~
fixed_weekly: "1500.00 TRY"
priority: 10
"#,
        )?;

        let rule = fixture.try_into_rule(RuleKey::default())?;

        assert_eq!(rule.name(), "CLP Kocaeli 20+");
        assert_eq!(rule.kind(), Some(PanelKind::Clp));
        assert_eq!(rule.city(), Some("Kocaeli"));
        assert_eq!(rule.min_quantity(), 20);
        assert_eq!(rule.priority(), 10);
        assert!(rule.is_active());
        assert!(matches!(
            rule.effect(),
            RuleEffect::FixedWeekly(amount) if amount.to_minor_units() == 150_000
        ));

        Ok(())
    }

    #[test]
    fn rule_fixture_builds_percent_rule() -> TestResult {
        let fixture = fixture_from_yaml(
            r"
name: Billboard pair
kind: billboard
owner: ~
city: ~
min_quantity: 2
percent: 10%
fixed_weekly: ~
",
        )?;

        let rule = fixture.try_into_rule(RuleKey::default())?;

        assert!(matches!(
            rule.effect(),
            RuleEffect::PercentOff(percent) if *percent == Percentage::from(0.10)
        ));
        assert_eq!(rule.priority(), 0);

        Ok(())
    }

    #[test]
    fn rule_fixture_rejects_conflicting_effects() -> TestResult {
        let fixture = fixture_from_yaml(
            r#"
name: Broken
kind: ~
owner: ~
city: ~
min_quantity: 2
percent: 10%
fixed_weekly: "1500.00 TRY"
"#,
        )?;

        let result = fixture.try_into_rule(RuleKey::default());

        assert!(matches!(
            result,
            Err(FixtureError::Rule(RuleError::ConflictingEffects))
        ));

        Ok(())
    }

    #[test]
    fn rule_fixture_rejects_missing_effect() -> TestResult {
        let fixture = fixture_from_yaml(
            r"
name: Broken
kind: ~
owner: ~
city: ~
min_quantity: 2
percent: ~
fixed_weekly: ~
",
        )?;

        let result = fixture.try_into_rule(RuleKey::default());

        assert!(matches!(
            result,
            Err(FixtureError::Rule(RuleError::MissingEffect))
        ));

        Ok(())
    }

    #[test]
    fn rule_fixture_respects_active_flag() -> TestResult {
        let fixture = fixture_from_yaml(
            r"
name: Paused
kind: ~
owner: ~
city: ~
min_quantity: 2
percent: 10%
fixed_weekly: ~
active: false
",
        )?;

        let rule = fixture.try_into_rule(RuleKey::default())?;

        assert!(!rule.is_active());

        Ok(())
    }
}
