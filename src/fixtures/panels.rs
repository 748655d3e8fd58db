//! Panel Fixtures

use jiff::civil::Date;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, TRY, USD},
};
use serde::Deserialize;

use crate::{availability::BlockedRange, fixtures::FixtureError, panels::{Panel, PanelKind}};

/// Wrapper for panels in YAML
#[derive(Debug, Deserialize)]
pub struct PanelsFixture {
    /// Map of panel key -> panel fixture
    pub panels: FxHashMap<String, PanelFixture>,
}

/// Panel Fixture
#[derive(Debug, Deserialize)]
pub struct PanelFixture {
    /// Panel name
    pub name: String,

    /// Panel format
    pub kind: PanelKind,

    /// City the panel stands in
    pub city: String,

    /// Owner of the physical asset
    pub owner: Option<String>,

    /// Weekly price (e.g., "2000.00 TRY")
    pub weekly_price: String,

    /// Minimum rental length in days
    pub min_rental_days: Option<i64>,

    /// Blocked date intervals
    #[serde(default)]
    pub blocked: Vec<BlockedRangeFixture>,
}

/// Blocked range in YAML
#[derive(Debug, Deserialize)]
pub struct BlockedRangeFixture {
    /// First blocked day
    pub start: Date,

    /// Last blocked day
    pub end: Date,

    /// Reason the panel is blocked
    pub reason: Option<String>,
}

impl TryFrom<BlockedRangeFixture> for BlockedRange {
    type Error = FixtureError;

    fn try_from(fixture: BlockedRangeFixture) -> Result<Self, Self::Error> {
        BlockedRange::new(fixture.start, fixture.end, fixture.reason)
            .map_err(|err| FixtureError::InvalidDateRange(err.to_string()))
    }
}

impl TryFrom<PanelFixture> for Panel<'_> {
    type Error = FixtureError;

    fn try_from(fixture: PanelFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.weekly_price)?;
        let weekly_price = Money::from_minor(minor_units, currency);

        let blocked = fixture
            .blocked
            .into_iter()
            .map(BlockedRange::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Panel {
            name: fixture.name,
            kind: fixture.kind,
            city: fixture.city,
            owner: fixture.owner,
            weekly_price,
            min_rental_days: fixture.min_rental_days,
            blocked,
        })
    }
}

/// Parse price string (e.g., "2000.00 TRY") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "TRY" => TRY,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2000.00TRY");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2000.00 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_converts_to_minor_units() -> TestResult {
        let (try_minor, lira) = parse_price("2000.00 TRY")?;
        let (usd_minor, usd) = parse_price("1.25 USD")?;

        assert_eq!(try_minor, 200_000);
        assert_eq!(lira, TRY);
        assert_eq!(usd_minor, 125);
        assert_eq!(usd, USD);

        Ok(())
    }

    #[test]
    fn panel_fixture_converts_blocked_ranges() -> TestResult {
        let yaml = r#"
name: "İzmit Station CLP"
kind: clp
city: Kocaeli
owner: CityVision
weekly_price: "2000.00 TRY"
min_rental_days: 7
blocked:
  - start: 2025-01-10
    end: 2025-01-15
    reason: maintenance
"#;

        let fixture: PanelFixture = serde_norway::from_str(yaml)?;
        let panel = Panel::try_from(fixture)?;

        assert_eq!(panel.kind, PanelKind::Clp);
        assert_eq!(panel.weekly_price.to_minor_units(), 200_000);
        assert!(panel.is_blocked(date(2025, 1, 12)));
        assert!(!panel.is_blocked(date(2025, 1, 16)));

        Ok(())
    }

    #[test]
    fn panel_fixture_rejects_inverted_blocked_range() -> TestResult {
        let yaml = r#"
name: "İzmit Station CLP"
kind: clp
city: Kocaeli
owner: ~
weekly_price: "2000.00 TRY"
min_rental_days: ~
blocked:
  - start: 2025-01-15
    end: 2025-01-10
    reason: ~
"#;

        let fixture: PanelFixture = serde_norway::from_str(yaml)?;
        let result = Panel::try_from(fixture);

        assert!(matches!(result, Err(FixtureError::InvalidDateRange(_))));

        Ok(())
    }
}
