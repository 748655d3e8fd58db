//! Cart Summary
//!
//! Terminal rendering of priced carts, used by the demo binary and ad-hoc
//! inspection. Rendering is presentation only; every number comes straight
//! from [`CartTotals`](crate::pricing::CartTotals).

use std::io;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use slotmap::SlotMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    panels::{Panel, PanelKey},
    pricing::{CartTotals, PricedLine},
    rules::{DiscountRule, RuleEffect},
    suggestions::Suggestion,
};

/// Errors that can occur when rendering a cart summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A priced line referenced a panel missing from the metadata map.
    #[error("Missing panel")]
    MissingPanel(PanelKey),

    /// A priced line referenced an item missing from the cart.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// IO error
    #[error("IO error")]
    Io,
}

/// Render a priced cart as a table followed by totals and suggestions.
///
/// # Errors
///
/// Returns a [`SummaryError`] if a line references a panel missing from
/// `panel_meta` or writing to `out` fails.
pub fn write_summary(
    mut out: impl io::Write,
    totals: &CartTotals<'_>,
    cart: &Cart<'_>,
    panel_meta: &SlotMap<PanelKey, Panel<'_>>,
    rules: &[DiscountRule<'_>],
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record([
        "",
        "Panel",
        "Format",
        "City",
        "Weeks",
        "Base/Week",
        "Price/Week",
        "Line Total",
        "Savings",
        "Rule",
    ]);

    for line in totals.lines() {
        push_line_row(&mut builder, line, cart, panel_meta, rules)?;
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..9), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| SummaryError::Io)?;

    write_totals(&mut out, totals)?;
    write_suggestions(&mut out, totals.suggestions())?;

    Ok(())
}

fn push_line_row(
    builder: &mut Builder,
    line: &PricedLine<'_>,
    cart: &Cart<'_>,
    panel_meta: &SlotMap<PanelKey, Panel<'_>>,
    rules: &[DiscountRule<'_>],
) -> Result<(), SummaryError> {
    let item = cart.get_item(line.item_idx)?;

    let panel_name = panel_meta
        .get(item.panel())
        .map(|panel| panel.name.as_str())
        .ok_or(SummaryError::MissingPanel(item.panel()))?;

    let rule_name = line
        .applied_rule
        .and_then(|key| rules.iter().find(|rule| rule.key() == key))
        .map_or(String::new(), |rule| rule.name().to_string());

    let format = if item.sides() == 2 {
        format!("{} (2-sided)", item.kind())
    } else {
        item.kind().to_string()
    };

    let savings = if line.savings.to_minor_units() == 0 {
        String::new()
    } else {
        format!("-{}", line.savings)
    };

    builder.push_record([
        format!("#{:<3}", line.item_idx + 1),
        panel_name.to_string(),
        format,
        item.city().to_string(),
        line.weeks.to_string(),
        format!("{}", line.base_weekly),
        format!("{}", line.unit_weekly),
        format!("{}", line.line_total),
        savings,
        rule_name,
    ]);

    Ok(())
}

fn write_totals(out: &mut impl io::Write, totals: &CartTotals<'_>) -> Result<(), SummaryError> {
    // `savings_percent` is a fraction; multiply by 100 to print percent points.
    let savings_points = ((totals.savings_percent()) * Decimal::ONE)
        .checked_mul(Decimal::from_i64(100).unwrap_or(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);

    writeln!(out, " Subtotal: {}", totals.subtotal()).map_err(|_err| SummaryError::Io)?;

    writeln!(
        out,
        " Discount: ({savings_points:.2}%) -{}",
        totals.discount()
    )
    .map_err(|_err| SummaryError::Io)?;

    if let Some(fee) = totals.design_fee() {
        writeln!(out, " Design fee: {fee}").map_err(|_err| SummaryError::Io)?;
    }

    writeln!(out, " \x1b[1mTotal: {}\x1b[0m", totals.total()).map_err(|_err| SummaryError::Io)
}

fn write_suggestions(
    out: &mut impl io::Write,
    suggestions: &[Suggestion<'_>],
) -> Result<(), SummaryError> {
    if suggestions.is_empty() {
        return Ok(());
    }

    writeln!(out).map_err(|_err| SummaryError::Io)?;

    let lines: SmallVec<[String; 4]> = suggestions.iter().map(suggestion_line).collect();

    for line in lines {
        writeln!(out, " {line}").map_err(|_err| SummaryError::Io)?;
    }

    Ok(())
}

fn suggestion_line(suggestion: &Suggestion<'_>) -> String {
    let deal = match &suggestion.effect {
        RuleEffect::PercentOff(percent) => {
            let points = ((*percent) * Decimal::ONE)
                * Decimal::from_i64(100).unwrap_or(Decimal::ZERO);

            format!("{}% off", points.round_dp(0))
        }
        RuleEffect::FixedWeekly(amount) => format!("{amount}/week"),
    };

    format!(
        "Add {} more {} panel(s) to unlock {} and save up to {}",
        suggestion.needed_count, suggestion.kind, deal, suggestion.potential_savings,
    )
}
