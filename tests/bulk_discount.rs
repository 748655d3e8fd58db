//! Integration test for the bulk-discount unlock scenario.
//!
//! A cart holds 19 CLP panels in Kocaeli at 2000 minor units per week, each
//! rented for one week, against a single rule: CLP + Kocaeli, threshold 20,
//! fixed weekly price 1500. With 19 items nothing applies and the engine
//! suggests the 20th; adding it reprices every matching line.

use jiff::civil::date;
use rusty_money::{Money, iso::TRY};
use slotmap::SlotMap;
use testresult::TestResult;

use pano::{
    cart::Cart,
    items::LineItem,
    panels::{PanelKey, PanelKind},
    pricing::price_cart,
    rental::RentalPeriod,
    rules::{DiscountRule, RuleEffect, RuleKey},
};

fn kocaeli_clp<'a>(count: usize) -> Result<Vec<LineItem<'a>>, Box<dyn std::error::Error>> {
    let rental = RentalPeriod::new(date(2025, 3, 3), date(2025, 3, 9))?;

    Ok((0..count)
        .map(|_| {
            LineItem::new(
                PanelKey::default(),
                PanelKind::Clp,
                "Kocaeli",
                Money::from_minor(2000, TRY),
            )
            .with_rental(rental)
        })
        .collect())
}

fn bulk_rule<'a>(
    keys: &mut SlotMap<RuleKey, ()>,
) -> Result<DiscountRule<'a>, pano::rules::RuleError> {
    Ok(DiscountRule::new(
        keys.insert(()),
        "CLP Kocaeli 20+",
        20,
        RuleEffect::FixedWeekly(Money::from_minor(1500, TRY)),
    )?
    .with_kind(PanelKind::Clp)
    .with_city("Kocaeli"))
}

#[test]
fn nineteen_items_pay_full_price_and_get_a_suggestion() -> TestResult {
    let mut keys = SlotMap::<RuleKey, ()>::with_key();
    let cart = Cart::with_items(kocaeli_clp(19)?, TRY)?;
    let rules = vec![bulk_rule(&mut keys)?];

    let totals = price_cart(&cart, &rules)?;

    assert_eq!(totals.subtotal(), Money::from_minor(38_000, TRY));
    assert_eq!(totals.discount(), Money::from_minor(0, TRY));
    assert_eq!(totals.total(), Money::from_minor(38_000, TRY));

    for line in totals.lines() {
        assert!(line.applied_rule.is_none());
    }

    let suggestion = totals.suggestions().first().ok_or("expected a suggestion")?;

    assert_eq!(suggestion.kind, PanelKind::Clp);
    assert_eq!(suggestion.needed_count, 1);
    assert!(matches!(
        suggestion.effect,
        RuleEffect::FixedWeekly(amount) if amount == Money::from_minor(1500, TRY)
    ));
    // 20 unlocked items saving 500 each.
    assert_eq!(suggestion.potential_savings, Money::from_minor(10_000, TRY));

    Ok(())
}

#[test]
fn twentieth_item_unlocks_the_rule_for_every_line() -> TestResult {
    let mut keys = SlotMap::<RuleKey, ()>::with_key();
    let cart = Cart::with_items(kocaeli_clp(20)?, TRY)?;
    let rules = vec![bulk_rule(&mut keys)?];

    let totals = price_cart(&cart, &rules)?;

    assert_eq!(totals.subtotal(), Money::from_minor(40_000, TRY));
    assert_eq!(totals.discount(), Money::from_minor(10_000, TRY));
    assert_eq!(totals.total(), Money::from_minor(30_000, TRY));

    for line in totals.lines() {
        assert_eq!(line.unit_weekly, Money::from_minor(1500, TRY));
        assert!(line.applied_rule.is_some());
    }

    assert!(totals.suggestions().is_empty());

    Ok(())
}

#[test]
fn dropping_below_the_threshold_stops_the_rule_applying() -> TestResult {
    let mut keys = SlotMap::<RuleKey, ()>::with_key();
    let mut cart = Cart::with_items(kocaeli_clp(20)?, TRY)?;
    let rules = vec![bulk_rule(&mut keys)?];

    let unlocked = price_cart(&cart, &rules)?;

    assert_eq!(unlocked.discount(), Money::from_minor(10_000, TRY));

    cart.remove_item(0)?;

    let relocked = price_cart(&cart, &rules)?;

    assert_eq!(relocked.subtotal(), Money::from_minor(38_000, TRY));
    assert_eq!(relocked.discount(), Money::from_minor(0, TRY));

    for line in relocked.lines() {
        assert!(line.applied_rule.is_none());
    }

    Ok(())
}

#[test]
fn non_matching_items_do_not_count_towards_the_gate() -> TestResult {
    let mut keys = SlotMap::<RuleKey, ()>::with_key();

    let mut items = kocaeli_clp(19)?;

    // A CLP in another city matches neither the gate nor the discount.
    items.push(
        LineItem::new(
            PanelKey::default(),
            PanelKind::Clp,
            "İstanbul",
            Money::from_minor(2000, TRY),
        )
        .with_rental(RentalPeriod::new(date(2025, 3, 3), date(2025, 3, 9))?),
    );

    let cart = Cart::with_items(items, TRY)?;
    let rules = vec![bulk_rule(&mut keys)?];

    let totals = price_cart(&cart, &rules)?;

    assert_eq!(totals.discount(), Money::from_minor(0, TRY));

    Ok(())
}
