//! Rule Matching
//!
//! Quantity aggregation and best-rule selection over a cart snapshot.
//! Quantities are counted per rule predicate rather than per fixed grouping
//! key, so rules constraining any subset of (format, owner, city) all count
//! against the same cart.

use crate::{items::LineItem, rules::DiscountRule};

/// Count the cart items satisfying all of a rule's filters.
///
/// An empty cart yields zero for every rule, so no quantity gate can be met.
pub fn matching_quantity(rule: &DiscountRule<'_>, items: &[LineItem<'_>]) -> usize {
    items.iter().filter(|item| rule.matches(item)).count()
}

/// Whether the rule is active and its quantity gate is met by the cart.
pub fn quantity_gate_met(rule: &DiscountRule<'_>, items: &[LineItem<'_>]) -> bool {
    rule.is_active() && matching_quantity(rule, items) >= rule.min_quantity()
}

/// Select the single best applicable rule for one item, or none.
///
/// A rule is applicable when it is active, its filters accept the item, and
/// enough items across the whole cart satisfy its filters. Among applicable
/// rules the highest priority wins; at equal priority the rule constraining
/// more filter dimensions wins; remaining ties resolve to the earliest rule
/// in the supplied slice, so selection is deterministic for a given rule
/// snapshot.
pub fn best_rule<'r, 'a>(
    item: &LineItem<'a>,
    items: &[LineItem<'a>],
    rules: &'r [DiscountRule<'a>],
) -> Option<&'r DiscountRule<'a>> {
    let mut best: Option<&DiscountRule<'a>> = None;

    for rule in rules {
        if !rule.is_active() || !rule.matches(item) {
            continue;
        }

        if matching_quantity(rule, items) < rule.min_quantity() {
            continue;
        }

        let better = best.is_none_or(|current| {
            (rule.priority(), rule.specificity()) > (current.priority(), current.specificity())
        });

        if better {
            best = Some(rule);
        }
    }

    best
}
