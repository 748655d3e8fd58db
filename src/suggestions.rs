//! Discount Suggestions
//!
//! "Add N more to unlock" nudges. For each panel format in the cart whose
//! quantity thresholds are all still unmet, the nearest-win rule is surfaced
//! together with an estimate of the savings once unlocked.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    discounts::{DiscountError, discounted_weekly_minor},
    items::LineItem,
    matching::matching_quantity,
    panels::PanelKind,
    rules::{DiscountRule, RuleEffect, RuleKey},
};

/// A nudge describing the nearest unmet bulk-discount threshold for a panel
/// format present in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    /// Panel format the suggestion applies to.
    pub kind: PanelKind,

    /// Rule that would unlock.
    pub rule: RuleKey,

    /// Items still missing before the rule's threshold is met.
    pub needed_count: usize,

    /// Effect that would apply once unlocked.
    pub effect: RuleEffect<'a>,

    /// Estimated weekly savings across the unlocked group, priced against a
    /// representative item already in the cart. Saturates rather than
    /// overflows; it is an estimate for display, not an invoice line.
    pub potential_savings: Money<'a, Currency>,
}

/// Compute suggestions for every panel format present in the cart.
///
/// Formats appear in first-occurrence order. A format whose items already
/// meet any active rule's threshold produces no suggestion; suggestions are
/// computed independently per format with no cross-format optimisation.
///
/// # Errors
///
/// Returns a [`DiscountError`] if percentage arithmetic on a candidate rule
/// fails.
pub fn suggestions<'a>(
    items: &[LineItem<'a>],
    rules: &[DiscountRule<'a>],
) -> Result<SmallVec<[Suggestion<'a>; 4]>, DiscountError> {
    let mut out = SmallVec::new();
    let mut seen: SmallVec<[PanelKind; 4]> = SmallVec::new();

    for item in items {
        let kind = item.kind();

        if seen.contains(&kind) {
            continue;
        }

        seen.push(kind);

        if let Some(suggestion) = suggestion_for_kind(kind, items, rules)? {
            out.push(suggestion);
        }
    }

    Ok(out)
}

struct Candidate<'r, 'a> {
    rule: &'r DiscountRule<'a>,
    needed: usize,
    per_item_saving: i64,
    savings_minor: i64,
    currency: &'a Currency,
}

fn suggestion_for_kind<'a>(
    kind: PanelKind,
    items: &[LineItem<'a>],
    rules: &[DiscountRule<'a>],
) -> Result<Option<Suggestion<'a>>, DiscountError> {
    let mut best: Option<Candidate<'_, 'a>> = None;

    for rule in rules.iter().filter(|rule| rule.is_active()) {
        if rule.kind().is_some_and(|rule_kind| rule_kind != kind) {
            continue;
        }

        // A representative item of this format that the rule would accept;
        // rules filtering on owner or city only count if such an item exists.
        let Some(representative) = items
            .iter()
            .find(|item| item.kind() == kind && rule.matches(item))
        else {
            continue;
        };

        let count = matching_quantity(rule, items);

        if count >= rule.min_quantity() {
            // A threshold is already met for this format; nothing to nudge.
            return Ok(None);
        }

        let needed = rule.min_quantity() - count;

        let base_minor = representative.weekly_price().to_minor_units();
        let unit_minor = discounted_weekly_minor(rule.effect(), base_minor)?;
        let per_item_saving = 0.max(base_minor - unit_minor);

        if per_item_saving == 0 {
            continue;
        }

        let unlocked = i64::try_from(rule.min_quantity()).unwrap_or(i64::MAX);
        let savings_minor = unlocked.saturating_mul(per_item_saving);

        let better = best.as_ref().is_none_or(|current| {
            needed < current.needed
                || (needed == current.needed && per_item_saving > current.per_item_saving)
        });

        if better {
            best = Some(Candidate {
                rule,
                needed,
                per_item_saving,
                savings_minor,
                currency: representative.weekly_price().currency(),
            });
        }
    }

    Ok(best.map(|candidate| Suggestion {
        kind,
        rule: candidate.rule.key(),
        needed_count: candidate.needed,
        effect: *candidate.rule.effect(),
        potential_savings: Money::from_minor(candidate.savings_minor, candidate.currency),
    }))
}
