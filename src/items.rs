//! Line Items

use rusty_money::{Money, iso::Currency};

use crate::{
    panels::{Panel, PanelKey, PanelKind},
    rental::RentalPeriod,
};

/// One panel entry in a cart, with an optional rental date range.
///
/// The discount-relevant panel fields (format, owner, city, weekly price) are
/// denormalised onto the item so the pricing pipeline works on an explicit
/// snapshot without reaching back into the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    panel: PanelKey,
    kind: PanelKind,
    city: String,
    owner: Option<String>,
    weekly_price: Money<'a, Currency>,
    rental: Option<RentalPeriod>,
    double_sided: bool,
}

impl<'a> LineItem<'a> {
    /// Create an undated line item for a panel.
    pub fn new(
        panel: PanelKey,
        kind: PanelKind,
        city: impl Into<String>,
        weekly_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            panel,
            kind,
            city: city.into(),
            owner: None,
            weekly_price,
            rental: None,
            double_sided: false,
        }
    }

    /// Create a line item by copying the discount-relevant fields of a panel.
    pub fn for_panel(key: PanelKey, panel: &Panel<'a>) -> Self {
        Self {
            panel: key,
            kind: panel.kind,
            city: panel.city.clone(),
            owner: panel.owner.clone(),
            weekly_price: panel.weekly_price,
            rental: None,
            double_sided: false,
        }
    }

    /// Attach an owner name, used by owner-specific discount rules.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Attach a rental period.
    #[must_use]
    pub fn with_rental(mut self, rental: RentalPeriod) -> Self {
        self.rental = Some(rental);
        self
    }

    /// Set the double-sided flag.
    ///
    /// The flag only affects pricing for formats that support double-sided
    /// rental; on other formats it is carried but ignored.
    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Change or clear the rental period.
    pub fn set_rental(&mut self, rental: Option<RentalPeriod>) {
        self.rental = rental;
    }

    /// Key of the referenced panel.
    pub fn panel(&self) -> PanelKey {
        self.panel
    }

    /// Panel format.
    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// City the panel stands in.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Owner of the physical asset, when known.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Weekly rental price before any discount.
    pub fn weekly_price(&self) -> &Money<'a, Currency> {
        &self.weekly_price
    }

    /// Rental period, when dates have been chosen.
    pub fn rental(&self) -> Option<&RentalPeriod> {
        self.rental.as_ref()
    }

    /// Raw double-sided flag as requested by the customer.
    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }

    /// Number of charged sides: 2 for a double-sided rental of a format that
    /// supports it, otherwise 1.
    pub fn sides(&self) -> i64 {
        if self.double_sided && self.kind.supports_double_sided() {
            2
        } else {
            1
        }
    }

    /// Number of charged weeks; an undated item prices as a single week.
    pub fn weeks(&self) -> i64 {
        self.rental.as_ref().map_or(1, RentalPeriod::weeks)
    }
}
