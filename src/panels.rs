//! Panels

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

use crate::availability::BlockedRange;

new_key_type! {
    /// Panel Key
    pub struct PanelKey;
}

/// Physical panel formats offered for rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Large roadside billboard face.
    Billboard,

    /// City light poster, the only format rentable double-sided.
    Clp,

    /// Backlit megalight face.
    Megalight,

    /// Building-scale giantboard surface.
    Giantboard,

    /// Digital LED screen.
    Led,
}

impl PanelKind {
    /// Whether this format offers a double-sided rental option.
    pub const fn supports_double_sided(self) -> bool {
        matches!(self, Self::Clp)
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Billboard => "Billboard",
            Self::Clp => "CLP",
            Self::Megalight => "Megalight",
            Self::Giantboard => "Giantboard",
            Self::Led => "LED",
        };

        write!(f, "{label}")
    }
}

/// Panel read model supplied by the surrounding inventory system.
///
/// Pricing and availability treat panels as read-only input; blocked ranges
/// may overlap in storage and are interpreted as a union of blocked days.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    /// Display name.
    pub name: String,

    /// Panel format.
    pub kind: PanelKind,

    /// City the panel stands in.
    pub city: String,

    /// Owner of the physical asset, when known.
    pub owner: Option<String>,

    /// Weekly rental price.
    pub weekly_price: Money<'a, Currency>,

    /// Minimum rental length in days; falls back to the engine default.
    pub min_rental_days: Option<i64>,

    /// Date intervals during which the panel cannot be rented.
    pub blocked: Vec<BlockedRange>,
}
