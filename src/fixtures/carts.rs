//! Cart Fixtures

use jiff::civil::Date;
use serde::Deserialize;

/// Wrapper for cart items in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Ordered list of cart item fixtures
    pub items: Vec<CartItemFixture>,
}

/// One cart entry referencing a panel by its fixture key
#[derive(Debug, Deserialize)]
pub struct CartItemFixture {
    /// Panel fixture key
    pub panel: String,

    /// First rental day; requires `end` as well
    pub start: Option<Date>,

    /// Last rental day; requires `start` as well
    pub end: Option<Date>,

    /// Whether the customer requested a double-sided rental
    #[serde(default)]
    pub double_sided: bool,
}
