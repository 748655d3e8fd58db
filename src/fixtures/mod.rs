//! Fixtures
//!
//! Named YAML fixture sets for demos and scenario tests: panels under
//! `fixtures/panels/`, carts under `fixtures/carts/` and rules under
//! `fixtures/rules/`, one file per set name.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    cart::Cart,
    fixtures::{carts::CartFixture, panels::PanelsFixture, rules::RulesFixture},
    items::LineItem,
    panels::{Panel, PanelKey},
    rental::RentalPeriod,
    rules::{DiscountRule, RuleKey},
};

pub mod carts;
pub mod panels;
pub mod rules;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid date range in a blocked interval or rental
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// A cart item set only one of its rental dates
    #[error("Cart item {0} must set both start and end, or neither")]
    PartialRental(String),

    /// Panel not found
    #[error("Panel not found: {0}")]
    PanelNotFound(String),

    /// Rule not found
    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    /// Invalid rule definition
    #[error(transparent)]
    Rule(#[from] crate::rules::RuleError),

    /// Currency mismatch between panels
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No panels loaded yet
    #[error("No panels loaded yet; currency unknown")]
    NoCurrency,

    /// No cart items loaded
    #[error("No cart items loaded; cannot create cart")]
    NoItems,

    /// Not enough items in fixture
    #[error("Not enough items in fixture, available: {available}, requested: {requested}")]
    NotEnoughItems {
        /// Number of items defined in the fixture
        available: usize,
        /// Number of items requested
        requested: usize,
    },

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] crate::cart::CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// `SlotMap` storing the panels with generated keys
    panel_meta: SlotMap<PanelKey, Panel<'a>>,

    /// Key generator for loaded rules
    rule_slots: SlotMap<RuleKey, ()>,

    /// String key -> `SlotMap` key mappings for lookups
    panel_keys: FxHashMap<String, PanelKey>,
    rule_keys: FxHashMap<String, RuleKey>,

    /// Pre-built cart items (reference panels by `PanelKey`)
    items: Vec<LineItem<'a>>,

    /// Pre-built discount rules
    rules: Vec<DiscountRule<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static rusty_money::iso::Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            panel_meta: SlotMap::with_key(),
            rule_slots: SlotMap::with_key(),
            panel_keys: FxHashMap::default(),
            rule_keys: FxHashMap::default(),
            items: Vec::new(),
            rules: Vec::new(),
            currency: None,
        }
    }

    /// Load panels from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are
    /// currency mismatches between panels.
    pub fn load_panels(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("panels").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: PanelsFixture = serde_norway::from_str(&contents)?;

        for (key, panel_fixture) in fixture.panels {
            // Parse to get currency first (before creating the Panel)
            let (_minor_units, currency) = panels::parse_price(&panel_fixture.weekly_price)?;

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            let panel: Panel<'a> = panel_fixture.try_into()?;
            let panel_key = self.panel_meta.insert(panel);

            self.panel_keys.insert(key, panel_key);
        }

        Ok(self)
    }

    /// Load cart items from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, a referenced
    /// panel doesn't exist, or a rental range is partial or inverted.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for item_fixture in fixture.items {
            let panel_key = self
                .panel_keys
                .get(&item_fixture.panel)
                .ok_or_else(|| FixtureError::PanelNotFound(item_fixture.panel.clone()))?;

            let panel = self
                .panel_meta
                .get(*panel_key)
                .ok_or_else(|| FixtureError::PanelNotFound(item_fixture.panel.clone()))?;

            let rental = match (item_fixture.start, item_fixture.end) {
                (Some(start), Some(end)) => Some(
                    RentalPeriod::new(start, end)
                        .map_err(|err| FixtureError::InvalidDateRange(err.to_string()))?,
                ),
                (None, None) => None,
                _ => return Err(FixtureError::PartialRental(item_fixture.panel)),
            };

            let mut item = LineItem::for_panel(*panel_key, panel)
                .with_double_sided(item_fixture.double_sided);

            item.set_rental(rental);

            self.items.push(item);
        }

        Ok(self)
    }

    /// Load discount rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or a rule's
    /// effect pair is conflicting, missing, or out of range.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rules").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RulesFixture = serde_norway::from_str(&contents)?;

        for (key, rule_fixture) in fixture.rules {
            let rule_key = self.rule_slots.insert(());
            let rule = rule_fixture.try_into_rule(rule_key)?;

            self.rules.push(rule);
            self.rule_keys.insert(key, rule_key);
        }

        Ok(self)
    }

    /// Load a complete fixture set (panels, cart and rules with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_panels(name)?
            .load_cart(name)?
            .load_rules(name)?;

        Ok(fixture)
    }

    /// Get a panel by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is not found.
    pub fn panel(&self, key: &str) -> Result<&Panel<'a>, FixtureError> {
        let panel_key = self
            .panel_keys
            .get(key)
            .ok_or_else(|| FixtureError::PanelNotFound(key.to_string()))?;

        self.panel_meta
            .get(*panel_key)
            .ok_or_else(|| FixtureError::PanelNotFound(key.to_string()))
    }

    /// Get a panel key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is not found.
    pub fn panel_key(&self, key: &str) -> Result<PanelKey, FixtureError> {
        self.panel_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::PanelNotFound(key.to_string()))
    }

    /// Get a rule by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the rule is not found.
    pub fn rule(&self, key: &str) -> Result<&DiscountRule<'a>, FixtureError> {
        let rule_key = self
            .rule_keys
            .get(key)
            .ok_or_else(|| FixtureError::RuleNotFound(key.to_string()))?;

        self.rules
            .iter()
            .find(|rule| rule.key() == *rule_key)
            .ok_or_else(|| FixtureError::RuleNotFound(key.to_string()))
    }

    /// Get all cart items
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Get all discount rules
    pub fn rules(&self) -> &[DiscountRule<'a>] {
        &self.rules
    }

    /// Create a cart from the loaded items
    ///
    /// # Errors
    ///
    /// Returns an error if no items are loaded or if cart creation fails.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<'a>, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        if self.items.is_empty() {
            return Err(FixtureError::NoItems);
        }

        if let Some(n) = n
            && n > self.items.len()
        {
            return Err(FixtureError::NotEnoughItems {
                requested: n,
                available: self.items.len(),
            });
        }

        let items: Vec<LineItem<'a>> = self
            .items
            .iter()
            .take(n.unwrap_or(self.items.len()))
            .cloned()
            .collect();

        Ok(Cart::with_items(items, currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no panels have been loaded yet.
    pub fn currency(&self) -> Result<&'static rusty_money::iso::Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Get the panel metadata `SlotMap`
    pub fn panel_meta_map(&self) -> &SlotMap<PanelKey, Panel<'a>> {
        &self.panel_meta
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
