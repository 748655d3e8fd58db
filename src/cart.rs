//! Carts

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::items::LineItem;

/// Errors related to cart construction or item access.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An item carried a negative weekly price.
    #[error("Item {0} has a negative weekly price")]
    NegativePrice(usize),

    /// An item was not found in the cart.
    #[error("Item {0} not found")]
    ItemNotFound(usize),
}

/// An ordered list of line items sharing one currency.
///
/// The cart is a plain snapshot; pricing never mutates it and holds no state
/// between calls.
#[derive(Debug)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart for the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart with the given items.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if an item's currency differs from the cart
    /// currency or an item carries a negative weekly price.
    pub fn with_items(
        items: impl Into<Vec<LineItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| validate_item(i, item, currency))?;

        Ok(Cart { items, currency })
    }

    /// Append an item to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the item's currency differs from the cart
    /// currency or it carries a negative weekly price.
    pub fn add_item(&mut self, item: LineItem<'a>) -> Result<(), CartError> {
        validate_item(self.items.len(), &item, self.currency)?;
        self.items.push(item);

        Ok(())
    }

    /// Remove and return the item at the given index.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::ItemNotFound`] if the index is out of range.
    pub fn remove_item(&mut self, item: usize) -> Result<LineItem<'a>, CartError> {
        if item >= self.items.len() {
            return Err(CartError::ItemNotFound(item));
        }

        Ok(self.items.remove(item))
    }

    /// Remove every item from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::ItemNotFound`] if the item is not found.
    pub fn get_item(&'a self, item: usize) -> Result<&'a LineItem<'a>, CartError> {
        self.items.get(item).ok_or(CartError::ItemNotFound(item))
    }

    /// All items, in insertion order.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'_>> {
        self.items.iter()
    }

    /// Get the number of items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn validate_item(
    index: usize,
    item: &LineItem<'_>,
    currency: &'static Currency,
) -> Result<(), CartError> {
    let item_currency = item.weekly_price().currency();

    if item_currency != currency {
        return Err(CartError::CurrencyMismatch(
            index,
            item_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ));
    }

    if item.weekly_price().to_minor_units() < 0 {
        return Err(CartError::NegativePrice(index));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{TRY, USD},
    };
    use testresult::TestResult;

    use crate::panels::{PanelKey, PanelKind};

    use super::*;

    fn test_items<'a>() -> [LineItem<'a>; 3] {
        [
            LineItem::new(
                PanelKey::default(),
                PanelKind::Billboard,
                "İstanbul",
                Money::from_minor(5000, TRY),
            ),
            LineItem::new(
                PanelKey::default(),
                PanelKind::Clp,
                "Kocaeli",
                Money::from_minor(2000, TRY),
            ),
            LineItem::new(
                PanelKey::default(),
                PanelKind::Megalight,
                "İzmir",
                Money::from_minor(3500, TRY),
            ),
        ]
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(TRY);

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), TRY);
    }

    #[test]
    fn with_items_currency_mismatch_errors() {
        let items = [
            LineItem::new(
                PanelKey::default(),
                PanelKind::Billboard,
                "İstanbul",
                Money::from_minor(5000, TRY),
            ),
            LineItem::new(
                PanelKey::default(),
                PanelKind::Clp,
                "Kocaeli",
                Money::from_minor(2000, USD),
            ),
        ];

        let result = Cart::with_items(items, TRY);

        match result {
            Err(CartError::CurrencyMismatch(idx, item_currency, cart_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(item_currency, USD.iso_alpha_code);
                assert_eq!(cart_currency, TRY.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn with_items_rejects_negative_prices() {
        let items = [LineItem::new(
            PanelKey::default(),
            PanelKind::Billboard,
            "İstanbul",
            Money::from_minor(-100, TRY),
        )];

        let result = Cart::with_items(items, TRY);

        assert!(matches!(result, Err(CartError::NegativePrice(0))));
    }

    #[test]
    fn add_and_remove_items() -> TestResult {
        let mut cart = Cart::new(TRY);

        for item in test_items() {
            cart.add_item(item)?;
        }

        assert_eq!(cart.len(), 3);

        let removed = cart.remove_item(1)?;

        assert_eq!(removed.kind(), PanelKind::Clp);
        assert_eq!(cart.len(), 2);

        cart.clear();

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn remove_item_out_of_range_errors() {
        let mut cart = Cart::new(TRY);

        assert!(matches!(
            cart.remove_item(0),
            Err(CartError::ItemNotFound(0))
        ));
    }

    #[test]
    fn add_item_validates_currency() {
        let mut cart = Cart::new(TRY);

        let result = cart.add_item(LineItem::new(
            PanelKey::default(),
            PanelKind::Billboard,
            "İstanbul",
            Money::from_minor(100, USD),
        ));

        assert!(matches!(result, Err(CartError::CurrencyMismatch(0, _, _))));
        assert!(cart.is_empty());
    }

    #[test]
    fn iter_returns_items_in_order() -> TestResult {
        let cart = Cart::with_items(test_items(), TRY)?;

        let prices: Vec<i64> = cart
            .iter()
            .map(|item| item.weekly_price().to_minor_units())
            .collect();

        assert_eq!(prices, vec![5000, 2000, 3500]);

        Ok(())
    }

    #[test]
    fn get_item_returns_item() -> TestResult {
        let cart = Cart::with_items(test_items(), TRY)?;
        let item = cart.get_item(1)?;

        assert_eq!(item.weekly_price().to_minor_units(), 2000);

        Ok(())
    }

    #[test]
    fn get_item_missing_returns_error() {
        let cart = Cart::new(TRY);

        let err = cart.get_item(0).err();

        assert!(matches!(err, Some(CartError::ItemNotFound(0))));
    }
}
