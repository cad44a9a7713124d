//! Cart store and cart entries.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::order::{CartPayload, LineRecord};
use crate::price::parse_lower_price;
use serde::{Deserialize, Serialize};

/// A product plus the quantity chosen for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    /// The product, flattened so the entry serializes as one record.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity (>= 1).
    pub quantity: i64,
}

impl CartEntry {
    /// Entry id (the product id).
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Lower-bound unit price times quantity; unparseable prices count as 0.
    pub fn line_price(&self) -> Money {
        let unit = parse_lower_price(Some(&self.product.price_range), 0.0);
        Money::from_decimal(unit).multiply(self.quantity)
    }
}

/// The shopper's cart.
///
/// Entries are unique by product id and keep insertion order; adding a
/// product that is already present only bumps its quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Entries in insertion order.
    pub items: Vec<CartEntry>,
    /// Whether the shopper was already prompted this session.
    #[serde(skip)]
    has_prompted_user: bool,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product.
    ///
    /// Returns an error if quantity is not positive or the summed quantity
    /// would overflow.
    pub fn add_to_cart(&mut self, product: Product, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            existing.quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            return Ok(());
        }

        self.items.push(CartEntry { product, quantity });
        Ok(())
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: Product) -> Result<(), CommerceError> {
        self.add_to_cart(product, 1)
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product.id != id);
        self.items.len() < len_before
    }

    /// Set an entry's quantity.
    ///
    /// A quantity <= 0 removes the entry. Returns whether an entry changed.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_from_cart(id);
        }

        match self.items.iter_mut().find(|i| &i.product.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities, saturating at `i64::MAX`.
    pub fn total_items(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of lower-bound price times quantity.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartEntry::line_price).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an entry by product id.
    pub fn get_item(&self, id: &ProductId) -> Option<&CartEntry> {
        self.items.iter().find(|i| &i.product.id == id)
    }

    /// Whether the shopper was already prompted this session.
    pub fn has_prompted_user(&self) -> bool {
        self.has_prompted_user
    }

    /// Record that the shopper has been prompted.
    pub fn set_user_prompted(&mut self) {
        self.has_prompted_user = true;
    }

    /// Forget that the shopper was prompted.
    pub fn reset_prompt_status(&mut self) {
        self.has_prompted_user = false;
    }

    /// Snapshot of the cart handed to the order screen.
    pub fn to_payload(&self) -> CartPayload {
        CartPayload {
            cart_items: self.items.iter().map(LineRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomatoes() -> Product {
        Product::new(1u64, "Tomatoes", "\u{20b5}10 - \u{20b5}20")
    }

    fn onions() -> Product {
        Product::new(2u64, "Onions", "\u{20b5}4.50 - \u{20b5}9")
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_to_cart(tomatoes(), 1).unwrap();
        cart.add_to_cart(tomatoes(), 2).unwrap();

        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add_one(tomatoes()).unwrap();
        cart.add_one(onions()).unwrap();
        cart.add_one(tomatoes()).unwrap();

        let ids: Vec<&str> = cart.items.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_to_cart(tomatoes(), 0),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_overflow() {
        let mut cart = Cart::new();
        cart.add_to_cart(tomatoes(), i64::MAX).unwrap();
        assert!(matches!(
            cart.add_to_cart(tomatoes(), 1),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_total_items_saturates_across_entries() {
        let mut cart = Cart::new();
        cart.add_to_cart(tomatoes(), i64::MAX).unwrap();
        cart.add_to_cart(onions(), 1).unwrap();
        assert_eq!(cart.total_items(), i64::MAX);

        assert!(cart.update_quantity(&ProductId::new("2"), i64::MAX));
        assert_eq!(cart.total_items(), i64::MAX);
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        for quantity in [0, -5] {
            let mut cart = Cart::new();
            cart.add_one(tomatoes()).unwrap();
            cart.add_one(onions()).unwrap();

            let mut expected = cart.clone();
            expected.remove_from_cart(&ProductId::new("1"));

            assert!(cart.update_quantity(&ProductId::new("1"), quantity));
            assert_eq!(cart, expected);
        }
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_one(tomatoes()).unwrap();

        assert!(cart.update_quantity(&ProductId::new("1"), 5));
        assert_eq!(cart.total_items(), 5);
        assert!(!cart.update_quantity(&ProductId::new("missing"), 5));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_one(tomatoes()).unwrap();
        assert!(!cart.remove_from_cart(&ProductId::new("missing")));
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_total_price() {
        let mut cart = Cart::new();
        cart.add_to_cart(tomatoes(), 2).unwrap();
        cart.add_to_cart(onions(), 2).unwrap();
        cart.add_one(Product::new(3u64, "Mystery", "ask at the counter"))
            .unwrap();

        // 2*10 + 2*4.50 + unparseable 0
        assert_eq!(cart.total_price(), Money::from_decimal(29.0));
    }

    #[test]
    fn test_clear_cart() {
        let mut cart = Cart::new();
        cart.add_one(tomatoes()).unwrap();
        cart.clear_cart();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_prompt_flag() {
        let mut cart = Cart::new();
        assert!(!cart.has_prompted_user());
        cart.set_user_prompted();
        assert!(cart.has_prompted_user());
        cart.reset_prompt_status();
        assert!(!cart.has_prompted_user());
    }

    #[test]
    fn test_payload_carries_product_details() {
        let mut cart = Cart::new();
        let plantain = Product::new(7u64, "Plantain", "\u{20b5}6 - \u{20b5}12")
            .with_image("plantain.jpg")
            .with_discount(10.0)
            .with_rating(4.5);
        cart.add_to_cart(plantain, 3).unwrap();
        cart.add_to_cart(tomatoes().with_discount(-5.0), 1).unwrap();

        let lines = cart.to_payload().into_lines();
        assert_eq!(lines[0].image, "plantain.jpg");
        assert_eq!(lines[0].discount, 10.0);
        assert!(lines[0].has_discount());
        assert_eq!(lines[0].rating, 4.5);
        assert_eq!(lines[0].item_total(), Money::from_decimal(18.0));

        // Negative discounts are clamped and unrated products get the default.
        assert!(!lines[1].has_discount());
        assert_eq!(lines[1].rating, crate::order::DEFAULT_RATING);
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = CartEntry {
            product: tomatoes(),
            quantity: 2,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["priceRange"], "\u{20b5}10 - \u{20b5}20");
        assert_eq!(json["quantity"], 2);
    }
}
