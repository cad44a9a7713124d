//! The editable order.

use crate::checkout::CheckoutPayload;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::order::{OrderLine, PricingMode};
use serde::Serialize;

/// Order lines under review, in display order.
///
/// Edits never reorder lines. All operations addressing a missing id are
/// no-ops and report `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    /// Create a draft from lines.
    pub fn new(lines: Vec<OrderLine>) -> Self {
        Self { lines }
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Get a line by id.
    pub fn get(&self, id: &ProductId) -> Option<&OrderLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut OrderLine> {
        self.lines.iter_mut().find(|l| &l.id == id)
    }

    /// Apply quantity input to a line. Empty input is kept as an
    /// in-progress edit; anything else is coerced to an integer >= 1.
    pub fn update_item_quantity(&mut self, id: &ProductId, raw: &str) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.set_quantity_input(raw);
                true
            }
            None => false,
        }
    }

    /// Store amount input verbatim; it is only parsed when totals are
    /// computed.
    pub fn update_item_amount(&mut self, id: &ProductId, raw: impl Into<String>) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.set_amount_input(raw);
                true
            }
            None => false,
        }
    }

    /// Switch a line's pricing mode.
    pub fn toggle_choose_by(&mut self, id: &ProductId, mode: PricingMode) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.select_mode(mode);
                true
            }
            None => false,
        }
    }

    /// Remove a line.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.id != id);
        self.lines.len() < len_before
    }

    /// Remove every line.
    pub fn clear_all_items(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    pub fn total_amount(&self) -> Money {
        self.lines.iter().map(OrderLine::item_total).sum()
    }

    /// Hand the order to the payment stage.
    ///
    /// Rejected with [`CommerceError::EmptyCheckout`] when there are no
    /// lines; nothing changes in that case.
    pub fn proceed_to_checkout(&self) -> Result<CheckoutPayload, CommerceError> {
        if self.lines.is_empty() {
            return Err(CommerceError::EmptyCheckout);
        }
        Ok(CheckoutPayload {
            cart_items: self.lines.clone(),
            total_amount: self.total_amount(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{CartPayload, LineRecord, QuantityInput};
    use serde_json::json;

    fn draft() -> OrderDraft {
        let payload: CartPayload = serde_json::from_value(json!({
            "cartItems": [
                {"id": 1, "name": "Tomatoes", "priceRange": "₵10 - ₵20", "quantity": 2},
                {"id": 2, "name": "Onions", "priceRange": "₵4 - ₵8", "quantity": 1},
            ]
        }))
        .unwrap();
        OrderDraft::new(payload.into_lines())
    }

    fn id(n: u64) -> ProductId {
        ProductId::from(n)
    }

    #[test]
    fn test_total_amount_mixes_modes() {
        let mut draft = draft();
        assert_eq!(draft.total_amount(), Money::from_decimal(24.0));

        draft.toggle_choose_by(&id(2), PricingMode::Amount);
        draft.update_item_amount(&id(2), "7.25");
        assert_eq!(draft.total_amount(), Money::from_decimal(27.25));
    }

    #[test]
    fn test_update_quantity_keeps_in_progress_edit() {
        let mut draft = draft();
        assert!(draft.update_item_quantity(&id(1), ""));
        assert_eq!(draft.get(&id(1)).unwrap().quantity, QuantityInput::Editing);

        assert!(draft.update_item_quantity(&id(1), "0"));
        assert_eq!(draft.get(&id(1)).unwrap().quantity, QuantityInput::Count(1));
    }

    #[test]
    fn test_update_amount_is_verbatim() {
        let mut draft = draft();
        draft.update_item_amount(&id(1), "12.");
        assert_eq!(draft.get(&id(1)).unwrap().amount, "12.");
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut draft = draft();
        let before = draft.clone();
        assert!(!draft.update_item_quantity(&id(9), "3"));
        assert!(!draft.update_item_amount(&id(9), "3"));
        assert!(!draft.toggle_choose_by(&id(9), PricingMode::Amount));
        assert!(!draft.remove_item(&id(9)));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_edits_keep_display_order() {
        let mut draft = draft();
        draft.update_item_quantity(&id(2), "9");
        draft.toggle_choose_by(&id(1), PricingMode::Amount);
        let ids: Vec<_> = draft.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_checkout_rejects_empty_order() {
        let draft = OrderDraft::default();
        let err = draft.proceed_to_checkout().unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCheckout));
        assert_eq!(err.user_notice().as_deref(), Some("Your cart is empty!"));
    }

    #[test]
    fn test_checkout_carries_lines_and_total() {
        let payload = draft().proceed_to_checkout().unwrap();
        assert_eq!(payload.cart_items.len(), 2);
        assert_eq!(payload.total_amount, Money::from_decimal(24.0));
    }

    #[test]
    fn test_draft_serializes_as_plain_list() {
        let json = serde_json::to_value(draft()).unwrap();
        let records: Vec<LineRecord> = serde_json::from_value(json).unwrap();
        assert_eq!(records.len(), 2);
    }
}
