//! Order lines and pricing modes.

use crate::ids::ProductId;
use crate::money::Money;
use crate::price::{parse_decimal_prefix, parse_integer_prefix};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// How a line's total is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PricingMode {
    /// Unit count times unit price.
    #[default]
    Quantity,
    /// A free-form amount entered by the shopper.
    Amount,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::Quantity => "Quantity",
            PricingMode::Amount => "Amount",
        }
    }

    /// Parse a stored mode label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Quantity" => Some(PricingMode::Quantity),
            "Amount" => Some(PricingMode::Amount),
            _ => None,
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The quantity field of a line.
///
/// `Editing` is the empty field the shopper leaves while retyping; it is
/// stored as `""` and counts as zero units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityInput {
    /// A committed count (>= 1).
    Count(i64),
    /// Field cleared mid-edit.
    Editing,
}

impl QuantityInput {
    /// Coerce shopper input: empty text is kept as `Editing`, anything else
    /// becomes an integer floored at 1 (non-numeric input counts as 1).
    pub fn from_input(raw: &str) -> Self {
        if raw.is_empty() {
            return QuantityInput::Editing;
        }
        QuantityInput::Count(parse_integer_prefix(raw).unwrap_or(1).max(1))
    }

    /// Units used for pricing.
    pub fn units(&self) -> i64 {
        match self {
            QuantityInput::Count(n) => *n,
            QuantityInput::Editing => 0,
        }
    }

    /// Whether the field is empty.
    pub fn is_editing(&self) -> bool {
        matches!(self, QuantityInput::Editing)
    }
}

impl Default for QuantityInput {
    fn default() -> Self {
        QuantityInput::Count(1)
    }
}

impl Serialize for QuantityInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QuantityInput::Count(n) => serializer.serialize_i64(*n),
            QuantityInput::Editing => serializer.serialize_str(""),
        }
    }
}

/// An editable order line derived from a cart entry.
///
/// Both pricing payloads live on the line: `quantity` and `amount` are kept
/// while the other mode is selected, so switching back restores the
/// shopper's earlier input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    /// Lower bound of the price range.
    pub price_per_unit: Money,
    pub quantity: QuantityInput,
    /// Free text as typed; empty when never set.
    pub amount: String,
    /// Display label.
    pub choose_by: PricingMode,
    /// Mode used for totals.
    pub selected_option: PricingMode,
    /// Same lower bound, shown as "From ..." in amount mode.
    pub from_price: Money,
    pub discount: f64,
    pub rating: f64,
    /// Original range text, kept for redisplay.
    pub price_range: String,
}

impl OrderLine {
    /// Line total under the selected mode.
    ///
    /// Quantity mode multiplies the committed count by the unit price (an
    /// empty field counts as zero). Amount mode uses the parsed amount as
    /// the total itself; unparseable text counts as zero.
    pub fn item_total(&self) -> Money {
        match self.selected_option {
            PricingMode::Quantity => self.price_per_unit.multiply(self.quantity.units()),
            PricingMode::Amount => {
                Money::from_decimal(parse_decimal_prefix(&self.amount).unwrap_or(0.0))
            }
        }
    }

    /// Line total once the order is placed: an empty quantity field counts
    /// as one unit instead of zero.
    pub fn placed_total(&self) -> Money {
        match (self.selected_option, self.quantity) {
            (PricingMode::Quantity, QuantityInput::Editing) => self.price_per_unit,
            _ => self.item_total(),
        }
    }

    /// Apply shopper input to the quantity field.
    pub fn set_quantity_input(&mut self, raw: &str) {
        self.quantity = QuantityInput::from_input(raw);
    }

    /// Store amount text verbatim.
    pub fn set_amount_input(&mut self, raw: impl Into<String>) {
        self.amount = raw.into();
    }

    /// Select a pricing mode, seeding the newly active field if it is empty.
    ///
    /// The previously active field is left untouched.
    pub fn select_mode(&mut self, mode: PricingMode) {
        self.selected_option = mode;
        match mode {
            PricingMode::Amount => {
                if self.amount.is_empty() {
                    self.amount = self.from_price.to_input_text();
                }
            }
            PricingMode::Quantity => {
                if self.quantity.is_editing() {
                    self.quantity = QuantityInput::Count(1);
                }
            }
        }
    }

    /// Whether a discount badge applies.
    pub fn has_discount(&self) -> bool {
        self.discount > 0.0
    }
}
