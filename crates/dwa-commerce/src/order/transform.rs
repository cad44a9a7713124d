//! Conversion of cart snapshots and stored records into order lines.
//!
//! Records are read leniently: every field is optional and loosely typed,
//! because stored snapshots may come from an older schema or carry an
//! in-progress edit. Missing or falsy fields take the order defaults.

use crate::cart::CartEntry;
use crate::ids::ProductId;
use crate::money::Money;
use crate::order::{OrderLine, PricingMode, QuantityInput};
use crate::price::{parse_decimal_prefix, try_parse_lower_price};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Unit price used when a record has no usable price.
pub const DEFAULT_UNIT_PRICE: f64 = 5.00;

/// Rating used when a record has none.
pub const DEFAULT_RATING: f64 = 4.0;

/// A loosely typed line record, as found in payloads and storage.
///
/// No field type is enforced at decode time, so one malformed record
/// never fails the list it sits in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineRecord {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "loose_id"
    )]
    pub id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choose_by: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
}

impl From<&CartEntry> for LineRecord {
    fn from(entry: &CartEntry) -> Self {
        let product = &entry.product;
        LineRecord {
            id: Some(product.id.clone()),
            name: Some(Value::from(product.name.as_str())),
            image: Some(Value::from(product.image.as_str())),
            price_range: Some(Value::from(product.price_range.as_str())),
            quantity: Some(Value::from(entry.quantity)),
            discount: Some(Value::from(product.discount)),
            rating: Some(Value::from(product.rating)),
            ..Default::default()
        }
    }
}

/// Cart snapshot handed from the cart screen to the order screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    #[serde(default)]
    pub cart_items: Vec<LineRecord>,
}

impl CartPayload {
    /// Order lines for a fresh order; see [`OrderLine::from_cart_record`].
    pub fn into_lines(self) -> Vec<OrderLine> {
        self.cart_items
            .iter()
            .filter_map(OrderLine::from_cart_record)
            .collect()
    }
}

impl OrderLine {
    /// Build a fresh line from a cart snapshot record.
    ///
    /// The line starts in quantity mode with an empty amount. Returns `None`
    /// for records without an id.
    pub fn from_cart_record(record: &LineRecord) -> Option<OrderLine> {
        let id = record.id.clone()?;
        let price_range = text(record.price_range.as_ref());
        let unit_price = price_range
            .as_deref()
            .and_then(parsed_price)
            .unwrap_or(DEFAULT_UNIT_PRICE);
        let unit_price = Money::from_decimal(unit_price);

        Some(OrderLine {
            id,
            name: text(record.name.as_ref()).unwrap_or_default(),
            image: text(record.image.as_ref()).unwrap_or_default(),
            price_per_unit: unit_price,
            quantity: normalized_quantity(record.quantity.as_ref()),
            amount: String::new(),
            choose_by: PricingMode::Quantity,
            selected_option: PricingMode::Quantity,
            from_price: unit_price,
            discount: truthy_number(record.discount.as_ref()).unwrap_or(0.0),
            rating: truthy_number(record.rating.as_ref()).unwrap_or(DEFAULT_RATING),
            price_range: price_range.unwrap_or_else(|| default_price_range(unit_price)),
        })
    }

    /// Rebuild a line from a stored record.
    ///
    /// Unlike [`OrderLine::from_cart_record`], stored pricing fields, the
    /// amount and the selected mode are honoured when present. Returns
    /// `None` for records without an id.
    pub fn from_stored_record(record: &LineRecord) -> Option<OrderLine> {
        let id = record.id.clone()?;
        let price_range = text(record.price_range.as_ref());
        let parsed = price_range.as_deref().and_then(parsed_price);
        let unit_price = parsed
            .or_else(|| truthy_number(record.price_per_unit.as_ref()))
            .unwrap_or(DEFAULT_UNIT_PRICE);
        let from_price = parsed
            .or_else(|| truthy_number(record.from_price.as_ref()))
            .unwrap_or(DEFAULT_UNIT_PRICE);
        let unit_price = Money::from_decimal(unit_price);
        let mode = |label: &Option<Value>| {
            label
                .as_ref()
                .and_then(Value::as_str)
                .and_then(PricingMode::from_label)
                .unwrap_or_default()
        };

        Some(OrderLine {
            id,
            name: text(record.name.as_ref()).unwrap_or_default(),
            image: text(record.image.as_ref()).unwrap_or_default(),
            price_per_unit: unit_price,
            quantity: normalized_quantity(record.quantity.as_ref()),
            amount: amount_text(record.amount.as_ref()),
            choose_by: mode(&record.choose_by),
            selected_option: mode(&record.selected_option),
            from_price: Money::from_decimal(from_price),
            discount: truthy_number(record.discount.as_ref()).unwrap_or(0.0),
            rating: truthy_number(record.rating.as_ref()).unwrap_or(DEFAULT_RATING),
            price_range: price_range.unwrap_or_else(|| default_price_range(unit_price)),
        })
    }
}

/// Normalize stored records, dropping any that cannot be addressed.
pub fn lines_from_stored(records: &[LineRecord]) -> Vec<OrderLine> {
    records
        .iter()
        .filter_map(OrderLine::from_stored_record)
        .collect()
}

/// Range text synthesized for records that lost theirs.
fn default_price_range(unit_price: Money) -> String {
    format!("\u{20b5}{} - \u{20b5}100", unit_price.to_input_text())
}

/// A zero lower bound is treated like an unparseable one.
fn parsed_price(range: &str) -> Option<f64> {
    try_parse_lower_price(range).filter(|p| *p != 0.0)
}

/// An id given as a string or a number; anything else reads as missing.
fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ProductId>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(ProductId::new(s)),
        Some(Value::Number(n)) => Some(ProductId::new(n.to_string())),
        _ => None,
    })
}

/// Text of a field. Numbers are rendered; other types read as missing.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric value of a field, or `None` when it is absent, zero, empty or
/// not a number.
fn truthy_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal_prefix(s),
        _ => None,
    }?;
    (number != 0.0 && number.is_finite()).then_some(number)
}

/// Stored quantity, defaulting to one and floored at one.
fn normalized_quantity(value: Option<&Value>) -> QuantityInput {
    match truthy_number(value) {
        Some(n) => QuantityInput::Count((n.trunc() as i64).max(1)),
        None => QuantityInput::Count(1),
    }
}

/// Stored amount as text; numbers are rendered, falsy values become empty.
fn amount_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => String::new(),
    }
}
