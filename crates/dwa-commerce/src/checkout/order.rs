//! Placed-order records passed from checkout to tracking.

use crate::money::Money;
use crate::order::{lines_from_stored, LineRecord, OrderLine};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Storage key of the placed-order snapshot.
pub const CURRENT_ORDER_KEY: &str = "currentOrder";

/// Flat delivery fee, in cedis.
pub const DELIVERY_FEE: f64 = 15.00;

/// Address shown when the order carries none.
pub const NO_ADDRESS: &str = "No address provided";

/// How the shopper pays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    /// Mobile money.
    Mobile,
    /// Bank transfer.
    Bank,
    /// Pay on delivery.
    Delivery,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl PaymentMethod {
    /// Stored code.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Mobile => "mobile",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Delivery => "delivery",
            PaymentMethod::Unknown(raw) => raw,
        }
    }

    /// Parse a stored code; unrecognised codes are kept as `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "mobile" => PaymentMethod::Mobile,
            "bank" => PaymentMethod::Bank,
            "delivery" => PaymentMethod::Delivery,
            other => PaymentMethod::Unknown(other.to_string()),
        }
    }

    /// Label shown on the tracking screen.
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            PaymentMethod::Mobile => Cow::Borrowed("Mobile Money"),
            PaymentMethod::Bank => Cow::Borrowed("Bank Transfer"),
            PaymentMethod::Delivery => Cow::Borrowed("Pay on Delivery"),
            PaymentMethod::Unknown(raw) if raw.is_empty() => {
                Cow::Borrowed("Unknown Payment Method")
            }
            PaymentMethod::Unknown(raw) => Cow::Borrowed(raw.as_str()),
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Unknown("Unknown".to_string())
    }
}

impl From<String> for PaymentMethod {
    fn from(code: String) -> Self {
        PaymentMethod::from_code(&code)
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> String {
        method.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// What the order screen hands to payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub cart_items: Vec<OrderLine>,
    pub total_amount: Money,
}

impl CheckoutPayload {
    /// Complete the order with payment details. The recorded total
    /// includes the delivery fee.
    pub fn into_order_data(
        self,
        delivery_address: impl Into<String>,
        payment_method: PaymentMethod,
        delivery_fee: Money,
    ) -> OrderData {
        OrderData {
            cart_items: self.cart_items,
            delivery_address: delivery_address.into(),
            payment_method,
            total: self.total_amount + delivery_fee,
        }
    }
}

/// A placed order, as handed to and stored by the tracking screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub cart_items: Vec<OrderLine>,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub total: Money,
}

impl OrderData {
    /// An order with no lines and default details.
    pub fn empty() -> Self {
        Self {
            cart_items: Vec::new(),
            delivery_address: NO_ADDRESS.to_string(),
            payment_method: PaymentMethod::default(),
            total: Money::zero(),
        }
    }

    /// Sum of placed line totals; see [`OrderLine::placed_total`].
    pub fn subtotal(&self) -> Money {
        self.cart_items.iter().map(OrderLine::placed_total).sum()
    }
}

/// Loosely typed [`OrderData`] as read back from storage or a payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDataRecord {
    pub cart_items: Option<Vec<LineRecord>>,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    pub total: Option<f64>,
}

impl From<OrderDataRecord> for OrderData {
    fn from(record: OrderDataRecord) -> Self {
        OrderData {
            cart_items: lines_from_stored(&record.cart_items.unwrap_or_default()),
            delivery_address: record
                .delivery_address
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| NO_ADDRESS.to_string()),
            payment_method: record
                .payment_method
                .filter(|m| !m.is_empty())
                .map(PaymentMethod::from)
                .unwrap_or_default(),
            total: record.total.map(Money::from_decimal).unwrap_or_default(),
        }
    }
}
