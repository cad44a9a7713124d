//! Checkout module.
//!
//! Contains the hand-off records between the order, payment and tracking
//! screens. Payment itself is not processed here.

mod order;

pub use order::{
    CheckoutPayload, OrderData, OrderDataRecord, PaymentMethod, CURRENT_ORDER_KEY, DELIVERY_FEE,
    NO_ADDRESS,
};
