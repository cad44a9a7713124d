//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and order operations.
///
/// Malformed price, quantity and amount text never produces an error:
/// those are recovered with documented fallbacks where they are parsed.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity added to the cart was not positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in quantity or money calculation")]
    Overflow,

    /// Checkout attempted with no order lines.
    #[error("Your cart is empty!")]
    EmptyCheckout,

    /// Durable storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] dwa_cache::CacheError),

    /// Storage settings that cannot be opened as configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CommerceError {
    /// Message to show the shopper, for errors that are surfaced at all.
    pub fn user_notice(&self) -> Option<String> {
        match self {
            CommerceError::EmptyCheckout => Some(self.to_string()),
            _ => None,
        }
    }
}
