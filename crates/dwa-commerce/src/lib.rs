//! Cart, order and delivery-tracking logic for the Di-Dwa storefront.
//!
//! - **Cart**: the shopper's product list with quantities
//! - **Order**: editable order lines priced by unit count or by amount,
//!   mirrored to durable storage
//! - **Checkout**: hand-off records between order, payment and tracking
//! - **Tracking**: delivery estimates and the timed progress steps
//!
//! # Example
//!
//! ```rust
//! use dwa_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(Product::new(1u64, "Tomatoes", "\u{20b5}10 - \u{20b5}20"), 2)?;
//! assert_eq!(cart.total_price(), Money::from_decimal(20.0));
//!
//! let cache = Cache::in_memory();
//! let logger = StructuredLogger::new("demo").with_component("order");
//! let mut order = OrderSession::load(Some(cart.to_payload()), cache, logger);
//!
//! let id = ProductId::from(1u64);
//! order.toggle_choose_by(&id, PricingMode::Amount);
//! order.update_item_amount(&id, "35");
//! assert_eq!(order.total_amount(), Money::from_decimal(35.0));
//! # Ok::<(), CommerceError>(())
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod price;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod order;
pub mod tracking;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::price::parse_lower_price;

    pub use crate::cart::{Cart, CartEntry};
    pub use crate::catalog::Product;

    pub use crate::order::{
        CartPayload, LineSource, OrderDraft, OrderLine, OrderSession, PricingMode, QuantityInput,
    };

    pub use crate::checkout::{CheckoutPayload, OrderData, PaymentMethod};

    pub use crate::tracking::{
        estimate_delivery, DeliveryEstimate, StepTicker, TrackingSession, TrackingStep,
    };

    pub use crate::config::CommerceConfig;

    pub use dwa_cache::Cache;
    pub use dwa_observability::StructuredLogger;
}
