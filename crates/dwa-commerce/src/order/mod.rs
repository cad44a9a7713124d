//! Order review module.
//!
//! Turns cart snapshots into editable order lines with two pricing modes,
//! and keeps the order in sync with durable storage.

mod draft;
mod line;
mod session;
mod transform;

pub use draft::OrderDraft;
pub use line::{OrderLine, PricingMode, QuantityInput};
pub use session::{resolve_lines, LineSource, OrderSession, ResolvedLines, CART_ITEMS_KEY};
pub use transform::{lines_from_stored, CartPayload, LineRecord, DEFAULT_RATING, DEFAULT_UNIT_PRICE};
