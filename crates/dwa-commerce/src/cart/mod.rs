//! Shopping cart module.
//!
//! The cart store is an owned value passed to whichever screen needs it.

mod cart;

pub use cart::{Cart, CartEntry};
