//! Product catalog module.
//!
//! Products are external input; the catalog itself lives elsewhere.

mod product;

pub use product::Product;
