//! Durable key-value storage for the Di-Dwa shop core.
//!
//! Provides a simple, ergonomic API over a key-addressed record store with
//! automatic JSON serialization. Absence of a key is a valid state, not an
//! error.
//!
//! # Example
//!
//! ```rust,ignore
//! use dwa_cache::Cache;
//!
//! let cache = Cache::open_dir("./.dwa-storage")?;
//!
//! // Store a value
//! cache.set("cartItems", &lines)?;
//!
//! // Retrieve a value
//! let lines: Option<Vec<OrderLine>> = cache.get("cartItems")?;
//!
//! // Delete a value
//! cache.delete("cartItems")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, MemoryStore, Store};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, MemoryStore, Store};
}
