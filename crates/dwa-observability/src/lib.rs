//! Structured logging for the Di-Dwa shop core.
//!
//! This crate provides:
//! - `StructuredLogger` - session-scoped structured logging
//! - `LogBuilder` - fluent construction of entries with typed fields
//!
//! Entries are dispatched as `tracing` events, so the host decides where
//! they end up by installing a subscriber.

mod logging;

pub use logging::*;
