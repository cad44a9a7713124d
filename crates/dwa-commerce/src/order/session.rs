//! Order review session: resolves where the order comes from and mirrors
//! every committed edit to durable storage.

use dwa_cache::{Cache, CacheError};
use dwa_observability::StructuredLogger;

use crate::checkout::CheckoutPayload;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::order::transform::lines_from_stored;
use crate::order::{CartPayload, LineRecord, OrderDraft, OrderLine, PricingMode};

/// Storage key of the order-line snapshot.
pub const CART_ITEMS_KEY: &str = "cartItems";

/// Where a session's lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    /// A payload handed over by the cart screen.
    Payload,
    /// The snapshot in durable storage.
    Storage,
    /// Neither was available.
    Empty,
}

impl LineSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineSource::Payload => "payload",
            LineSource::Storage => "storage",
            LineSource::Empty => "empty",
        }
    }
}

/// Lines picked by [`resolve_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLines {
    pub lines: Vec<OrderLine>,
    pub source: LineSource,
}

/// Pick the order's lines: a supplied payload always wins (even an empty
/// one) and storage is then never read; otherwise the stored snapshot is
/// re-normalized; otherwise the order is empty.
pub fn resolve_lines<F>(
    payload: Option<CartPayload>,
    read_stored: F,
) -> Result<ResolvedLines, CacheError>
where
    F: FnOnce() -> Result<Option<Vec<LineRecord>>, CacheError>,
{
    if let Some(payload) = payload {
        return Ok(ResolvedLines {
            lines: payload.into_lines(),
            source: LineSource::Payload,
        });
    }

    Ok(match read_stored()? {
        Some(records) => ResolvedLines {
            lines: lines_from_stored(&records),
            source: LineSource::Storage,
        },
        None => ResolvedLines {
            lines: Vec::new(),
            source: LineSource::Empty,
        },
    })
}

/// The order screen's state, backed by durable storage.
///
/// After every committed change a non-empty order is written under
/// [`CART_ITEMS_KEY`]. An empty order is never written: removing the last
/// line or clearing the order deletes the key instead, so a transient
/// empty state cannot overwrite a saved snapshot.
pub struct OrderSession {
    draft: OrderDraft,
    source: LineSource,
    cache: Cache,
    logger: StructuredLogger,
}

impl OrderSession {
    /// Load the order for this screen.
    ///
    /// A storage read failure is logged and yields an empty order.
    pub fn load(payload: Option<CartPayload>, cache: Cache, logger: StructuredLogger) -> Self {
        let resolved = resolve_lines(payload, || cache.get::<Vec<LineRecord>>(CART_ITEMS_KEY));
        let resolved = resolved.unwrap_or_else(|e| {
            logger
                .warn_builder("failed to read stored order, starting empty")
                .field("key", CART_ITEMS_KEY)
                .field("error", e.to_string())
                .emit();
            ResolvedLines {
                lines: Vec::new(),
                source: LineSource::Empty,
            }
        });

        logger
            .debug_builder("order loaded")
            .field("source", resolved.source.as_str())
            .field("lines", resolved.lines.len())
            .emit();

        let session = Self {
            draft: OrderDraft::new(resolved.lines),
            source: resolved.source,
            cache,
            logger,
        };
        session.mirror();
        session
    }

    /// Current order.
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[OrderLine] {
        self.draft.lines()
    }

    /// Where the lines were loaded from.
    pub fn source(&self) -> LineSource {
        self.source
    }

    /// See [`OrderDraft::update_item_quantity`].
    pub fn update_item_quantity(&mut self, id: &ProductId, raw: &str) -> bool {
        let changed = self.draft.update_item_quantity(id, raw);
        if changed {
            self.mirror();
        }
        changed
    }

    /// See [`OrderDraft::update_item_amount`].
    pub fn update_item_amount(&mut self, id: &ProductId, raw: impl Into<String>) -> bool {
        let changed = self.draft.update_item_amount(id, raw);
        if changed {
            self.mirror();
        }
        changed
    }

    /// See [`OrderDraft::toggle_choose_by`].
    pub fn toggle_choose_by(&mut self, id: &ProductId, mode: PricingMode) -> bool {
        let changed = self.draft.toggle_choose_by(id, mode);
        if changed {
            self.mirror();
        }
        changed
    }

    /// Remove a line; deletes the snapshot when it was the last one.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let removed = self.draft.remove_item(id);
        if !removed {
            return false;
        }
        if self.draft.is_empty() {
            self.delete_snapshot();
        } else {
            self.write_snapshot();
        }
        true
    }

    /// Remove every line and delete the snapshot.
    pub fn clear_all_items(&mut self) {
        self.draft.clear_all_items();
        self.delete_snapshot();
    }

    /// Sum of line totals.
    pub fn total_amount(&self) -> Money {
        self.draft.total_amount()
    }

    /// See [`OrderDraft::proceed_to_checkout`].
    pub fn proceed_to_checkout(&self) -> Result<CheckoutPayload, CommerceError> {
        let result = self.draft.proceed_to_checkout();
        match &result {
            Ok(payload) => self
                .logger
                .info_builder("proceeding to payment")
                .field("lines", payload.cart_items.len())
                .field("total", payload.total_amount.to_decimal())
                .emit(),
            Err(e) => self
                .logger
                .info_builder("checkout rejected")
                .field("reason", e.to_string())
                .emit(),
        }
        result
    }

    /// Give back the storage handle, e.g. to open the next screen.
    pub fn into_cache(self) -> Cache {
        self.cache
    }

    fn mirror(&self) {
        if !self.draft.is_empty() {
            self.write_snapshot();
        }
    }

    fn write_snapshot(&self) {
        match self.cache.set(CART_ITEMS_KEY, &self.draft) {
            Ok(()) => self
                .logger
                .debug_builder("order snapshot written")
                .field("lines", self.draft.len())
                .emit(),
            Err(e) => self
                .logger
                .warn_builder("failed to write order snapshot")
                .field("error", e.to_string())
                .emit(),
        }
    }

    fn delete_snapshot(&self) {
        match self.cache.delete(CART_ITEMS_KEY) {
            Ok(()) => self.logger.debug("order snapshot deleted"),
            Err(e) => self
                .logger
                .warn_builder("failed to delete order snapshot")
                .field("error", e.to_string())
                .emit(),
        }
    }
}
