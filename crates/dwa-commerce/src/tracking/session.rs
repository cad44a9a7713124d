//! Tracking screen state.

use std::borrow::Cow;
use std::time::Duration;

use chrono::NaiveDateTime;
use dwa_cache::{Cache, CacheError};
use dwa_observability::StructuredLogger;
use tokio::sync::watch;

use crate::checkout::{OrderData, OrderDataRecord, PaymentMethod, CURRENT_ORDER_KEY, NO_ADDRESS};
use crate::config::CommerceConfig;
use crate::ids::OrderId;
use crate::money::Money;
use crate::order::{lines_from_stored, LineRecord, OrderLine, CART_ITEMS_KEY};
use crate::tracking::{DeliveryEstimate, DeliveryRules, StepTicker, TrackingStep};

/// Where a tracking session's order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// Handed over by the payment screen.
    Payload,
    /// The stored `currentOrder` record.
    CurrentOrder,
    /// Rebuilt from the stored order lines.
    CartItems,
    /// Nothing found, or storage could not be read.
    Empty,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::Payload => "payload",
            OrderSource::CurrentOrder => "current_order",
            OrderSource::CartItems => "cart_items",
            OrderSource::Empty => "empty",
        }
    }
}

/// A placed order being tracked.
///
/// The order id is generated once per session. The delivery estimate is
/// computed at load and recomputed only when the address changes.
pub struct TrackingSession {
    order: OrderData,
    source: OrderSource,
    order_id: OrderId,
    delivery_fee: Money,
    rules: DeliveryRules,
    estimate: DeliveryEstimate,
    support_phone: String,
    step_interval: Duration,
    ticker: Option<StepTicker>,
    logger: StructuredLogger,
}

impl TrackingSession {
    /// Load the order to track.
    ///
    /// A supplied order wins and is saved as the current order. Otherwise
    /// the saved current order is used, then the saved order lines (with
    /// the delivery fee added to their subtotal). A storage read failure
    /// is logged and yields an empty order with default details.
    pub fn load(
        payload: Option<OrderData>,
        cache: &Cache,
        config: &CommerceConfig,
        logger: StructuredLogger,
        now: NaiveDateTime,
    ) -> Self {
        let delivery_fee = config.delivery_fee();

        let (order, source) = match payload {
            Some(order) => {
                if let Err(e) = cache.set(CURRENT_ORDER_KEY, &order) {
                    logger
                        .warn_builder("failed to save current order")
                        .field("error", e.to_string())
                        .emit();
                }
                (normalize(order), OrderSource::Payload)
            }
            None => read_stored(cache, delivery_fee).unwrap_or_else(|e| {
                logger
                    .warn_builder("failed to read stored order, showing defaults")
                    .field("error", e.to_string())
                    .emit();
                (OrderData::empty(), OrderSource::Empty)
            }),
        };

        let estimate = config
            .delivery
            .estimate(now, Some(order.delivery_address.as_str()));
        let order_id = OrderId::generate();

        logger
            .info_builder("tracking order loaded")
            .field("order_id", order_id.as_str())
            .field("source", source.as_str())
            .field("lines", order.cart_items.len())
            .emit();

        Self {
            order,
            source,
            order_id,
            delivery_fee,
            rules: config.delivery.clone(),
            estimate,
            support_phone: config.tracking.support_phone.clone(),
            step_interval: config.tracking.step_interval(),
            ticker: None,
            logger,
        }
    }

    pub fn order(&self) -> &OrderData {
        &self.order
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn source(&self) -> OrderSource {
        self.source
    }

    pub fn items(&self) -> &[OrderLine] {
        &self.order.cart_items
    }

    /// Total recorded with the order.
    pub fn order_total(&self) -> Money {
        self.order.total
    }

    pub fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.order.subtotal()
    }

    /// Subtotal plus delivery fee.
    pub fn grand_total(&self) -> Money {
        self.subtotal() + self.delivery_fee
    }

    pub fn payment_method(&self) -> &PaymentMethod {
        &self.order.payment_method
    }

    /// Payment method label, e.g. "Mobile Money".
    pub fn payment_method_display(&self) -> Cow<'_, str> {
        self.order.payment_method.display_name()
    }

    pub fn delivery_estimate(&self) -> &DeliveryEstimate {
        &self.estimate
    }

    /// Change the delivery address. The estimate is recomputed against
    /// `now` only when the address actually changes.
    pub fn set_delivery_address(&mut self, address: impl Into<String>, now: NaiveDateTime) {
        let address = address.into();
        if address == self.order.delivery_address {
            return;
        }
        self.order.delivery_address = address;
        self.estimate = self
            .rules
            .estimate(now, Some(self.order.delivery_address.as_str()));
    }

    /// Notice for the "call delivery agent" action.
    pub fn call_delivery_agent(&self) -> String {
        let notice = format!("Calling delivery agent: {}", self.support_phone);
        self.logger
            .info_builder("support action")
            .field("action", "call_delivery_agent")
            .field("order_id", self.order_id.as_str())
            .emit();
        notice
    }

    /// Notice for the "open chat support" action.
    pub fn open_chat_support(&self) -> String {
        self.logger
            .info_builder("support action")
            .field("action", "open_chat_support")
            .field("order_id", self.order_id.as_str())
            .emit();
        "Opening chat support...".to_string()
    }

    /// Start the step auto-advance; a no-op when already running. Must be
    /// called inside a tokio runtime.
    pub fn start_tracking(&mut self) -> watch::Receiver<TrackingStep> {
        let ticker = self.ticker.get_or_insert_with(|| {
            StepTicker::spawn(
                self.step_interval,
                self.logger.clone().with_component("tracking"),
            )
        });
        ticker.subscribe()
    }

    /// Latest step; the first step before tracking starts.
    pub fn current_step(&self) -> TrackingStep {
        self.ticker
            .as_ref()
            .map(StepTicker::current)
            .unwrap_or_default()
    }

    /// Stop the auto-advance, as when leaving the screen.
    pub fn stop_tracking(&mut self) {
        self.ticker = None;
    }
}

fn normalize(mut order: OrderData) -> OrderData {
    if order.delivery_address.is_empty() {
        order.delivery_address = NO_ADDRESS.to_string();
    }
    if order.payment_method == PaymentMethod::Unknown(String::new()) {
        order.payment_method = PaymentMethod::default();
    }
    order
}

fn read_stored(cache: &Cache, delivery_fee: Money) -> Result<(OrderData, OrderSource), CacheError> {
    if let Some(record) = cache.get::<OrderDataRecord>(CURRENT_ORDER_KEY)? {
        return Ok((OrderData::from(record), OrderSource::CurrentOrder));
    }

    if let Some(records) = cache.get::<Vec<LineRecord>>(CART_ITEMS_KEY)? {
        let cart_items = lines_from_stored(&records);
        let subtotal: Money = cart_items.iter().map(OrderLine::placed_total).sum();
        // Lines alone carry no address or payment details.
        let order = OrderData {
            cart_items,
            delivery_address: String::new(),
            payment_method: PaymentMethod::Unknown(String::new()),
            total: subtotal + delivery_fee,
        };
        return Ok((order, OrderSource::CartItems));
    }

    Ok((
        OrderData {
            delivery_address: String::new(),
            payment_method: PaymentMethod::Unknown(String::new()),
            ..OrderData::empty()
        },
        OrderSource::Empty,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn logger() -> StructuredLogger {
        StructuredLogger::new("test").with_component("tracking")
    }

    fn tuesday_morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 13)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn order() -> OrderData {
        let record: OrderDataRecord = serde_json::from_value(json!({
            "cartItems": [
                {"id": 1, "name": "Tomatoes", "priceRange": "₵10 - ₵20", "quantity": 2},
                {"id": 2, "name": "Onions", "priceRange": "₵4 - ₵8", "selectedOption": "Amount", "amount": "7.5"},
            ],
            "deliveryAddress": "Osu, Accra",
            "paymentMethod": "mobile",
            "total": 42.5,
        }))
        .unwrap();
        OrderData::from(record)
    }

    fn load(payload: Option<OrderData>, cache: &Cache) -> TrackingSession {
        TrackingSession::load(
            payload,
            cache,
            &CommerceConfig::default(),
            logger(),
            tuesday_morning(),
        )
    }

    #[test]
    fn test_payload_is_saved_as_current_order() {
        let cache = Cache::in_memory();
        let session = load(Some(order()), &cache);

        assert_eq!(session.source(), OrderSource::Payload);
        assert_eq!(session.subtotal(), Money::from_decimal(27.5));
        assert_eq!(session.grand_total(), Money::from_decimal(42.5));
        assert_eq!(session.order_total(), Money::from_decimal(42.5));
        assert_eq!(session.payment_method_display(), "Mobile Money");
        assert!(cache.exists(CURRENT_ORDER_KEY).unwrap());

        let reloaded = load(None, &cache);
        assert_eq!(reloaded.source(), OrderSource::CurrentOrder);
        assert_eq!(reloaded.order(), session.order());
    }

    #[test]
    fn test_payload_line_mid_edit_counts_one_unit() {
        let mut placed = order();
        placed.cart_items[0].set_quantity_input("");

        let session = load(Some(placed), &Cache::in_memory());
        // Tomatoes at 10 for one unit, plus 7.5 by amount.
        assert_eq!(session.subtotal(), Money::from_decimal(17.5));
        assert_eq!(session.grand_total(), Money::from_decimal(32.5));
    }

    #[test]
    fn test_falls_back_to_stored_lines() {
        let cache = Cache::in_memory();
        cache
            .set(
                CART_ITEMS_KEY,
                &json!([{"id": 1, "pricePerUnit": 10, "quantity": 2}]),
            )
            .unwrap();

        let session = load(None, &cache);
        assert_eq!(session.source(), OrderSource::CartItems);
        assert_eq!(session.order_total(), Money::from_decimal(35.0));
        assert_eq!(session.payment_method_display(), "Unknown Payment Method");
        assert_eq!(
            session.delivery_estimate().address,
            "Delivery address not provided"
        );
    }

    #[test]
    fn test_nothing_stored() {
        let cache = Cache::in_memory();
        let session = load(None, &cache);
        assert_eq!(session.source(), OrderSource::Empty);
        assert!(session.items().is_empty());
        assert_eq!(session.order_total(), Money::zero());
        assert_eq!(session.grand_total(), Money::from_decimal(15.0));
    }

    #[test]
    fn test_unreadable_storage_uses_defaults() {
        let cache = Cache::in_memory();
        cache.set_raw(CURRENT_ORDER_KEY, "not json").unwrap();

        let session = load(None, &cache);
        assert_eq!(session.source(), OrderSource::Empty);
        assert_eq!(session.order().delivery_address, NO_ADDRESS);
        assert_eq!(session.payment_method_display(), "Unknown");
        assert_eq!(session.order_total(), Money::zero());
    }

    #[test]
    fn test_missing_details_in_payload_get_defaults() {
        let cache = Cache::in_memory();
        let mut payload = order();
        payload.delivery_address.clear();
        payload.payment_method = PaymentMethod::from_code("");

        let session = load(Some(payload), &cache);
        assert_eq!(session.order().delivery_address, NO_ADDRESS);
        assert_eq!(session.payment_method_display(), "Unknown");
    }

    #[test]
    fn test_estimate_recomputed_only_on_address_change() {
        let cache = Cache::in_memory();
        let mut session = load(Some(order()), &cache);
        assert_eq!(session.delivery_estimate().address, "Osu, Accra");
        assert_eq!(session.delivery_estimate().time, "12:00 - 14:00");

        let evening = NaiveDate::from_ymd_opt(2026, 10, 13)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();

        session.set_delivery_address("Osu, Accra", evening);
        assert_eq!(session.delivery_estimate().time, "12:00 - 14:00");

        session.set_delivery_address("Labone, Accra", evening);
        assert_eq!(session.delivery_estimate().address, "Labone, Accra");
        assert_eq!(session.delivery_estimate().date, "14th Oct, 2026");
    }

    #[test]
    fn test_order_id_is_stable_per_session() {
        let cache = Cache::in_memory();
        let session = load(Some(order()), &cache);
        let id = session.order_id().clone();
        assert_eq!(session.order_id(), &id);
        assert!(id.as_str().starts_with("DD"));

        let other = load(None, &cache);
        assert_ne!(other.order_id(), &id);
    }

    #[test]
    fn test_support_actions() {
        let cache = Cache::in_memory();
        let session = load(None, &cache);
        assert_eq!(
            session.call_delivery_agent(),
            "Calling delivery agent: +233 50 123 4567"
        );
        assert_eq!(session.open_chat_support(), "Opening chat support...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracking_runs_until_stopped() {
        let cache = Cache::in_memory();
        let mut session = load(Some(order()), &cache);
        assert_eq!(session.current_step(), TrackingStep::OrderPlaced);

        let mut rx = session.start_tracking();
        rx.changed().await.unwrap();
        assert_eq!(session.current_step(), TrackingStep::Sending);

        session.stop_tracking();
        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), TrackingStep::Sending);
        assert_eq!(session.current_step(), TrackingStep::OrderPlaced);
    }
}
