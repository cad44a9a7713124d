//! Order tracking module.
//!
//! Delivery estimates, the three-step progress timeline and the tracking
//! screen session that ties them to a placed order.

mod delivery;
mod session;
mod steps;

pub use delivery::{
    estimate_delivery, format_delivery_date, ordinal_suffix, DeliveryEstimate, DeliveryRules,
    DEFAULT_WINDOW,
};
pub use session::{OrderSource, TrackingSession};
pub use steps::{StepTicker, TrackingProgress, TrackingStep, STEP_INTERVAL};
