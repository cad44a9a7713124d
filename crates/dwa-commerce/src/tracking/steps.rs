//! Delivery progress steps and the timed auto-advance.

use std::time::Duration;

use dwa_observability::StructuredLogger;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default time between automatic step advances.
pub const STEP_INTERVAL: Duration = Duration::from_secs(5);

/// One of the three delivery progress steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TrackingStep {
    #[default]
    OrderPlaced,
    Sending,
    Delivered,
}

impl TrackingStep {
    /// All steps in order.
    pub const ALL: [TrackingStep; 3] = [
        TrackingStep::OrderPlaced,
        TrackingStep::Sending,
        TrackingStep::Delivered,
    ];

    /// Step number, 1 to 3.
    pub fn number(&self) -> u8 {
        match self {
            TrackingStep::OrderPlaced => 1,
            TrackingStep::Sending => 2,
            TrackingStep::Delivered => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackingStep::OrderPlaced => "Order Placed",
            TrackingStep::Sending => "Sending order",
            TrackingStep::Delivered => "Delivered",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrackingStep::OrderPlaced => "Your order is being prepared",
            TrackingStep::Sending => "Your order is on the way",
            TrackingStep::Delivered => "Your order has been delivered",
        }
    }

    /// The following step, or `None` at the terminal step.
    pub fn next(&self) -> Option<TrackingStep> {
        match self {
            TrackingStep::OrderPlaced => Some(TrackingStep::Sending),
            TrackingStep::Sending => Some(TrackingStep::Delivered),
            TrackingStep::Delivered => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

/// Monotonic step state. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingProgress {
    step: TrackingStep,
}

impl TrackingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> TrackingStep {
        self.step
    }

    /// Move one step forward. Returns the new step, or `None` when
    /// already delivered.
    pub fn advance(&mut self) -> Option<TrackingStep> {
        let next = self.step.next()?;
        self.step = next;
        Some(next)
    }

    pub fn is_complete(&self) -> bool {
        self.step.is_terminal()
    }

    /// Whether `step` has been reached.
    pub fn has_reached(&self, step: TrackingStep) -> bool {
        self.step >= step
    }
}

/// Background task that advances a [`TrackingProgress`] once per interval
/// until delivered.
///
/// Dropping the ticker aborts the task, so nothing advances after the
/// tracking screen is gone.
pub struct StepTicker {
    rx: watch::Receiver<TrackingStep>,
    handle: JoinHandle<()>,
}

impl StepTicker {
    /// Start ticking from the first step. Must be called inside a tokio
    /// runtime.
    pub fn spawn(interval: Duration, logger: StructuredLogger) -> Self {
        let mut progress = TrackingProgress::new();
        let (tx, rx) = watch::channel(progress.step());

        let handle = tokio::spawn(async move {
            while !progress.is_complete() {
                tokio::time::sleep(interval).await;
                if let Some(step) = progress.advance() {
                    logger
                        .info_builder("tracking step advanced")
                        .field("step", step.number())
                        .field("label", step.label())
                        .emit();
                    tx.send_replace(step);
                }
            }
        });

        Self { rx, handle }
    }

    /// Latest published step.
    pub fn current(&self) -> TrackingStep {
        *self.rx.borrow()
    }

    /// A receiver that sees every later step change. It reports the
    /// sender as closed once delivered or once the ticker is dropped.
    pub fn subscribe(&self) -> watch::Receiver<TrackingStep> {
        self.rx.clone()
    }

    /// Whether the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for StepTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
