//! Order tracking timeline.

use serde::{Deserialize, Serialize};

use crate::orders::DeliveryStatus;

/// A stage on the tracking timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingStage {
    Paid,
    Processing,
    Shipped,
    Delivered,
    Completed,
}

impl TrackingStage {
    /// Stages in timeline order.
    pub const ALL: [TrackingStage; 5] = [
        TrackingStage::Paid,
        TrackingStage::Processing,
        TrackingStage::Shipped,
        TrackingStage::Delivered,
        TrackingStage::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackingStage::Paid => "Paid",
            TrackingStage::Processing => "Processing",
            TrackingStage::Shipped => "Shipped",
            TrackingStage::Delivered => "Delivered",
            TrackingStage::Completed => "Completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrackingStage::Paid => "Payment received",
            TrackingStage::Processing => "Product being prepared for delivery",
            TrackingStage::Shipped => "Product on the way",
            TrackingStage::Delivered => "Product delivered",
            TrackingStage::Completed => "Order completed",
        }
    }

    /// Delivery status that puts an order at this stage.
    pub fn status(&self) -> DeliveryStatus {
        match self {
            TrackingStage::Paid => DeliveryStatus::Pending,
            TrackingStage::Processing => DeliveryStatus::Processing,
            TrackingStage::Shipped => DeliveryStatus::Shipped,
            TrackingStage::Delivered => DeliveryStatus::Delivered,
            TrackingStage::Completed => DeliveryStatus::Completed,
        }
    }

    /// Stage for a delivery status; `None` for unknown statuses.
    pub fn for_status(status: &DeliveryStatus) -> Option<TrackingStage> {
        TrackingStage::ALL.into_iter().find(|s| &s.status() == status)
    }
}

/// Where a stage sits relative to the order's current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Done,
    Current,
    Upcoming,
}

/// One row of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingStep {
    pub stage: TrackingStage,
    pub state: StageState,
}

/// Build the timeline for a delivery status.
///
/// An unknown status yields every stage as upcoming.
pub fn tracking_timeline(status: &DeliveryStatus) -> Vec<TrackingStep> {
    let current = TrackingStage::for_status(status)
        .and_then(|stage| TrackingStage::ALL.iter().position(|s| *s == stage));

    TrackingStage::ALL
        .iter()
        .enumerate()
        .map(|(index, stage)| {
            let state = match current {
                Some(c) if index < c => StageState::Done,
                Some(c) if index == c => StageState::Current,
                _ => StageState::Upcoming,
            };
            TrackingStep {
                stage: *stage,
                state,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(status: DeliveryStatus) -> Vec<StageState> {
        tracking_timeline(&status).into_iter().map(|s| s.state).collect()
    }

    #[test]
    fn test_pending_is_paid_stage() {
        use StageState::*;
        assert_eq!(
            states(DeliveryStatus::Pending),
            vec![Current, Upcoming, Upcoming, Upcoming, Upcoming]
        );
    }

    #[test]
    fn test_shipped_marks_earlier_stages_done() {
        use StageState::*;
        assert_eq!(
            states(DeliveryStatus::Shipped),
            vec![Done, Done, Current, Upcoming, Upcoming]
        );
    }

    #[test]
    fn test_unknown_status_is_all_upcoming() {
        let steps = states(DeliveryStatus::Other("lost".to_string()));
        assert!(steps.iter().all(|s| *s == StageState::Upcoming));
    }

    #[test]
    fn test_stage_text() {
        let timeline = tracking_timeline(&DeliveryStatus::Completed);
        assert_eq!(timeline.len(), 5);
        assert_eq!(timeline[4].stage.label(), "Completed");
        assert_eq!(timeline[4].state, StageState::Current);
        assert_eq!(timeline[0].stage.description(), "Payment received");
    }
}
