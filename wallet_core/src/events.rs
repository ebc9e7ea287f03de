//! Terminal transaction events, fanned out to every subscriber.

use fbx_rpc::BroadcastResult;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::error::ErrorPayload;

/// `data` of a `transactionSuccess` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPayload {
    pub submission_id: u64,
    #[serde(flatten)]
    pub result: BroadcastResult,
}

/// Serializes as `{"event": "transactionSuccess", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum TransactionEvent {
    TransactionSuccess(SuccessPayload),
    TransactionFail(ErrorPayload),
}

impl TransactionEvent {
    pub fn submission_id(&self) -> u64 {
        match self {
            Self::TransactionSuccess(p) => p.submission_id,
            Self::TransactionFail(p) => p.submission_id,
        }
    }
}

/// Process-wide event channel. Cloning shares the channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TransactionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        drop(subscription);
    }

    /// Returns the number of subscribers that will see the event.
    pub fn publish(&self, event: TransactionEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

pub struct Subscription {
    rx: broadcast::Receiver<TransactionEvent>,
}

impl Subscription {
    /// Next event, or `None` once the bus is gone. Events missed because the
    /// subscriber fell behind are skipped.
    pub async fn recv(&mut self) -> Option<TransactionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<TransactionEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::orchestrator::SubmissionState;
    use serde_json::json;

    fn success(id: u64) -> TransactionEvent {
        TransactionEvent::TransactionSuccess(SuccessPayload {
            submission_id: id,
            result: BroadcastResult {
                hash: "AB".into(),
                raw_log: "[]".into(),
                success: true,
                code: 0,
            },
        })
    }

    #[test]
    fn success_wire_shape() {
        assert_eq!(
            serde_json::to_value(success(1)).unwrap(),
            json!({
                "event": "transactionSuccess",
                "data": { "submissionId": 1, "hash": "AB", "rawLog": "[]", "success": true, "code": 0 }
            })
        );
    }

    #[test]
    fn fail_wire_shape() {
        let event = TransactionEvent::TransactionFail(ErrorPayload {
            submission_id: 2,
            kind: ErrorKind::Validation,
            stage: SubmissionState::Building,
            message: "unknown chain: XYZ".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "transactionFail");
        assert_eq!(json["data"]["kind"], "validation");
        assert_eq!(json["data"]["stage"], "building");
    }

    #[tokio::test]
    async fn every_subscriber_sees_events() {
        let bus = EventBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.publish(success(7)), 2);
        assert_eq!(a.recv().await.unwrap().submission_id(), 7);
        assert_eq!(b.recv().await.unwrap().submission_id(), 7);
    }

    #[test]
    fn unsubscribe_and_publish_without_subscribers() {
        let bus = EventBus::new(8);
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        bus.unsubscribe(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(success(1)), 0);
    }
}
