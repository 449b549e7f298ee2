//! Change notifications for renderers
//!
//! A renderer subscribes once and redraws whenever an event arrives. Events are published
//! on a `tokio::sync::broadcast` channel; publishing with no subscriber is a no-op and a
//! slow subscriber only loses old events (`RecvError::Lagged`), never blocks the form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Form field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Phone,
    Amount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Phone => "phone",
            Field::Amount => "amount",
        }
    }
}

/// Why a submit attempt did not reach the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// At least one field failed validation
    Invalid,
    /// A submission is already in flight
    InFlight,
}

/// Something observable changed on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FormEvent {
    /// A field was edited and re-validated
    FieldValidated { field: Field, valid: bool },
    /// A submit attempt was refused locally
    SubmissionBlocked { reason: BlockReason },
    /// The gateway call was issued
    SubmissionStarted { submission_id: Uuid },
    /// The gateway accepted the payment
    SubmissionSucceeded { submission_id: Uuid },
    /// The gateway call failed; `message` is the status line shown to the user
    SubmissionFailed { submission_id: Uuid, message: String },
}

/// Event plus the time it was published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEventEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: FormEvent,
}

/// Broadcast channel for [`FormEventEnvelope`]s
#[derive(Debug, Clone)]
pub struct FormEventBus {
    sender: broadcast::Sender<FormEventEnvelope>,
}

impl FormEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event; returns the number of subscribers that received it
    pub fn publish(&self, event: FormEvent) -> usize {
        let envelope = FormEventEnvelope {
            timestamp: Utc::now(),
            event,
        };
        self.sender.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for FormEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = FormEventBus::default();
        assert_eq!(
            bus.publish(FormEvent::FieldValidated {
                field: Field::Phone,
                valid: true
            }),
            0
        );
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = FormEventBus::new(8);
        let mut rx = bus.subscribe();

        let delivered = bus.publish(FormEvent::SubmissionBlocked {
            reason: BlockReason::Invalid,
        });
        assert_eq!(delivered, 1);

        let envelope = rx.recv().await.unwrap();
        assert_eq!(
            envelope.event,
            FormEvent::SubmissionBlocked {
                reason: BlockReason::Invalid
            }
        );
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let value = serde_json::to_value(FormEvent::FieldValidated {
            field: Field::Amount,
            valid: false,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"event": "field_validated", "field": "amount", "valid": false})
        );
    }
}
