use crate::envelope::Envelope;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An event produced by the underlying service connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConnectionEvent {
    /// The connection is up and authenticated; chat login may begin.
    SessionEstablished,
    /// A response arrived from the service.
    ResponseReceived { envelope: Envelope },
    /// The connection was closed.
    SessionClosed { reason: String },
    /// The service answered a request with an error.
    Error {
        envelope: Envelope,
        target: String,
        reason: String,
    },
}

impl ConnectionEvent {
    /// Builds an error event the way the service reports them: the reason
    /// sits in the envelope's `body`.
    pub fn error(envelope: Envelope) -> Self {
        let reason = envelope.get_str("body").unwrap_or_default().to_string();
        Self::Error {
            target: envelope.target.clone(),
            reason,
            envelope,
        }
    }
}

/// The established request/response connection a chat session rides on.
///
/// Connection setup, authentication and serialization all live behind this
/// trait. From the session's side a send is fire-and-forget.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Transmits a request envelope.
    async fn send_request(&self, request: Envelope) -> Result<(), anyhow::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeBuilder;
    use serde_json::json;

    #[test]
    fn test_error_event_takes_reason_from_body() {
        let env = EnvelopeBuilder::new("/chat-login")
            .field("body", "character not found")
            .build();

        match ConnectionEvent::error(env) {
            ConnectionEvent::Error { target, reason, .. } => {
                assert_eq!(target, "/chat-login");
                assert_eq!(reason, "character not found");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_events_deserialize_from_tagged_json() {
        let established: ConnectionEvent =
            serde_json::from_value(json!({"event": "session_established"})).unwrap();
        assert_eq!(established, ConnectionEvent::SessionEstablished);

        let response: ConnectionEvent = serde_json::from_value(json!({
            "event": "response_received",
            "envelope": {"target": "/chat-logout"}
        }))
        .unwrap();
        assert_eq!(
            response,
            ConnectionEvent::ResponseReceived {
                envelope: Envelope::new("/chat-logout")
            }
        );
    }
}
