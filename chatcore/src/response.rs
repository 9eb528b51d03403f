//! Typed views over inbound responses, one per route this crate consumes.

use crate::envelope::Envelope;
use crate::error::EnvelopeError;
use crate::protocol::chat_types;
use crate::types::message::ChatMessage;
use crate::types::presence::Presence;

/// Acknowledgement of a `/chat-login` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub chat_session_id: String,
}

impl TryFrom<&Envelope> for LoginResponse {
    type Error = EnvelopeError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        Ok(Self {
            chat_session_id: envelope.require_str("chatSessionId")?.to_string(),
        })
    }
}

/// A `/chat` response, keyed by its `chatType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// The service accepted something we sent. Nothing to surface.
    MessageAck,
    Message(ChatMessage),
    Presence(Presence),
    /// A `chatType` this crate does not know. Kept so callers can log it.
    Unrecognized(String),
}

impl TryFrom<&Envelope> for ChatEvent {
    type Error = EnvelopeError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        let chat_type = envelope.require_str("chatType")?;
        match chat_type {
            chat_types::MESSAGE_ACK => Ok(Self::MessageAck),
            chat_types::WOW_MESSAGE => ChatMessage::try_from(envelope).map(Self::Message),
            chat_types::WOW_PRESENCE => Presence::try_from(envelope).map(Self::Presence),
            other => Ok(Self::Unrecognized(other.to_string())),
        }
    }
}
