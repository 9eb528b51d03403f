//! Outbound requests issued by a chat session.
//!
//! Field names are the service's, short as they are: `n` and `r` are the
//! character name and realm, `cn` is the character name again on the
//! keep-alive route.

use crate::envelope::{Envelope, EnvelopeBuilder};
use crate::protocol::{ProtocolEnvelope, routes};
use crate::types::message::MessageType;

/// Identity a chat session logs in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub name: String,
    pub realm: String,
}

impl ChatIdentity {
    pub fn new(name: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            realm: realm.into(),
        }
    }
}

/// Wire format: `{"target": "/chat-login", "options": {"matureFilter": "false"}, "n": .., "r": ..}`
#[derive(Debug, Clone)]
pub struct LoginRequest<'a> {
    pub identity: &'a ChatIdentity,
    pub mature_filter: bool,
}

impl ProtocolEnvelope for LoginRequest<'_> {
    fn target(&self) -> &'static str {
        routes::CHAT_LOGIN
    }

    fn into_envelope(self) -> Envelope {
        // The service expects the flag as a string.
        EnvelopeBuilder::new(self.target())
            .object("options", [("matureFilter", self.mature_filter.to_string())])
            .field("n", self.identity.name.as_str())
            .field("r", self.identity.realm.as_str())
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct LogoutRequest<'a> {
    pub chat_session_id: &'a str,
}

impl ProtocolEnvelope for LogoutRequest<'_> {
    fn target(&self) -> &'static str {
        routes::CHAT_LOGOUT
    }

    fn into_envelope(self) -> Envelope {
        EnvelopeBuilder::new(self.target())
            .field("chatSessionId", self.chat_session_id)
            .build()
    }
}

/// Periodic "still here" ping. Not a chat message.
#[derive(Debug, Clone)]
pub struct KeepAliveRequest<'a> {
    pub identity: &'a ChatIdentity,
}

impl ProtocolEnvelope for KeepAliveRequest<'_> {
    fn target(&self) -> &'static str {
        routes::KEEP_ALIVE
    }

    fn into_envelope(self) -> Envelope {
        EnvelopeBuilder::new(self.target())
            .field("r", self.identity.realm.as_str())
            .field("cn", self.identity.name.as_str())
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct GuildMessageRequest<'a> {
    pub message_type: &'a MessageType,
    pub body: &'a str,
    pub chat_session_id: &'a str,
}

impl ProtocolEnvelope for GuildMessageRequest<'_> {
    fn target(&self) -> &'static str {
        routes::CHAT_GUILD
    }

    fn into_envelope(self) -> Envelope {
        EnvelopeBuilder::new(self.target())
            .field("type", self.message_type.as_str())
            .field("body", self.body)
            .field("chatSessionId", self.chat_session_id)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct WhisperRequest<'a> {
    /// Recipient character reference, `<prefix>:<name>:<realmId>`.
    pub to: &'a str,
    pub body: &'a str,
    pub chat_session_id: &'a str,
}

impl ProtocolEnvelope for WhisperRequest<'_> {
    fn target(&self) -> &'static str {
        routes::CHAT_WHISPER
    }

    fn into_envelope(self) -> Envelope {
        EnvelopeBuilder::new(self.target())
            .field("to", self.to)
            .field("body", self.body)
            .field("chatSessionId", self.chat_session_id)
            .build()
    }
}
