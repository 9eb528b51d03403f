use crate::types::message::{ChatMessage, MessageType};
use crate::types::presence::Presence;
use serde::Serialize;

/// Everything a chat session reports to the host application.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    Motd(ChatMessage),
    GuildChat(ChatMessage),
    OfficerChat(ChatMessage),
    Whisper(ChatMessage),
    PresenceChanged(Presence),

    LoggedIn,
    LoggedOut,
    /// Login was refused; carries the reason the service gave.
    LoginFailed(String),
    /// The underlying connection went away.
    SessionClosed(String),
}

impl Event {
    /// Maps a parsed message onto its callback category. Returns `None` for
    /// message types nobody subscribes to (afk, dnd, unknown).
    pub fn from_message(message: ChatMessage) -> Option<Self> {
        match message.message_type {
            MessageType::Motd => Some(Self::Motd(message)),
            MessageType::GuildChat => Some(Self::GuildChat(message)),
            MessageType::Whisper => Some(Self::Whisper(message)),
            MessageType::OfficerChat => Some(Self::OfficerChat(message)),
            MessageType::Afk | MessageType::Dnd | MessageType::Other(_) => None,
        }
    }
}
