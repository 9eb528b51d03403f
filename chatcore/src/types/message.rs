use crate::envelope::{Envelope, optional_str, required_str};
use crate::error::EnvelopeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The `messageType` of an inbound chat message.
///
/// New types show up on the service from time to time, so anything not
/// listed here is kept verbatim in `Other` instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    Afk,
    Dnd,
    GuildChat,
    /// Guild message of the day.
    Motd,
    OfficerChat,
    Whisper,
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Afk => "afk",
            Self::Dnd => "dnd",
            Self::GuildChat => "guild_chat",
            Self::Motd => "motd",
            Self::OfficerChat => "officer_chat",
            Self::Whisper => "whisper",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for MessageType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "afk" => Self::Afk,
            "dnd" => Self::Dnd,
            "guild_chat" => Self::GuildChat,
            "motd" => Self::Motd,
            "officer_chat" => Self::OfficerChat,
            "whisper" => Self::Whisper,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for MessageType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<MessageType> for String {
    fn from(t: MessageType) -> Self {
        match t {
            MessageType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the `from` block of a payload identifies its sender (`from.chatIdType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    Character,
    Guild,
    GuildMember,
}

impl SenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Guild => "guild",
            Self::GuildMember => "guild_member",
        }
    }
}

impl TryFrom<&str> for SenderKind {
    type Error = EnvelopeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "character" => Ok(Self::Character),
            "guild" => Ok(Self::Guild),
            "guild_member" => Ok(Self::GuildMember),
            other => Err(EnvelopeError::UnknownSenderKind(other.to_string())),
        }
    }
}

/// Opaque character reference of the form `<prefix>:<characterName>:<realmId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text between the first and the last colon.
    pub fn character_name(&self) -> Option<&str> {
        let first = self.0.find(':')?;
        let last = self.0.rfind(':')?;
        if first == last {
            return None;
        }
        Some(&self.0[first + 1..last])
    }

    /// Text after the last colon.
    pub fn realm_id(&self) -> Option<&str> {
        let last = self.0.rfind(':')?;
        Some(&self.0[last + 1..])
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The decoded `from` block shared by message and presence payloads.
///
/// `character_id` is set exactly when `kind` is [`SenderKind::Character`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSender {
    pub kind: SenderKind,
    pub character_id: Option<CharacterId>,
}

impl ChatSender {
    pub(crate) fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        Self::from_map(envelope.require_object("from")?)
    }

    fn from_map(from: &Map<String, Value>) -> Result<Self, EnvelopeError> {
        let kind = SenderKind::try_from(required_str(from, "chatIdType")?)?;
        // Guild and guild member senders carry other identifiers we don't model.
        let character_id = match kind {
            SenderKind::Character => Some(CharacterId::new(required_str(from, "characterId")?)),
            SenderKind::Guild | SenderKind::GuildMember => None,
        };
        Ok(Self { kind, character_id })
    }
}

/// A chat message decoded from a `wow_message` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub message_type: MessageType,
    pub body: String,
    /// Carried through untouched; nothing branches on it yet.
    pub body_format: Option<String>,
    pub sender: ChatSender,
}

impl ChatMessage {
    pub fn sender_kind(&self) -> SenderKind {
        self.sender.kind
    }

    pub fn character_id(&self) -> Option<&CharacterId> {
        self.sender.character_id.as_ref()
    }

    pub fn character_name(&self) -> Option<&str> {
        self.character_id().and_then(CharacterId::character_name)
    }

    pub fn realm_id(&self) -> Option<&str> {
        self.character_id().and_then(CharacterId::realm_id)
    }
}

impl TryFrom<&Envelope> for ChatMessage {
    type Error = EnvelopeError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        let sender = ChatSender::from_envelope(envelope)?;
        let message_type = MessageType::from(envelope.require_str("messageType")?);
        let body_format = optional_str(&envelope.fields, "bodyFormat")?.map(str::to_string);
        let body = envelope.require_str("body")?.to_string();

        Ok(Self {
            message_type,
            body,
            body_format,
            sender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).expect("test envelope should deserialize")
    }

    #[test]
    fn test_character_id_projections() {
        let id = CharacterId::new("ABC:Thrall:5");
        assert_eq!(id.character_name(), Some("Thrall"));
        assert_eq!(id.realm_id(), Some("5"));
    }

    #[test]
    fn test_character_id_keeps_inner_colons_in_name() {
        let id = CharacterId::new("ABC:Weird:Name:12");
        assert_eq!(id.character_name(), Some("Weird:Name"));
        assert_eq!(id.realm_id(), Some("12"));
    }

    #[test]
    fn test_character_id_without_enough_delimiters() {
        assert_eq!(CharacterId::new("plain").character_name(), None);
        assert_eq!(CharacterId::new("plain").realm_id(), None);

        let one = CharacterId::new("Thrall:5");
        assert_eq!(one.character_name(), None);
        assert_eq!(one.realm_id(), Some("5"));
    }

    #[test]
    fn test_message_type_round_trips_known_and_unknown() {
        assert_eq!(MessageType::from("motd"), MessageType::Motd);
        assert_eq!(MessageType::Motd.as_str(), "motd");

        let future = MessageType::from("raid_warning");
        assert_eq!(future, MessageType::Other("raid_warning".into()));
        assert_eq!(String::from(future), "raid_warning");
    }

    #[test]
    fn test_parse_character_message() {
        let env = envelope(json!({
            "target": "/chat",
            "chatType": "wow_message",
            "messageType": "guild_chat",
            "bodyFormat": "text",
            "body": "lok'tar",
            "from": { "chatIdType": "character", "characterId": "ABC:Thrall:5" }
        }));

        let msg = ChatMessage::try_from(&env).unwrap();
        assert_eq!(msg.message_type, MessageType::GuildChat);
        assert_eq!(msg.body, "lok'tar");
        assert_eq!(msg.body_format.as_deref(), Some("text"));
        assert_eq!(msg.sender_kind(), SenderKind::Character);
        assert_eq!(msg.character_name(), Some("Thrall"));
        assert_eq!(msg.realm_id(), Some("5"));
    }

    #[test]
    fn test_parse_guild_sender_ignores_character_id() {
        let env = envelope(json!({
            "target": "/chat",
            "messageType": "motd",
            "body": "welcome",
            "from": { "chatIdType": "guild", "characterId": "ABC:Ignored:1" }
        }));

        let msg = ChatMessage::try_from(&env).unwrap();
        assert_eq!(msg.sender_kind(), SenderKind::Guild);
        assert!(msg.character_id().is_none());
        assert_eq!(msg.body_format, None);
    }

    #[test]
    fn test_parse_character_sender_requires_character_id() {
        let env = envelope(json!({
            "target": "/chat",
            "messageType": "whisper",
            "body": "psst",
            "from": { "chatIdType": "character" }
        }));

        assert_eq!(
            ChatMessage::try_from(&env),
            Err(EnvelopeError::MissingField("characterId"))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_chat_id_type() {
        let env = envelope(json!({
            "target": "/chat",
            "messageType": "whisper",
            "body": "psst",
            "from": { "chatIdType": "battletag" }
        }));

        assert_eq!(
            ChatMessage::try_from(&env),
            Err(EnvelopeError::UnknownSenderKind("battletag".into()))
        );
    }

    #[test]
    fn test_parse_rejects_mis_shaped_body_format() {
        let env = envelope(json!({
            "target": "/chat",
            "messageType": "whisper",
            "body": "psst",
            "bodyFormat": 3,
            "from": { "chatIdType": "guild" }
        }));

        assert!(matches!(
            ChatMessage::try_from(&env),
            Err(EnvelopeError::WrongType {
                field: "bodyFormat",
                ..
            })
        ));
    }
}
