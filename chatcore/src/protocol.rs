use crate::envelope::Envelope;

/// Route strings carried in the `target` field.
pub mod routes {
    pub const CHAT: &str = "/chat";
    pub const CHAT_LOGIN: &str = "/chat-login";
    pub const CHAT_LOGOUT: &str = "/chat-logout";
    pub const CHAT_DISCONNECT: &str = "/chat-disconnect";
    pub const CHAT_GUILD: &str = "/chat-guild";
    pub const CHAT_WHISPER: &str = "/chat-whisper";
    /// The service keeps chat presence alive off the auction-mail poll.
    pub const KEEP_ALIVE: &str = "/ah-mail";
}

/// Values of the `chatType` discriminator on `/chat` responses.
pub mod chat_types {
    pub const MESSAGE_ACK: &str = "message_ack";
    pub const WOW_MESSAGE: &str = "wow_message";
    pub const WOW_PRESENCE: &str = "wow_presence";
}

/// A typed request that knows its route and how to lay itself out as an envelope.
pub trait ProtocolEnvelope: Sized {
    /// The route this request is sent on (e.g. "/chat-login").
    fn target(&self) -> &'static str;

    /// Convert the struct into a wire `Envelope`.
    fn into_envelope(self) -> Envelope;
}
