use crate::envelope::{Envelope, optional_str};
use crate::error::EnvelopeError;
use crate::types::message::{CharacterId, ChatSender};
use serde::Serialize;

/// A presence change from a `wow_presence` payload.
///
/// Only the sender and the presence kind are typed; the source envelope is
/// kept so callers can read whatever else the service attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presence {
    pub sender: ChatSender,
    pub presence_type: Option<String>,
    pub envelope: Envelope,
}

impl Presence {
    pub fn character_id(&self) -> Option<&CharacterId> {
        self.sender.character_id.as_ref()
    }
}

impl TryFrom<&Envelope> for Presence {
    type Error = EnvelopeError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        Ok(Self {
            sender: ChatSender::from_envelope(envelope)?,
            presence_type: optional_str(&envelope.fields, "presenceType")?.map(str::to_string),
            envelope: envelope.clone(),
        })
    }
}
