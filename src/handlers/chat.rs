use super::traits::ResponseHandler;
use crate::session::ChatSession;
use crate::types::events::Event;
use chatcore::Envelope;
use chatcore::protocol::routes;
use chatcore::response::ChatEvent;
use log::{debug, warn};

/// Handler for `/chat` responses: acks, messages and presence changes.
///
/// Unknown `chatType` and `messageType` values are logged and dropped, as are
/// payloads that fail to parse. None of them affect the session.
pub struct ChatHandler;

impl ResponseHandler for ChatHandler {
    fn target(&self) -> &'static str {
        routes::CHAT
    }

    fn handle(&self, session: &ChatSession, envelope: &Envelope) -> bool {
        let chat_event = match ChatEvent::try_from(envelope) {
            Ok(event) => event,
            Err(e) => {
                warn!(target: "Chat/Router", "Dropping malformed chat payload: {e}");
                return true;
            }
        };

        match chat_event {
            ChatEvent::MessageAck => {
                debug!(target: "Chat/Router", "Received message ack");
            }
            ChatEvent::Message(message) => {
                let message_type = message.message_type.clone();
                match Event::from_message(message) {
                    Some(event) => session.dispatch_event(&event),
                    None => debug!(target: "Chat/Router", "Unhandled message type: {message_type}"),
                }
            }
            ChatEvent::Presence(presence) => {
                session.dispatch_event(&Event::PresenceChanged(presence));
            }
            ChatEvent::Unrecognized(chat_type) => {
                debug!(target: "Chat/Router", "Unhandled chat type: {chat_type}");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;
    use crate::replay::RecordingConnection;
    use chatcore::request::ChatIdentity;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn session_with_log() -> (Arc<ChatSession>, Arc<Mutex<Vec<Event>>>) {
        let session = ChatSession::new(
            Arc::new(RecordingConnection::new()),
            ChatIdentity::new("Thrall", "Draenor"),
            ChatConfig::default(),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        session.add_fn_handler(move |_, event: &Event| sink.lock().unwrap().push(event.clone()));
        (session, seen)
    }

    fn chat_envelope(value: serde_json::Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_officer_chat_reaches_officer_category() {
        let (session, seen) = session_with_log();
        let env = chat_envelope(json!({
            "target": "/chat",
            "chatType": "wow_message",
            "messageType": "officer_chat",
            "body": "loot council at 9",
            "from": {"chatIdType": "character", "characterId": "ABC:Saurfang:5"}
        }));

        assert!(ChatHandler.handle(&session, &env));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(&seen[0], Event::OfficerChat(m) if m.body == "loot council at 9"));
    }

    #[test]
    fn test_afk_and_unknown_types_are_dropped() {
        let (session, seen) = session_with_log();
        for message_type in ["afk", "raid_warning"] {
            let env = chat_envelope(json!({
                "target": "/chat",
                "chatType": "wow_message",
                "messageType": message_type,
                "body": "brb",
                "from": {"chatIdType": "character", "characterId": "ABC:Thrall:5"}
            }));
            assert!(ChatHandler.handle(&session, &env));
        }
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_message_does_not_panic_or_emit() {
        let (session, seen) = session_with_log();
        let env = chat_envelope(json!({
            "target": "/chat",
            "chatType": "wow_message",
            "body": "missing type",
            "from": {"chatIdType": "guild"}
        }));

        assert!(ChatHandler.handle(&session, &env));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_presence_reaches_presence_handler() {
        let (session, seen) = session_with_log();
        let env = chat_envelope(json!({
            "target": "/chat",
            "chatType": "wow_presence",
            "presenceType": "offline",
            "from": {"chatIdType": "guild_member"}
        }));

        assert!(ChatHandler.handle(&session, &env));
        let seen = seen.lock().unwrap();
        assert!(
            matches!(&seen[..], [Event::PresenceChanged(p)] if p.presence_type.as_deref() == Some("offline"))
        );
    }
}
