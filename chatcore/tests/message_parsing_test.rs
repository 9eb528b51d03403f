use chatcore::response::ChatEvent;
use chatcore::types::message::{ChatMessage, MessageType, SenderKind};
use chatcore::{Envelope, EnvelopeError};
use serde_json::{Value, json};

fn envelope(value: Value) -> Envelope {
    serde_json::from_value(value).expect("fixture should be a valid envelope")
}

fn message_fixture(from: Value) -> Value {
    json!({
        "target": "/chat",
        "chatType": "wow_message",
        "messageType": "guild_chat",
        "bodyFormat": "text",
        "body": "zug zug",
        "from": from,
    })
}

#[test]
fn test_character_sender_has_reference() {
    let msg = ChatMessage::try_from(&envelope(message_fixture(
        json!({"chatIdType": "character", "characterId": "ABC:Thrall:5"}),
    )))
    .unwrap();

    assert_eq!(msg.sender_kind(), SenderKind::Character);
    let id = msg.character_id().expect("character sender should carry an id");
    assert!(!id.as_str().is_empty());
    assert_eq!(msg.character_name(), Some("Thrall"));
    assert_eq!(msg.realm_id(), Some("5"));
}

#[test]
fn test_guild_senders_have_no_reference() {
    for kind in ["guild", "guild_member"] {
        let msg =
            ChatMessage::try_from(&envelope(message_fixture(json!({"chatIdType": kind}))))
                .unwrap();
        assert!(msg.character_id().is_none(), "{kind} sender had a character id");
        assert_eq!(msg.character_name(), None);
    }
}

#[test]
fn test_missing_required_fields_are_malformed() {
    let base = message_fixture(json!({"chatIdType": "guild"}));

    for field in ["messageType", "body", "from"] {
        let mut value = base.clone();
        value.as_object_mut().unwrap().remove(field);
        let err = ChatMessage::try_from(&envelope(value)).unwrap_err();
        assert!(
            matches!(err, EnvelopeError::MissingField(f) if f == field),
            "removing {field} gave {err:?}"
        );
    }

    let no_id_type = message_fixture(json!({"characterId": "ABC:Thrall:5"}));
    assert_eq!(
        ChatMessage::try_from(&envelope(no_id_type)),
        Err(EnvelopeError::MissingField("chatIdType"))
    );
}

#[test]
fn test_future_message_type_is_preserved() {
    let mut value = message_fixture(json!({"chatIdType": "guild"}));
    value["messageType"] = json!("some_future_type");

    let msg = ChatMessage::try_from(&envelope(value)).unwrap();
    assert_eq!(
        msg.message_type,
        MessageType::Other("some_future_type".to_string())
    );
    assert_eq!(msg.message_type.as_str(), "some_future_type");
}

#[test]
fn test_chat_event_propagates_parse_errors() {
    let mut value = message_fixture(json!({"chatIdType": "guild"}));
    value["body"] = json!(42);

    assert_eq!(
        ChatEvent::try_from(&envelope(value)),
        Err(EnvelopeError::WrongType {
            field: "body",
            expected: "a string"
        })
    );
}
