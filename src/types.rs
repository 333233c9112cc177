//! Minimal serde view of the Bot API wire schema.
//!
//! Only the fields the dispatcher interprets are typed; every other payload
//! kind is carried in the flattened `extra` maps untouched, which is also
//! what the generic presence check in [`Message::has_field`] works against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One incoming event. At most one meaningful payload kind is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    /// Strictly increasing per polling sequence, not necessarily contiguous.
    pub update_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
    /// Payload kinds this crate does not interpret (edited_message,
    /// channel_post, poll, ...), passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub date: i64,
    pub chat: Chat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// True iff the named optional field carries a non-empty value.
    ///
    /// Evaluated against the structured representation of the message, so
    /// field kinds introduced by the remote service ("document", "sticker",
    /// "poll", ...) need no code changes here.
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "text" => self.text.as_deref().is_some_and(|t| !t.is_empty()),
            "from" => self.from.is_some(),
            _ => self.extra.get(name).is_some_and(field_present),
        }
    }
}

fn field_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Closed set of chat kinds known to the wire protocol.
///
/// Kinds introduced by newer protocol revisions decode to `Unknown` instead
/// of failing the whole batch; `Unknown` never satisfies a chat filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Message with the callback button that originated the query; absent
    /// when that message is too old or was sent inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default)]
    pub chat_instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_text_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 123456789,
            "message": {
                "message_id": 42,
                "date": 1707900000,
                "chat": {"id": 100, "type": "private", "first_name": "John"},
                "from": {"id": 100, "is_bot": false, "first_name": "John"},
                "text": "Hello bot!"
            }
        }))
        .unwrap();

        assert_eq!(update.update_id, 123456789);
        let message = update.message.unwrap();
        assert_eq!(message.text.as_deref(), Some("Hello bot!"));
        assert_eq!(message.chat.kind, ChatKind::Private);
        assert_eq!(message.from.unwrap().first_name, "John");
    }

    #[test]
    fn decodes_an_update_without_known_payload() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 999,
            "edited_message": {"message_id": 7}
        }))
        .unwrap();

        assert!(update.message.is_none());
        assert!(update.callback_query.is_none());
        assert!(update.extra.contains_key("edited_message"));
    }

    #[test]
    fn decodes_a_callback_query() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 5,
            "callback_query": {
                "id": "424242",
                "from": {"id": 9, "is_bot": false, "first_name": "Ann"},
                "chat_instance": "-12345",
                "data": "buy_42",
                "message": {
                    "message_id": 1,
                    "date": 0,
                    "chat": {"id": 77, "type": "group", "title": "lobby"}
                }
            }
        }))
        .unwrap();

        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("buy_42"));
        assert_eq!(query.message.unwrap().chat.kind, ChatKind::Group);
    }

    #[test]
    fn unknown_chat_kind_does_not_fail_decoding() {
        let chat: Chat =
            serde_json::from_value(json!({"id": 1, "type": "holodeck"})).unwrap();
        assert_eq!(chat.kind, ChatKind::Unknown);
    }

    #[test]
    fn has_field_sees_untyped_payload_kinds() {
        let message: Message = serde_json::from_value(json!({
            "message_id": 1,
            "date": 0,
            "chat": {"id": 1, "type": "private"},
            "document": {"file_id": "abc"},
            "caption": "a file"
        }))
        .unwrap();

        assert!(message.has_field("document"));
        assert!(message.has_field("caption"));
        assert!(!message.has_field("sticker"));
        assert!(!message.has_field("text"));
    }

    #[test]
    fn has_field_treats_null_and_empty_as_absent() {
        let message: Message = serde_json::from_value(json!({
            "message_id": 1,
            "date": 0,
            "chat": {"id": 1, "type": "private"},
            "caption": "",
            "photo": [],
            "via_bot": null
        }))
        .unwrap();

        assert!(!message.has_field("caption"));
        assert!(!message.has_field("photo"));
        assert!(!message.has_field("via_bot"));
    }

    #[test]
    fn inline_keyboard_serializes_without_empty_options() {
        let markup = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: "Hi".to_owned(),
                callback_data: Some("test".to_owned()),
                url: None,
            }]],
        };
        let encoded = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            encoded,
            json!({"inline_keyboard": [[{"text": "Hi", "callback_data": "test"}]]})
        );
    }
}
