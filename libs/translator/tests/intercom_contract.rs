use ic_core::{
    AttachmentKind, CanonicalInboundMessage, ConnectorConfig, OutboundEnvelope,
    WebhookNotification,
};
use ic_translator::{IgnoreReason, Normalized, normalize, translate};
use serde_json::{Value, json};

const BOT: &str = "814860";

fn config() -> ConnectorConfig {
    ConnectorConfig::new(BOT, "token")
        .unwrap()
        .with_handover_action("/handover")
}

fn normalize_webhook(raw: Value) -> Normalized {
    let notification: WebhookNotification = serde_json::from_value(raw).expect("webhook json");
    normalize(notification.into_item().expect("item"), &config())
}

fn webhook(item: Value) -> Value {
    json!({
        "type": "notification_event",
        "topic": "conversation.user.replied",
        "data": { "item": item }
    })
}

#[test]
fn user_reply_thread_becomes_single_text_message() {
    let raw = webhook(json!({
        "type": "conversation",
        "id": 5001,
        "created_at": 1_600_000_000,
        "assignee": { "type": "admin", "id": 814860 },
        "conversation_message": { "body": "<p>opening</p>", "created_at": 1_600_000_000 },
        "conversation_parts": {
            "type": "conversation_part.list",
            "conversation_parts": [
                { "part_type": "comment", "body": "<p>first</p>", "created_at": 1_600_000_010,
                  "author": { "type": "user", "id": "u1" } },
                { "part_type": "comment", "body": "<p>second\nline</p>", "created_at": 1_600_000_020,
                  "author": { "type": "user", "id": "u1" } }
            ]
        },
        "user": { "type": "user", "id": "u1" }
    }));

    match normalize_webhook(raw) {
        Normalized::Message(turn) => {
            assert_eq!(
                turn.message,
                CanonicalInboundMessage::TextMessage {
                    conversation_id: "5001".into(),
                    text: "first second\nline".into(),
                    timestamp_ms: 1_600_000_020_000,
                }
            );
            assert_eq!(turn.extras.user.unwrap()["id"], "u1");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn human_handing_conversation_to_bot_triggers_handover() {
    let raw = webhook(json!({
        "type": "conversation",
        "id": "5002",
        "assignee": { "type": "admin", "id": 814860 },
        "conversation_parts": {
            "conversation_parts": [
                { "part_type": "assignment", "body": null, "created_at": 1_600_000_030,
                  "author": { "type": "admin", "id": "42" },
                  "assigned_to": { "type": "admin", "id": 814860 } }
            ]
        }
    }));

    match normalize_webhook(raw) {
        Normalized::Message(turn) => assert_eq!(
            turn.message,
            CanonicalInboundMessage::HandoverSignal {
                conversation_id: "5002".into(),
                action_name: "/handover".into(),
                timestamp_ms: 1_600_000_030_000,
            }
        ),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn conversation_owned_by_human_is_ignored() {
    let raw = webhook(json!({
        "type": "conversation",
        "id": "5003",
        "assignee": { "type": "admin", "id": "42" },
        "conversation_message": { "body": "help" },
        "conversation_parts": { "conversation_parts": [] }
    }));
    assert_eq!(
        normalize_webhook(raw),
        Normalized::Ignored(IgnoreReason::AssignedToHuman)
    );
}

#[test]
fn non_conversation_item_is_ignored() {
    let raw = webhook(json!({ "type": "user", "id": "u1" }));
    assert_eq!(
        normalize_webhook(raw),
        Normalized::Ignored(IgnoreReason::NotConversation)
    );
}

#[test]
fn translation_precedence_matches_reply_contract() {
    let cases = [
        (
            OutboundEnvelope::handover("7"),
            Some(json!({ "type": "admin", "admin_id": BOT, "message_type": "assignment", "assignee_id": "7" })),
        ),
        (
            OutboundEnvelope::attachment(AttachmentKind::Video, "https://v"),
            Some(json!({ "type": "admin", "admin_id": BOT, "message_type": "comment", "attachment_urls": ["https://v"] })),
        ),
        (OutboundEnvelope::attachment(AttachmentKind::Template, "https://t"), None),
        (
            OutboundEnvelope::text("Hello World!"),
            Some(json!({ "type": "admin", "admin_id": BOT, "message_type": "comment", "body": "Hello World!" })),
        ),
        (OutboundEnvelope::text(""), None),
    ];

    for (envelope, expected) in cases {
        let actual = translate(&envelope, BOT).map(|reply| serde_json::to_value(reply).unwrap());
        assert_eq!(actual, expected, "envelope {envelope:?}");
    }
}
