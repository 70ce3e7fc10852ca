use ic_core::{
    CanonicalInboundMessage, ConnectorConfig, ContextExtras, ConversationPart, InboundTurn,
    RawConversationEvent, seconds_to_millis,
};

use crate::sanitize::strip_markup;

/// Why a webhook event produced no canonical message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotConversation,
    AssignedToHuman,
    HandoverNotForBot,
    SelfAssignment,
    HandoverDisabled,
    NoContent,
}

impl IgnoreReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConversation => "not_conversation",
            Self::AssignedToHuman => "assigned_to_human",
            Self::HandoverNotForBot => "handover_not_for_bot",
            Self::SelfAssignment => "self_assignment",
            Self::HandoverDisabled => "handover_disabled",
            Self::NoContent => "no_content",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Message(InboundTurn),
    Ignored(IgnoreReason),
}

impl Normalized {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Normalizes a conversation webhook item.
///
/// The thread parts are authoritative when present; the first `assignment` part turns the
/// event into a handover candidate, which is only accepted when a human handed the
/// conversation to the bot and a handover action is configured. The top-level assignee only
/// gates plain messages.
///
/// ```
/// use ic_core::{CanonicalInboundMessage, ConnectorConfig, RawConversationEvent};
/// use ic_translator::{Normalized, normalize};
///
/// let cfg = ConnectorConfig::new("bot", "token").unwrap();
/// let event: RawConversationEvent = serde_json::from_value(serde_json::json!({
///     "type": "conversation",
///     "id": "1",
///     "conversation_message": { "body": "<b>hi</b>", "created_at": 10 }
/// }))
/// .unwrap();
///
/// let Normalized::Message(turn) = normalize(event, &cfg) else { panic!("ignored") };
/// assert_eq!(
///     turn.message,
///     CanonicalInboundMessage::TextMessage {
///         conversation_id: "1".into(),
///         text: "hi".into(),
///         timestamp_ms: 10_000,
///     }
/// );
/// ```
pub fn normalize(event: RawConversationEvent, config: &ConnectorConfig) -> Normalized {
    if !event.is_conversation() {
        return Normalized::Ignored(IgnoreReason::NotConversation);
    }

    let bot_admin_id = config.bot_admin_id();
    let conversation_id = event.conversation_id.clone();
    let parts = event.parts();

    let message = if let Some(handover) = parts.iter().find(|p| p.is_assignment()) {
        let action_name = match accept_handover(handover, config) {
            Ok(action) => action.to_string(),
            Err(reason) => return Normalized::Ignored(reason),
        };
        CanonicalInboundMessage::HandoverSignal {
            conversation_id,
            action_name,
            timestamp_ms: event_millis(handover.created_at, &event),
        }
    } else if let Some(reason) = assignee_block(&event, bot_admin_id) {
        return Normalized::Ignored(reason);
    } else if parts.is_empty() {
        let Some(opening) = event.message.as_ref() else {
            return Normalized::Ignored(IgnoreReason::NoContent);
        };
        CanonicalInboundMessage::TextMessage {
            conversation_id,
            text: strip_markup(opening.body.as_deref().unwrap_or_default()).into_owned(),
            timestamp_ms: event_millis(opening.created_at, &event),
        }
    } else {
        CanonicalInboundMessage::TextMessage {
            conversation_id,
            text: join_parts(parts),
            timestamp_ms: event_millis(parts.last().and_then(|p| p.created_at), &event),
        }
    };

    Normalized::Message(InboundTurn {
        message,
        extras: ContextExtras { user: event.user },
    })
}

fn accept_handover<'a>(
    part: &ConversationPart,
    config: &'a ConnectorConfig,
) -> Result<&'a str, IgnoreReason> {
    let bot_admin_id = config.bot_admin_id();
    if part.assigned_to_id() != Some(bot_admin_id) {
        return Err(IgnoreReason::HandoverNotForBot);
    }
    if part.author_id() == Some(bot_admin_id) {
        return Err(IgnoreReason::SelfAssignment);
    }
    config
        .handover_action_name()
        .ok_or(IgnoreReason::HandoverDisabled)
}

// A present assignee without an id counts as someone other than the bot.
fn assignee_block(event: &RawConversationEvent, bot_admin_id: &str) -> Option<IgnoreReason> {
    match &event.assignee {
        Some(assignee) if !assignee.is(bot_admin_id) => Some(IgnoreReason::AssignedToHuman),
        _ => None,
    }
}

fn join_parts(parts: &[ConversationPart]) -> String {
    parts
        .iter()
        .map(|p| strip_markup(p.body.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn event_millis(primary: Option<i64>, event: &RawConversationEvent) -> i64 {
    seconds_to_millis(primary.or(event.created_at).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_core::{Actor, ConversationMessage, ConversationParts};
    use serde_json::json;

    const BOT: &str = "bot-admin";

    fn config() -> ConnectorConfig {
        ConnectorConfig::new(BOT, "token")
            .unwrap()
            .with_handover_action("/pass-thread")
    }

    fn event(body: &str) -> RawConversationEvent {
        RawConversationEvent {
            item_type: "conversation".into(),
            conversation_id: "conv-1".into(),
            created_at: Some(100),
            message: Some(ConversationMessage {
                body: Some(body.into()),
                created_at: Some(1_700_000_000),
                author: None,
            }),
            ..Default::default()
        }
    }

    fn part(body: &str, part_type: &str) -> ConversationPart {
        ConversationPart {
            body: Some(body.into()),
            part_type: part_type.into(),
            created_at: Some(200),
            ..Default::default()
        }
    }

    fn assignment(author: &str, assigned_to: &str) -> ConversationPart {
        ConversationPart {
            body: None,
            part_type: "assignment".into(),
            created_at: Some(300),
            author: Some(Actor::new(author)),
            assigned_to: Some(Actor::new(assigned_to)),
        }
    }

    fn with_parts(mut ev: RawConversationEvent, parts: Vec<ConversationPart>) -> RawConversationEvent {
        ev.parts = Some(ConversationParts { items: parts });
        ev
    }

    fn expect_message(outcome: Normalized) -> CanonicalInboundMessage {
        match outcome {
            Normalized::Message(turn) => turn.message,
            Normalized::Ignored(reason) => panic!("unexpectedly ignored: {reason:?}"),
        }
    }

    #[test]
    fn non_conversation_items_are_ignored() {
        for item_type in ["user", "contact", "", "Conversation"] {
            let mut ev = event("hi");
            ev.item_type = item_type.into();
            assert_eq!(
                normalize(ev, &config()),
                Normalized::Ignored(IgnoreReason::NotConversation)
            );
        }
    }

    #[test]
    fn plain_message_is_stripped_and_timestamped_in_millis() {
        let msg = expect_message(normalize(event("<b>hi</b>"), &config()));
        assert_eq!(
            msg,
            CanonicalInboundMessage::TextMessage {
                conversation_id: "conv-1".into(),
                text: "hi".into(),
                timestamp_ms: 1_700_000_000_000,
            }
        );
    }

    #[test]
    fn plain_message_falls_back_to_item_timestamp() {
        let mut ev = event("hi");
        if let Some(m) = ev.message.as_mut() {
            m.created_at = None;
        }
        assert_eq!(expect_message(normalize(ev, &config())).timestamp_ms(), 100_000);
    }

    #[test]
    fn missing_opening_message_is_ignored() {
        let mut ev = event("hi");
        ev.message = None;
        assert_eq!(
            normalize(ev, &config()),
            Normalized::Ignored(IgnoreReason::NoContent)
        );
    }

    #[test]
    fn comment_parts_are_joined_in_order() {
        let ev = with_parts(
            event("ignored opening"),
            vec![part("<i>a</i>", "comment"), part("b", "comment")],
        );
        let msg = expect_message(normalize(ev, &config()));
        assert_eq!(msg.text(), Some("a b"));
        assert_eq!(msg.timestamp_ms(), 200_000);
    }

    #[test]
    fn parts_without_body_join_as_empty() {
        let mut silent = part("", "note");
        silent.body = None;
        let ev = with_parts(event("x"), vec![part("a", "comment"), silent, part("c", "comment")]);
        assert_eq!(expect_message(normalize(ev, &config())).text(), Some("a  c"));
    }

    #[test]
    fn human_assignee_suppresses_messages() {
        let mut ev = event("hi");
        ev.assignee = Some(Actor::new("human-7"));
        assert_eq!(
            normalize(ev.clone(), &config()),
            Normalized::Ignored(IgnoreReason::AssignedToHuman)
        );

        let ev = with_parts(ev, vec![part("a", "comment")]);
        assert_eq!(
            normalize(ev, &config()),
            Normalized::Ignored(IgnoreReason::AssignedToHuman)
        );
    }

    #[test]
    fn assignee_without_id_counts_as_human() {
        let mut ev = event("hi");
        ev.assignee = Some(Actor::default());
        assert!(normalize(ev, &config()).is_ignored());
    }

    #[test]
    fn bot_assignee_lets_messages_through() {
        let mut ev = event("hi");
        ev.assignee = Some(Actor::new(BOT));
        assert_eq!(expect_message(normalize(ev, &config())).text(), Some("hi"));
    }

    #[test]
    fn valid_assignment_part_is_a_handover() {
        let mut ev = with_parts(
            event("x"),
            vec![part("a", "comment"), assignment("human-1", BOT)],
        );
        // The top-level assignee still names the human; handover detection looks at the part.
        ev.assignee = Some(Actor::new("human-1"));
        let msg = expect_message(normalize(ev, &config()));
        assert_eq!(
            msg,
            CanonicalInboundMessage::HandoverSignal {
                conversation_id: "conv-1".into(),
                action_name: "/pass-thread".into(),
                timestamp_ms: 300_000,
            }
        );
    }

    #[test]
    fn flipping_any_handover_condition_ignores_the_event() {
        let assigned_elsewhere = with_parts(event("x"), vec![assignment("human-1", "human-2")]);
        assert_eq!(
            normalize(assigned_elsewhere, &config()),
            Normalized::Ignored(IgnoreReason::HandoverNotForBot)
        );

        let self_assigned = with_parts(event("x"), vec![assignment(BOT, BOT)]);
        assert_eq!(
            normalize(self_assigned, &config()),
            Normalized::Ignored(IgnoreReason::SelfAssignment)
        );

        let no_action = with_parts(event("x"), vec![assignment("human-1", BOT)]);
        let cfg = ConnectorConfig::new(BOT, "token").unwrap();
        assert_eq!(
            normalize(no_action, &cfg),
            Normalized::Ignored(IgnoreReason::HandoverDisabled)
        );
    }

    #[test]
    fn only_first_assignment_part_is_considered() {
        let ev = with_parts(
            event("x"),
            vec![assignment("human-1", "human-2"), assignment("human-1", BOT)],
        );
        assert!(normalize(ev, &config()).is_ignored());
    }

    #[test]
    fn user_profile_is_forwarded_as_extras() {
        let mut ev = event("hi");
        ev.user = Some(json!({ "id": "u-1", "email": "jane@example.com" }));
        match normalize(ev, &config()) {
            Normalized::Message(turn) => {
                assert_eq!(turn.conversation_id(), "conv-1");
                assert_eq!(turn.extras.user.unwrap()["email"], "jane@example.com");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
