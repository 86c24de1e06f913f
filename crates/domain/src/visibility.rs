//! 消息可见性规则
//!
//! 公开消息、发给所有人的消息、发给读者或由读者发出的消息可见，
//! 其余私聊对读者隐藏。纯函数，不访问存储。

use crate::message::{ChatMessage, MessageKind};

pub fn is_visible_to(message: &ChatMessage, reader: &str) -> bool {
    message.kind == MessageKind::Public
        || message.to.is_everyone()
        || message.to.as_str() == reader
        || message.from.as_str() == reader
}

/// 过滤出读者可见的消息；`limit` 只保留最后 N 条，顺序不变。
pub fn visible_messages<I>(messages: I, reader: &str, limit: Option<usize>) -> Vec<ChatMessage>
where
    I: IntoIterator<Item = ChatMessage>,
{
    let mut visible: Vec<ChatMessage> = messages
        .into_iter()
        .filter(|message| is_visible_to(message, reader))
        .collect();

    if let Some(limit) = limit.filter(|limit| *limit > 0) {
        if visible.len() > limit {
            visible.drain(..visible.len() - limit);
        }
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{ParticipantName, Recipient};

    fn message(from: &str, to: &str, kind: MessageKind, text: &str) -> ChatMessage {
        ChatMessage {
            from: ParticipantName::parse(from).unwrap(),
            to: Recipient::parse(to).unwrap(),
            text: text.to_owned(),
            kind,
            time: "12:00:00".to_owned(),
        }
    }

    #[test]
    fn private_message_is_visible_to_both_ends_only() {
        let whisper = message("Bob", "Alice", MessageKind::Private, "psst");

        assert!(is_visible_to(&whisper, "Alice"));
        assert!(is_visible_to(&whisper, "Bob"));
        assert!(!is_visible_to(&whisper, "Carol"));
        assert!(!is_visible_to(&whisper, ""));
    }

    #[test]
    fn public_message_is_visible_to_everyone() {
        let hello = message("Bob", "everyone", MessageKind::Public, "hi");

        for reader in ["Alice", "Bob", "Carol", ""] {
            assert!(is_visible_to(&hello, reader));
        }
    }

    #[test]
    fn public_message_to_a_named_participant_is_still_broadcast() {
        let shout = message("Bob", "Alice", MessageKind::Public, "hey Alice");
        assert!(is_visible_to(&shout, "Carol"));
    }

    #[test]
    fn private_message_to_everyone_is_visible() {
        let odd = message("Bob", "everyone", MessageKind::Private, "all of you");
        assert!(is_visible_to(&odd, "Carol"));
    }

    #[test]
    fn names_are_matched_case_sensitively() {
        let whisper = message("Bob", "Alice", MessageKind::Private, "psst");
        assert!(!is_visible_to(&whisper, "alice"));
    }

    #[test]
    fn limit_keeps_the_tail_in_order() {
        let log: Vec<_> = (1..=5)
            .map(|n| message("Bob", "everyone", MessageKind::Public, &n.to_string()))
            .collect();

        let tail = visible_messages(log, "Alice", Some(2));

        let texts: Vec<_> = tail.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["4", "5"]);
    }

    #[test]
    fn limit_applies_after_filtering() {
        let log = vec![
            message("Bob", "everyone", MessageKind::Public, "a"),
            message("Bob", "Alice", MessageKind::Private, "b"),
            message("Dan", "Carol", MessageKind::Private, "hidden"),
            message("Bob", "everyone", MessageKind::Public, "c"),
        ];

        let tail = visible_messages(log, "Alice", Some(2));

        let texts: Vec<_> = tail.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn missing_or_zero_limit_returns_everything() {
        let log: Vec<_> = (1..=3)
            .map(|n| message("Bob", "everyone", MessageKind::Public, &n.to_string()))
            .collect();

        assert_eq!(visible_messages(log.clone(), "Alice", None).len(), 3);
        assert_eq!(visible_messages(log.clone(), "Alice", Some(0)).len(), 3);
        assert_eq!(visible_messages(log, "Alice", Some(10)).len(), 3);
    }
}
