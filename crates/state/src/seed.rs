//! Demo conversations shown when the app starts without any other data source.

use crate::message::{Conversation, ConversationId, Message, MessageId};
use crate::store::ChatStore;

pub fn demo_conversations() -> Vec<Conversation> {
    vec![
        Conversation::new("sarah", "Sarah Chen")
            .with_avatar("avatars/sarah.png")
            .with_preview("Did you see the new mockups?", "2m"),
        Conversation::new("design", "Design Team")
            .with_avatar("avatars/design.png")
            .with_preview("Marco: pushed the icon set", "1h"),
        Conversation::new("leo", "Leo Martins")
            .with_avatar("avatars/leo.png")
            .with_preview("Sounds good, see you then", "Yesterday"),
        Conversation::new("mom", "Mom").with_preview("Call me when you land", "Mon"),
    ]
}

pub fn demo_messages() -> Vec<(ConversationId, Vec<Message>)> {
    vec![
        (
            ConversationId::new("sarah"),
            vec![
                Message::received(
                    MessageId::new(1),
                    "Sarah Chen",
                    "Morning! How's the sprint going?",
                )
                .with_avatar("avatars/sarah.png")
                .with_time("9:12 AM"),
                Message::sent(MessageId::new(2), "Busy but on track. You?", "9:14 AM"),
                Message::received(MessageId::new(3), "Sarah Chen", "Did you see the new mockups?")
                    .with_avatar("avatars/sarah.png")
                    .with_time("9:15 AM")
                    .with_images(["mockups/home.png", "mockups/settings.png"]),
                Message::typing(MessageId::new(4), "Sarah Chen").with_avatar("avatars/sarah.png"),
            ],
        ),
        (
            ConversationId::new("design"),
            vec![
                Message::received(MessageId::new(5), "Marco", "pushed the icon set")
                    .with_time("8:02 AM"),
                Message::received(MessageId::new(6), "Ines", "Looks great, merging now")
                    .with_time("8:10 AM"),
            ],
        ),
        (
            ConversationId::new("leo"),
            vec![
                Message::sent(MessageId::new(7), "Dinner at 8?", "Yesterday"),
                Message::received(MessageId::new(8), "Leo Martins", "Sounds good, see you then")
                    .with_avatar("avatars/leo.png")
                    .with_time("Yesterday"),
            ],
        ),
    ]
}

/// Loads the demo data into `store` and selects the first conversation.
pub fn install_demo(store: &mut ChatStore) {
    let conversations = demo_conversations();
    let first = conversations.first().map(|conversation| conversation.id.clone());

    store.set_conversations(conversations);
    for (id, messages) in demo_messages() {
        store.set_messages_for(id, messages);
    }

    if let Some(first) = first {
        store.select_conversation(&first);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn demo_message_threads_reference_known_conversations() {
        let ids = demo_conversations()
            .into_iter()
            .map(|conversation| conversation.id)
            .collect::<HashSet<_>>();

        for (id, _) in demo_messages() {
            assert!(ids.contains(&id), "unknown conversation {id}");
        }
    }

    #[test]
    fn demo_message_ids_are_unique() {
        let mut seen = HashSet::new();
        for (_, messages) in demo_messages() {
            for message in messages {
                assert!(seen.insert(message.id), "duplicate id {}", message.id);
            }
        }
    }

    #[test]
    fn install_selects_first_conversation() {
        let mut store = ChatStore::default();
        install_demo(&mut store);

        assert_eq!(store.selected_id(), Some(&ConversationId::new("sarah")));
        assert_eq!(store.selected_messages().len(), 4);
        assert_eq!(
            store
                .conversations()
                .iter()
                .filter(|conversation| conversation.active)
                .count(),
            1
        );
    }
}
