use std::collections::HashMap;

use crate::config::ChatConfig;
use crate::hooks::{ClockIds, FixedLabel, IdSource, TimeLabeler};
use crate::message::{Conversation, ConversationId, Message, MessageId, PreviewPolicy};
use crate::subscription::{SubscriberSet, Subscription};
use crate::viewport::Breakpoint;

/// Notification delivered to store subscribers after an effective mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ConversationsChanged,
    /// The selected conversation changed; `None` once the selection is cleared.
    SelectionChanged(Option<ConversationId>),
    MessagesChanged(ConversationId),
    DraftChanged,
    SidebarChanged { open: bool },
    ViewportChanged { mobile: bool },
}

/// Single owner of all chat UI state for one application session.
pub struct ChatStore {
    conversations: Vec<Conversation>,
    selected_id: Option<ConversationId>,
    messages: HashMap<ConversationId, Vec<Message>>,
    draft: String,
    sidebar_open: bool,
    mobile: bool,
    breakpoint: Breakpoint,
    preview_policy: PreviewPolicy,
    ids: Box<dyn IdSource>,
    time_labeler: Box<dyn TimeLabeler>,
    subscribers: SubscriberSet<StoreEvent>,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

impl ChatStore {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            conversations: Vec::new(),
            selected_id: None,
            messages: HashMap::new(),
            draft: String::new(),
            sidebar_open: config.start_sidebar_open,
            mobile: false,
            breakpoint: Breakpoint(config.mobile_breakpoint),
            preview_policy: config.preview_policy(),
            ids: Box::new(ClockIds::new()),
            time_labeler: Box::new(FixedLabel(config.sent_time_label.clone())),
            subscribers: SubscriberSet::new(),
        }
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_time_labeler(mut self, labeler: impl TimeLabeler + 'static) -> Self {
        self.time_labeler = Box::new(labeler);
        self
    }

    /// Registers `callback` for every subsequent [`StoreEvent`].
    ///
    /// Callbacks run while the store is mid-mutation and must not reach back into it;
    /// read state once the mutating call has returned.
    pub fn subscribe(&self, callback: impl FnMut(&StoreEvent) + 'static) -> Subscription {
        self.subscribers.insert(callback)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| &conversation.id == id)
    }

    pub fn selected_id(&self) -> Option<&ConversationId> {
        self.selected_id.as_ref()
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.selected_id.as_ref().and_then(|id| self.conversation(id))
    }

    pub fn messages_for(&self, id: &ConversationId) -> &[Message] {
        self.messages.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn selected_messages(&self) -> &[Message] {
        self.selected_id
            .as_ref()
            .map(|id| self.messages_for(id))
            .unwrap_or_default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Replaces the conversation list as given.
    ///
    /// A selection that no longer names a conversation is cleared.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;

        let selection_dropped = self
            .selected_id
            .as_ref()
            .is_some_and(|selected| self.conversation(selected).is_none());
        if selection_dropped {
            tracing::debug!("selected conversation vanished from replacement list");
            self.selected_id = None;
        }

        self.emit(StoreEvent::ConversationsChanged);
        if selection_dropped {
            self.emit(StoreEvent::SelectionChanged(None));
        }
    }

    /// Selects `id`, marking it as the only active conversation.
    ///
    /// Re-selecting the current conversation and unknown ids are ignored. On mobile
    /// the sidebar closes so the thread becomes visible.
    pub fn select_conversation(&mut self, id: &ConversationId) -> bool {
        if self.selected_id.as_ref() == Some(id) {
            return false;
        }

        if self.conversation(id).is_none() {
            tracing::debug!("ignoring selection of unknown conversation {id}");
            return false;
        }

        self.selected_id = Some(id.clone());
        for conversation in &mut self.conversations {
            conversation.active = &conversation.id == id;
        }

        self.emit(StoreEvent::SelectionChanged(Some(id.clone())));
        self.emit(StoreEvent::ConversationsChanged);

        if self.mobile {
            self.close_sidebar();
        }

        true
    }

    /// Replaces one conversation's message list; other lists are untouched.
    pub fn set_messages_for(&mut self, id: ConversationId, messages: Vec<Message>) {
        self.messages.insert(id.clone(), messages);
        self.emit(StoreEvent::MessagesChanged(id));
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.draft == text {
            return;
        }

        self.draft = text;
        self.emit(StoreEvent::DraftChanged);
    }

    /// Appends a sent message to the selected conversation and refreshes its preview.
    ///
    /// Returns `None` without touching any state when nothing is selected or
    /// `content` is blank.
    pub fn send_message(&mut self, content: &str) -> Option<MessageId> {
        let Some(selected_id) = self.selected_id.clone() else {
            tracing::debug!("ignoring send without a selected conversation");
            return None;
        };

        if content.trim().is_empty() {
            tracing::debug!("ignoring blank send to conversation {selected_id}");
            return None;
        }

        let time = self.time_labeler.label();
        let message_id = self.ids.next_id();
        self.messages
            .entry(selected_id.clone())
            .or_default()
            .push(Message::sent(message_id, content, time.clone()));

        let preview = self.preview_policy.apply(content);
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == selected_id)
        {
            conversation.preview = preview;
            conversation.preview_time = time;
        }

        tracing::debug!("appended message {message_id} to conversation {selected_id}");
        self.emit(StoreEvent::MessagesChanged(selected_id));
        self.emit(StoreEvent::ConversationsChanged);
        self.set_draft(String::new());

        Some(message_id)
    }

    pub fn toggle_sidebar(&mut self) {
        self.set_sidebar_open(!self.sidebar_open);
    }

    pub fn open_sidebar(&mut self) {
        self.set_sidebar_open(true);
    }

    pub fn close_sidebar(&mut self) {
        self.set_sidebar_open(false);
    }

    /// Re-evaluates the mobile flag for a viewport `width` in logical pixels.
    ///
    /// Called once for the initial layout and again on every resize.
    pub fn observe_viewport(&mut self, width: f32) {
        let mobile = self.breakpoint.is_mobile(width);
        if self.mobile == mobile {
            return;
        }

        tracing::info!("viewport width {width} switched layout to mobile={mobile}");
        self.mobile = mobile;
        self.emit(StoreEvent::ViewportChanged { mobile });
    }

    fn set_sidebar_open(&mut self, open: bool) {
        if self.sidebar_open == open {
            return;
        }

        self.sidebar_open = open;
        self.emit(StoreEvent::SidebarChanged { open });
    }

    fn emit(&self, event: StoreEvent) {
        self.subscribers.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const LONG_MESSAGE: &str = "hello world this is a longer than thirty character message";

    fn counting_ids() -> impl FnMut() -> MessageId {
        let mut next = 0;
        move || {
            next += 1;
            MessageId::new(next)
        }
    }

    fn store_with_two_conversations() -> ChatStore {
        let mut store = ChatStore::default().with_id_source(counting_ids());
        store.set_conversations(vec![
            Conversation::new("a", "Alice").with_preview("See you", "9:41 AM"),
            Conversation::new("b", "Bob").with_preview("Thanks!", "Yesterday"),
        ]);
        store
    }

    fn record_events(store: &ChatStore) -> (Rc<RefCell<Vec<StoreEvent>>>, Subscription) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let subscription = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (events, subscription)
    }

    fn active_ids(store: &ChatStore) -> Vec<&str> {
        store
            .conversations()
            .iter()
            .filter(|conversation| conversation.active)
            .map(|conversation| conversation.id.as_str())
            .collect()
    }

    #[test]
    fn long_message_truncates_preview_and_appends_once() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        store.send_message(LONG_MESSAGE);

        let a = store.conversation(&"a".into()).expect("conversation a");
        assert_eq!(a.preview, format!("{}...", &LONG_MESSAGE[..30]));
        assert_eq!(a.preview_time, "Just now");
        assert_eq!(store.messages_for(&"a".into()).len(), 1);
        assert!(store.messages_for(&"b".into()).is_empty());
    }

    #[test]
    fn send_appends_sent_message_and_clears_draft() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"b".into());
        store.set_draft("short reply");

        let id = store.send_message("short reply");

        assert_eq!(id, Some(MessageId::new(1)));
        let messages = store.messages_for(&"b".into());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, crate::MessageKind::Sent);
        assert_eq!(messages[0].content.as_deref(), Some("short reply"));
        assert_eq!(messages[0].time.as_deref(), Some("Just now"));
        assert_eq!(store.draft(), "");

        let b = store.conversation(&"b".into()).expect("conversation b");
        assert_eq!(b.preview, "short reply");
        assert_eq!(b.preview_time, "Just now");
    }

    #[test]
    fn send_keeps_content_verbatim() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        store.send_message("  padded  ");

        let messages = store.messages_for(&"a".into());
        assert_eq!(messages[0].content.as_deref(), Some("  padded  "));
    }

    #[test]
    fn blank_sends_change_nothing() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        store.set_draft("   ");
        let conversations_before = store.conversations().to_vec();
        let (events, _subscription) = record_events(&store);

        for blank in ["", " ", "\t", "\n  \r\n"] {
            assert_eq!(store.send_message(blank), None);
        }

        assert!(store.messages_for(&"a".into()).is_empty());
        assert_eq!(store.conversations(), conversations_before.as_slice());
        assert_eq!(store.draft(), "   ");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn send_without_selection_is_ignored() {
        let mut store = store_with_two_conversations();
        store.set_draft("hello");

        assert_eq!(store.send_message("hello"), None);
        assert_eq!(store.draft(), "hello");
        assert!(store.messages_for(&"a".into()).is_empty());
    }

    #[test]
    fn consecutive_sends_keep_insertion_order() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        store.send_message("first");
        store.send_message("second");

        let contents = store
            .messages_for(&"a".into())
            .iter()
            .map(Message::content_str)
            .collect::<Vec<_>>();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn selection_marks_exactly_one_active() {
        let mut store = store_with_two_conversations();

        assert!(store.select_conversation(&"a".into()));
        assert_eq!(active_ids(&store), vec!["a"]);

        assert!(store.select_conversation(&"b".into()));
        assert_eq!(active_ids(&store), vec!["b"]);
        assert_eq!(store.selected_id(), Some(&ConversationId::new("b")));
    }

    #[test]
    fn reselecting_current_conversation_is_idempotent() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        let (events, _subscription) = record_events(&store);

        assert!(!store.select_conversation(&"a".into()));
        assert!(events.borrow().is_empty());
        assert_eq!(active_ids(&store), vec!["a"]);
    }

    #[test]
    fn unknown_conversation_is_not_selected() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());

        assert!(!store.select_conversation(&"zzz".into()));
        assert_eq!(store.selected_id(), Some(&ConversationId::new("a")));
    }

    #[test]
    fn selecting_on_mobile_closes_sidebar() {
        let mut store = store_with_two_conversations();
        store.observe_viewport(400.0);
        assert!(store.is_mobile());
        assert!(store.is_sidebar_open());

        store.select_conversation(&"a".into());
        assert!(!store.is_sidebar_open());
    }

    #[test]
    fn selecting_on_desktop_leaves_sidebar_alone() {
        let mut store = store_with_two_conversations();
        store.observe_viewport(1280.0);

        store.select_conversation(&"a".into());
        assert!(store.is_sidebar_open());

        store.close_sidebar();
        store.select_conversation(&"b".into());
        assert!(!store.is_sidebar_open());
    }

    #[test]
    fn viewport_changes_emit_only_on_transitions() {
        let mut store = ChatStore::default();
        let (events, _subscription) = record_events(&store);

        store.observe_viewport(1024.0);
        store.observe_viewport(500.0);
        store.observe_viewport(600.0);
        store.observe_viewport(900.0);

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::ViewportChanged { mobile: true },
                StoreEvent::ViewportChanged { mobile: false },
            ]
        );
    }

    #[test]
    fn sidebar_controls() {
        let mut store = ChatStore::default();
        assert!(store.is_sidebar_open());

        store.toggle_sidebar();
        assert!(!store.is_sidebar_open());
        store.toggle_sidebar();
        assert!(store.is_sidebar_open());
        store.close_sidebar();
        assert!(!store.is_sidebar_open());
        store.open_sidebar();
        assert!(store.is_sidebar_open());
    }

    #[test]
    fn set_messages_for_replaces_one_list() {
        let mut store = store_with_two_conversations();
        store.set_messages_for(
            "a".into(),
            vec![Message::received(MessageId::new(10), "Alice", "hi")],
        );
        store.set_messages_for(
            "b".into(),
            vec![Message::received(MessageId::new(11), "Bob", "yo")],
        );
        store.set_messages_for("a".into(), Vec::new());

        assert!(store.messages_for(&"a".into()).is_empty());
        assert_eq!(store.messages_for(&"b".into()).len(), 1);
    }

    #[test]
    fn replacing_conversations_drops_dangling_selection() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());

        store.set_conversations(vec![Conversation::new("b", "Bob")]);
        assert_eq!(store.selected_id(), None);

        store.set_conversations(vec![Conversation::new("b", "Bob")]);
        store.select_conversation(&"b".into());
        store.set_conversations(vec![Conversation::new("b", "Bobby")]);
        assert_eq!(store.selected_id(), Some(&ConversationId::new("b")));
    }

    #[test]
    fn dropping_selection_notifies_subscribers() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        let (events, _subscription) = record_events(&store);

        store.set_conversations(vec![Conversation::new("b", "Bob")]);

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::ConversationsChanged,
                StoreEvent::SelectionChanged(None),
            ]
        );
        assert!(store.selected_messages().is_empty());
    }

    #[test]
    fn replacing_conversations_keeps_live_selection_quiet() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"b".into());
        let (events, _subscription) = record_events(&store);

        store.set_conversations(vec![Conversation::new("b", "Bobby")]);

        assert_eq!(*events.borrow(), vec![StoreEvent::ConversationsChanged]);
    }

    #[test]
    fn selecting_reports_the_new_id() {
        let mut store = store_with_two_conversations();
        let (events, _subscription) = record_events(&store);

        store.select_conversation(&"a".into());

        assert_eq!(
            events.borrow().first(),
            Some(&StoreEvent::SelectionChanged(Some("a".into())))
        );
    }

    #[test]
    fn set_draft_is_verbatim_and_quiet_when_unchanged() {
        let mut store = ChatStore::default();
        let (events, _subscription) = record_events(&store);

        store.set_draft("  hi ");
        store.set_draft("  hi ");

        assert_eq!(store.draft(), "  hi ");
        assert_eq!(*events.borrow(), vec![StoreEvent::DraftChanged]);
    }

    #[test]
    fn send_notifies_subscribers_in_order() {
        let mut store = store_with_two_conversations();
        store.select_conversation(&"a".into());
        store.set_draft("ping");
        let (events, _subscription) = record_events(&store);

        store.send_message("ping");

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::MessagesChanged("a".into()),
                StoreEvent::ConversationsChanged,
                StoreEvent::DraftChanged,
            ]
        );
    }

    #[test]
    fn custom_time_labeler_feeds_message_and_preview() {
        let mut store = store_with_two_conversations()
            .with_time_labeler(FixedLabel("12:00".to_string()));
        store.select_conversation(&"a".into());
        store.send_message("noon");

        let a = store.conversation(&"a".into()).expect("conversation a");
        assert_eq!(a.preview_time, "12:00");
        assert_eq!(
            store.messages_for(&"a".into())[0].time.as_deref(),
            Some("12:00")
        );
    }

    #[test]
    fn configured_preview_policy_is_applied() {
        let config = ChatConfig {
            preview_max_chars: 5,
            preview_ellipsis: "…".to_string(),
            ..ChatConfig::default()
        };
        let mut store = ChatStore::new(&config);
        store.set_conversations(vec![Conversation::new("a", "Alice")]);
        store.select_conversation(&"a".into());
        store.send_message("abcdefgh");

        let a = store.conversation(&"a".into()).expect("conversation a");
        assert_eq!(a.preview, "abcde…");
    }
}
