use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, h_flex, label::Label, v_flex};
use natter_state::{Message, MessageKind, StoreEvent};

use crate::chat::state::ChatState;

const BUBBLE_MAX_WIDTH: Pixels = px(480.);
const AVATAR_SIZE: Pixels = px(32.);
const IMAGE_TILE_SIZE: Pixels = px(120.);

/// Thread of the selected conversation, oldest first.
pub struct MessageList {
    chat: Entity<ChatState>,
    scroll_handle: ScrollHandle,
    pending_scroll_to_bottom: bool,
    _subscription: Subscription,
}

/// New rows land at the bottom, so these keep the latest message in view.
fn follows_bottom(event: &StoreEvent) -> bool {
    matches!(
        event,
        StoreEvent::MessagesChanged(_) | StoreEvent::SelectionChanged(_)
    )
}

impl MessageList {
    pub fn new(chat: Entity<ChatState>, cx: &mut Context<Self>) -> Self {
        let subscription = cx.subscribe(&chat, |this, _, event: &StoreEvent, cx| {
            if follows_bottom(event) {
                this.pending_scroll_to_bottom = true;
                cx.notify();
            }
        });

        Self {
            chat,
            scroll_handle: ScrollHandle::new(),
            pending_scroll_to_bottom: false,
            _subscription: subscription,
        }
    }

    /// Scrolls once the frame that lays out the new rows has been drawn.
    fn apply_pending_scroll(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !std::mem::take(&mut self.pending_scroll_to_bottom) {
            return;
        }

        cx.on_next_frame(window, |this, _window, cx| {
            this.scroll_handle.scroll_to_bottom();
            cx.notify();
        });
    }

    fn render_empty_state(&self, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .child(
                Label::new("Select a conversation to start chatting")
                    .text_sm()
                    .text_color(theme.muted_foreground),
            )
            .into_any_element()
    }

    fn render_avatar(&self, message: &Message, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let initial = message
            .sender
            .as_deref()
            .and_then(|sender| sender.chars().next())
            .map(|ch| ch.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());

        div()
            .size(AVATAR_SIZE)
            .flex_shrink_0()
            .rounded_full()
            .bg(theme.muted)
            .flex()
            .items_center()
            .justify_center()
            .text_sm()
            .text_color(theme.foreground)
            .child(initial)
    }

    fn render_sent(&self, message: &Message, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .justify_end()
            .child(
                v_flex()
                    .max_w(BUBBLE_MAX_WIDTH)
                    .items_end()
                    .gap_1()
                    .child(
                        div()
                            .px_3()
                            .py_2()
                            .rounded_lg()
                            .bg(theme.primary)
                            .text_color(theme.primary_foreground)
                            .text_sm()
                            .child(message.content_str().to_string()),
                    )
                    .when_some(message.time.clone(), |el, time| {
                        el.child(
                            Label::new(time)
                                .text_xs()
                                .text_color(theme.muted_foreground),
                        )
                    }),
            )
            .into_any_element()
    }

    fn render_received(&self, message: &Message, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let images = message.images.clone();

        h_flex()
            .w_full()
            .items_start()
            .gap_2()
            .child(self.render_avatar(message, cx))
            .child(
                v_flex()
                    .max_w(BUBBLE_MAX_WIDTH)
                    .gap_1()
                    .when_some(message.sender.clone(), |el, sender| {
                        el.child(
                            Label::new(sender)
                                .text_xs()
                                .text_color(theme.muted_foreground),
                        )
                    })
                    .when_some(message.content.clone(), |el, content| {
                        el.child(
                            div()
                                .px_3()
                                .py_2()
                                .rounded_lg()
                                .bg(theme.muted)
                                .text_color(theme.foreground)
                                .text_sm()
                                .child(content),
                        )
                    })
                    .when(!images.is_empty(), |el| {
                        el.child(h_flex().gap_2().flex_wrap().children(images.into_iter().map(
                            |source| {
                                img(SharedString::from(source))
                                    .size(IMAGE_TILE_SIZE)
                                    .rounded_md()
                            },
                        )))
                    })
                    .when_some(message.time.clone(), |el, time| {
                        el.child(
                            Label::new(time)
                                .text_xs()
                                .text_color(theme.muted_foreground),
                        )
                    }),
            )
            .into_any_element()
    }

    fn render_typing(&self, message: &Message, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let who = message.sender.clone().unwrap_or_else(|| "Someone".to_string());

        h_flex()
            .w_full()
            .items_center()
            .gap_2()
            .child(self.render_avatar(message, cx))
            .child(
                div()
                    .px_3()
                    .py_2()
                    .rounded_lg()
                    .bg(theme.muted)
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child(format!("{who} is typing…")),
            )
            .into_any_element()
    }

    fn render_message(&self, message: &Message, cx: &Context<Self>) -> AnyElement {
        match message.kind {
            MessageKind::Sent => self.render_sent(message, cx),
            MessageKind::Received => self.render_received(message, cx),
            MessageKind::Typing => self.render_typing(message, cx),
        }
    }
}

impl Render for MessageList {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.apply_pending_scroll(window, cx);

        let messages = match self.chat.read(cx).read_store(|store| {
            store
                .selected_id()
                .is_some()
                .then(|| store.selected_messages().to_vec())
        }) {
            Ok(messages) => messages,
            Err(error) => {
                tracing::error!("message list cannot read chat state: {error}");
                None
            }
        };

        let Some(messages) = messages else {
            return self.render_empty_state(cx);
        };

        let rows = messages
            .iter()
            .map(|message| self.render_message(message, cx))
            .collect::<Vec<_>>();

        v_flex()
            .id("message-list")
            .size_full()
            .min_h_0()
            .overflow_y_scroll()
            .track_scroll(&self.scroll_handle)
            .p_4()
            .gap_4()
            .children(rows)
            .into_any_element()
    }
}

#[cfg(test)]
mod tests {
    use natter_state::ConversationId;

    use super::*;

    #[test]
    fn thread_changes_follow_bottom() {
        assert!(follows_bottom(&StoreEvent::MessagesChanged(ConversationId::new("a"))));
        assert!(follows_bottom(&StoreEvent::SelectionChanged(Some(
            ConversationId::new("a")
        ))));
        assert!(follows_bottom(&StoreEvent::SelectionChanged(None)));
    }

    #[test]
    fn unrelated_changes_keep_scroll_position() {
        assert!(!follows_bottom(&StoreEvent::DraftChanged));
        assert!(!follows_bottom(&StoreEvent::ConversationsChanged));
        assert!(!follows_bottom(&StoreEvent::SidebarChanged { open: false }));
        assert!(!follows_bottom(&StoreEvent::ViewportChanged { mobile: true }));
    }
}
