use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    list::ListItem,
    v_flex,
};
use natter_state::{Conversation, ConversationId, StoreEvent};

use crate::chat::state::ChatState;

const CONVERSATION_ROW_HEIGHT: f32 = 64.0;
const AVATAR_SIZE: f32 = 40.0;

pub struct ChatSidebar {
    chat: Entity<ChatState>,
    _subscription: Subscription,
}

impl ChatSidebar {
    pub fn new(chat: Entity<ChatState>, cx: &mut Context<Self>) -> Self {
        let subscription = cx.subscribe(&chat, |_, _, event: &StoreEvent, cx| {
            if matches!(
                event,
                StoreEvent::ConversationsChanged
                    | StoreEvent::SelectionChanged(_)
                    | StoreEvent::ViewportChanged { .. }
            ) {
                cx.notify();
            }
        });

        Self {
            chat,
            _subscription: subscription,
        }
    }

    fn select_conversation(&mut self, conversation_id: ConversationId, cx: &mut Context<Self>) {
        let result = self.chat.update(cx, |chat, cx| {
            chat.update_store(cx, |store| store.select_conversation(&conversation_id))
        });

        if let Err(error) = result {
            tracing::error!("sidebar cannot select conversation: {error}");
        }
    }

    fn close(&mut self, cx: &mut Context<Self>) {
        let result = self
            .chat
            .update(cx, |chat, cx| chat.update_store(cx, |store| store.close_sidebar()));

        if let Err(error) = result {
            tracing::error!("sidebar cannot close itself: {error}");
        }
    }

    fn render_header(&self, mobile: bool, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .h(px(56.))
            .flex_shrink_0()
            .px_4()
            .items_center()
            .justify_between()
            .border_b_1()
            .border_color(theme.border)
            .child(Label::new("Messages").text_lg())
            .when(mobile, |el| {
                el.child(
                    Button::new("sidebar-close")
                        .ghost()
                        .small()
                        .icon(IconName::PanelLeftClose)
                        .on_click(cx.listener(|this, _, _window, cx| {
                            this.close(cx);
                        })),
                )
            })
    }

    fn render_row(
        &self,
        index: usize,
        conversation: &Conversation,
        cx: &Context<Self>,
    ) -> AnyElement {
        let theme = cx.theme();
        let conversation_id = conversation.id.clone();

        ListItem::new(("conversation", index))
            .w_full()
            .h(px(CONVERSATION_ROW_HEIGHT))
            .px_3()
            .py_2()
            .rounded_md()
            .selected(conversation.active)
            .on_click(cx.listener(move |this, _event: &ClickEvent, _window, cx| {
                this.select_conversation(conversation_id.clone(), cx);
            }))
            .child(
                h_flex()
                    .w_full()
                    .gap_3()
                    .items_center()
                    .child(
                        div()
                            .size(px(AVATAR_SIZE))
                            .flex_shrink_0()
                            .rounded_full()
                            .bg(theme.muted)
                            .flex()
                            .items_center()
                            .justify_center()
                            .text_color(theme.foreground)
                            .child(conversation.initial()),
                    )
                    .child(
                        v_flex()
                            .flex_1()
                            .min_w_0()
                            .gap_1()
                            .child(
                                h_flex()
                                    .w_full()
                                    .justify_between()
                                    .gap_2()
                                    .child(
                                        div()
                                            .min_w_0()
                                            .truncate()
                                            .child(
                                                Label::new(conversation.name.clone()).text_sm(),
                                            ),
                                    )
                                    .child(
                                        Label::new(conversation.preview_time.clone())
                                            .text_xs()
                                            .text_color(theme.muted_foreground),
                                    ),
                            )
                            .child(
                                div().min_w_0().truncate().child(
                                    Label::new(conversation.preview.clone())
                                        .text_xs()
                                        .text_color(theme.muted_foreground),
                                ),
                            ),
                    ),
            )
            .into_any_element()
    }
}

impl Render for ChatSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let (conversations, mobile) = match self
            .chat
            .read(cx)
            .read_store(|store| (store.conversations().to_vec(), store.is_mobile()))
        {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::error!("sidebar cannot read chat state: {error}");
                (Vec::new(), false)
            }
        };

        let rows = conversations
            .iter()
            .enumerate()
            .map(|(index, conversation)| self.render_row(index, conversation, cx))
            .collect::<Vec<_>>();
        let theme = cx.theme();

        v_flex()
            .size_full()
            .bg(theme.background)
            .child(self.render_header(mobile, cx))
            .child(
                v_flex()
                    .id("conversation-list")
                    .flex_1()
                    .min_h_0()
                    .overflow_y_scroll()
                    .p_2()
                    .gap_1()
                    .children(rows),
            )
    }
}
