use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use natter_state::{Composer, StoreEvent};

use crate::chat::{ChatSidebar, ChatState, ComposerView, MessageList};

/// Sidebar width on desktop layouts. On mobile an open sidebar covers the window.
pub const SIDEBAR_WIDTH: f32 = 320.0;
const CHAT_HEADER_HEIGHT: f32 = 56.0;

/// Compile-time validation of layout constants.
const _: () = {
    assert!(SIDEBAR_WIDTH > 0.0);
    assert!(CHAT_HEADER_HEIGHT > 0.0);
};

gpui::actions!(shell, [ToggleSidebar, Quit,]);

/// Root layout: conversation sidebar beside the selected thread and its composer.
///
/// The shell reports every window resize to the store so the mobile flag, and with it
/// the auto-closing sidebar, follows the viewport.
pub struct ChatAppShell {
    chat: Entity<ChatState>,
    sidebar: Entity<ChatSidebar>,
    message_list: Entity<MessageList>,
    composer: Entity<ComposerView>,
    focus_handle: FocusHandle,
    _subscriptions: Vec<Subscription>,
}

impl ChatAppShell {
    pub fn new(
        chat: Entity<ChatState>,
        composer: Composer,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let sidebar = cx.new(|cx| ChatSidebar::new(chat.clone(), cx));
        let message_list = cx.new(|cx| MessageList::new(chat.clone(), cx));
        let composer = cx.new(|cx| ComposerView::new(chat.clone(), composer, window, cx));

        let subscriptions = vec![
            cx.subscribe(&chat, |_, _, event: &StoreEvent, cx| {
                if matches!(
                    event,
                    StoreEvent::SidebarChanged { .. }
                        | StoreEvent::ViewportChanged { .. }
                        | StoreEvent::SelectionChanged(_)
                        | StoreEvent::ConversationsChanged
                ) {
                    cx.notify();
                }
            }),
            cx.observe_window_bounds(window, |this, window, cx| {
                this.observe_viewport(window, cx);
            }),
        ];

        let mut shell = Self {
            chat,
            sidebar,
            message_list,
            composer,
            focus_handle: cx.focus_handle(),
            _subscriptions: subscriptions,
        };
        // Initial layout check; later ones come from the bounds observer.
        shell.observe_viewport(window, cx);
        shell
    }

    fn observe_viewport(&mut self, window: &Window, cx: &mut Context<Self>) {
        let width = f32::from(window.viewport_size().width);
        let result = self.chat.update(cx, |chat, cx| {
            chat.update_store(cx, |store| store.observe_viewport(width))
        });

        if let Err(error) = result {
            tracing::error!("failed to record viewport width {width}: {error}");
        }
    }

    fn toggle_sidebar(&mut self, cx: &mut Context<Self>) {
        let result = self
            .chat
            .update(cx, |chat, cx| chat.update_store(cx, |store| store.toggle_sidebar()));

        if let Err(error) = result {
            tracing::error!("failed to toggle sidebar: {error}");
        }
    }

    fn render_chat_header(&self, title: Option<String>, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .id("chat-header")
            .w_full()
            .h(px(CHAT_HEADER_HEIGHT))
            .flex_shrink_0()
            .px_4()
            .gap_3()
            .items_center()
            .border_b_1()
            .border_color(theme.border)
            .child(
                Button::new("sidebar-toggle")
                    .ghost()
                    .small()
                    .icon(IconName::PanelLeftOpen)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.toggle_sidebar(cx);
                    })),
            )
            .when_some(title, |el, title| el.child(Label::new(title).text_lg()))
    }

    fn render_chat_pane(&self, title: Option<String>, cx: &Context<Self>) -> impl IntoElement {
        v_flex()
            .id("chat-pane")
            .flex_1()
            .h_full()
            .min_w_0()
            .min_h_0()
            .overflow_hidden()
            .child(self.render_chat_header(title, cx))
            .child(
                div()
                    .id("chat-pane-messages")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-pane-composer")
                    .flex_shrink_0()
                    .w_full()
                    .child(self.composer.clone()),
            )
    }
}

impl Focusable for ChatAppShell {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for ChatAppShell {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let (sidebar_open, mobile, title) = match self.chat.read(cx).read_store(|store| {
            (
                store.is_sidebar_open(),
                store.is_mobile(),
                store
                    .selected_conversation()
                    .map(|conversation| conversation.name.clone()),
            )
        }) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::error!("shell cannot read chat state: {error}");
                (true, false, None)
            }
        };
        let theme = cx.theme();
        // On narrow viewports an open sidebar takes the whole window.
        let show_chat_pane = !(mobile && sidebar_open);

        h_flex()
            .id("app-shell")
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(|this, _: &ToggleSidebar, _window, cx| {
                this.toggle_sidebar(cx);
            }))
            .size_full()
            .overflow_hidden()
            .bg(theme.background)
            .when(sidebar_open, |el| {
                el.child(
                    div()
                        .id("sidebar-container")
                        .h_full()
                        .flex_shrink_0()
                        .when(mobile, |el| el.w_full())
                        .when(!mobile, |el| el.w(px(SIDEBAR_WIDTH)))
                        .border_r_1()
                        .border_color(theme.border)
                        .child(self.sidebar.clone()),
                )
            })
            .when(show_chat_pane, |el| el.child(self.render_chat_pane(title, cx)))
    }
}
