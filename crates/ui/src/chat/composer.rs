use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};
use natter_state::{ChatStateResult, Composer, KeyPress, StoreEvent};

use crate::chat::state::ChatState;

/// Decides which enter actions from the text input count as a send.
///
/// The input reports Enter through `InputEvent::PressEnter` after its own key
/// binding ran, so a preceding Shift+Enter key-down is remembered here.
#[derive(Debug, Default)]
struct EnterGate {
    shift_pending: bool,
}

impl EnterGate {
    fn key_down(&mut self, press: &KeyPress) {
        if press.is_enter() {
            self.shift_pending = press.shift;
        }
    }

    /// Key press to hand to the composer for an enter action, if it is a plain Enter.
    fn enter_action(&mut self, secondary: bool) -> Option<KeyPress> {
        let shift = std::mem::take(&mut self.shift_pending);
        (!secondary && !shift).then(|| KeyPress::new("enter", false))
    }
}

/// Message composer. The text field mirrors the store's draft at all times.
pub struct ComposerView {
    chat: Entity<ChatState>,
    composer: Composer,
    input_state: Entity<InputState>,
    enter_gate: EnterGate,
    _subscriptions: Vec<Subscription>,
}

impl ComposerView {
    /// Builds the view around a composer already bound to `chat`'s provider.
    pub fn new(
        chat: Entity<ChatState>,
        composer: Composer,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let draft = composer.draft().unwrap_or_else(|error| {
            tracing::error!("composer cannot read initial draft: {error}");
            String::new()
        });

        let input_state = cx.new(|cx| {
            let mut state = InputState::new(window, cx).placeholder("Message...");
            state.set_value(draft, window, cx);
            state
        });

        let subscriptions = vec![
            cx.subscribe_in(
                &input_state,
                window,
                |this, state, event: &InputEvent, _window, cx| {
                    if let InputEvent::PressEnter { secondary } = event {
                        this.handle_enter(*secondary, cx);
                        return;
                    }
                    let text = state.read(cx).value().to_string();
                    this.run(cx, |composer| composer.input(text));
                },
            ),
            cx.subscribe_in(
                &chat,
                window,
                |this, _, event: &StoreEvent, window, cx| {
                    if *event == StoreEvent::DraftChanged {
                        this.sync_input(window, cx);
                    }
                },
            ),
        ];

        Self {
            chat,
            composer,
            input_state,
            enter_gate: EnterGate::default(),
            _subscriptions: subscriptions,
        }
    }

    fn run<R>(
        &self,
        cx: &mut Context<Self>,
        f: impl FnOnce(&Composer) -> ChatStateResult<R>,
    ) -> Option<R> {
        let composer = &self.composer;
        let result = self
            .chat
            .update(cx, |chat, cx| chat.forward(cx, || f(composer)));

        match result {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::error!("composer lost its chat state: {error}");
                None
            }
        }
    }

    fn sync_input(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let draft = match self.composer.draft() {
            Ok(draft) => draft,
            Err(error) => {
                tracing::error!("composer cannot read draft: {error}");
                return;
            }
        };

        self.input_state.update(cx, |state, cx| {
            if state.value().to_string() != draft {
                state.set_value(draft, window, cx);
            }
        });
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent) {
        self.enter_gate.key_down(&KeyPress::new(
            event.keystroke.key.as_str(),
            event.keystroke.modifiers.shift,
        ));
    }

    fn handle_enter(&mut self, secondary: bool, cx: &mut Context<Self>) {
        let Some(press) = self.enter_gate.enter_action(secondary) else {
            return;
        };

        if let Some(outcome) = self.run(cx, |composer| composer.key_down(&press)) {
            tracing::debug!("composer enter handled, sent={:?}", outcome.sent);
        }
    }

    fn handle_send_clicked(&mut self, cx: &mut Context<Self>) {
        self.run(cx, |composer| composer.submit());
    }
}

impl Render for ComposerView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .id("composer")
            .w_full()
            .h(px(80.))
            .p_4()
            .border_t_1()
            .border_color(theme.border)
            .child(
                h_flex()
                    .w_full()
                    .items_center()
                    .gap_2()
                    .p_2()
                    .rounded_lg()
                    .bg(theme.background)
                    .child(
                        div()
                            .size(px(32.))
                            .flex_shrink_0()
                            .rounded_full()
                            .bg(theme.muted)
                            .flex()
                            .items_center()
                            .justify_center()
                            .text_sm()
                            .text_color(theme.foreground)
                            .child("U"),
                    )
                    .child(
                        div()
                            .flex_1()
                            .min_w_0()
                            .on_key_down(cx.listener(|this, event: &KeyDownEvent, _window, _cx| {
                                this.handle_key_down(event);
                            }))
                            .child(Input::new(&self.input_state).w_full()),
                    )
                    .child(
                        Button::new("composer-emoji")
                            .ghost()
                            .small()
                            .child("☺")
                            .tooltip("Add emoji"),
                    )
                    .child(
                        Button::new("composer-attach")
                            .ghost()
                            .small()
                            .icon(IconName::Plus)
                            .tooltip("Attach file"),
                    )
                    .child(
                        Button::new("composer-send")
                            .small()
                            .primary()
                            .icon(IconName::ArrowUp)
                            .tooltip("Send message")
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.handle_send_clicked(cx);
                            })),
                    ),
            )
    }
}
