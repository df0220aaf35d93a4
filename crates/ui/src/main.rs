use gpui::*;
use gpui_component::Root;
use natter_state::{ChatConfig, ChatStore, Composer, seed};
use tracing_subscriber::EnvFilter;

use natter::app::{ChatAppShell, Quit, ToggleSidebar};
use natter::chat::ChatState;

/// Application entry point.
///
/// Bootstraps the GPUI application with:
/// 1. Asset loading via gpui-component-assets
/// 2. gpui-component initialization (required for Root, themes, tooltips)
/// 3. Chat settings and the session's chat store
/// 4. Global key bindings for shell-level commands
/// 5. Window creation with Root wrapper for gpui-component composition
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ChatConfig::load();
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        // Initialize gpui-component - REQUIRED before any Root usage
        gpui_component::init(cx);

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-b", ToggleSidebar, None),
        ]);

        let mut store = ChatStore::new(&config);
        if config.seed_demo_data {
            seed::install_demo(&mut store);
        }
        tracing::info!(
            "chat store ready with {} conversations",
            store.conversations().len()
        );

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1100.), px(760.)),
                        cx,
                    ))),
                    ..Default::default()
                };

                cx.open_window(options, |window, cx| {
                    let chat = cx.new(|_| ChatState::new(store));
                    let composer = Composer::new(chat.read(cx).handle())
                        .expect("composer must be created within a chat provider");
                    let shell = cx.new(|cx| ChatAppShell::new(chat, composer, window, cx));

                    // Root is REQUIRED by gpui-component for tooltips and overlays
                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });
}
