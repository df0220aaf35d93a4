pub mod composer;
pub mod message_list;
pub mod sidebar;
/// Store ownership and event forwarding for GPUI views.
pub mod state;

pub use composer::ComposerView;
pub use message_list::MessageList;
pub use sidebar::ChatSidebar;
pub use state::ChatState;
