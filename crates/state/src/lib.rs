#![deny(unsafe_code)]

//! Client-side chat state: conversations, message threads, the composer draft
//! and the layout flags that drive the sidebar.
//!
//! Everything here is local and ephemeral. Nothing is delivered anywhere; sending
//! only appends to the in-memory thread.

/// Composer controller translating edits and key presses into store operations.
pub mod composer;
pub mod config;
pub mod error;
/// Formatting and id hooks used when a message is sent.
pub mod hooks;
/// Domain entities.
pub mod message;
pub mod provider;
pub mod seed;
pub mod store;
pub mod subscription;
pub mod viewport;

pub use composer::{Composer, KeyOutcome, KeyPress};
pub use config::ChatConfig;
pub use error::{ChatStateError, ChatStateResult, ConfigError};
pub use hooks::{ClockIds, FixedLabel, IdSource, JUST_NOW_LABEL, TimeLabeler};
pub use message::{Conversation, ConversationId, Message, MessageId, MessageKind, PreviewPolicy};
pub use provider::{ChatHandle, ChatProvider};
pub use store::{ChatStore, StoreEvent};
pub use subscription::{SubscriberSet, Subscription};
pub use viewport::Breakpoint;
