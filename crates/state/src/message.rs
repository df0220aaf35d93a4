use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Creates a typed conversation identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stable identifier for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// How a message is presented in the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Sent,
    Received,
    /// Placeholder row shown while the other side is composing.
    Typing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub kind: MessageKind,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Message {
    /// Creates a bare message of the given kind with no optional fields set.
    pub fn new(id: MessageId, kind: MessageKind) -> Self {
        Self {
            id,
            kind,
            sender: None,
            avatar: None,
            content: None,
            time: None,
            images: Vec::new(),
        }
    }

    /// Creates an outgoing message as produced by the composer.
    pub fn sent(id: MessageId, content: impl Into<String>, time: impl Into<String>) -> Self {
        Self::new(id, MessageKind::Sent)
            .with_content(content)
            .with_time(time)
    }

    /// Creates an incoming message attributed to `sender`.
    pub fn received(id: MessageId, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(id, MessageKind::Received)
            .with_sender(sender)
            .with_content(content)
    }

    pub fn typing(id: MessageId, sender: impl Into<String>) -> Self {
        Self::new(id, MessageKind::Typing).with_sender(sender)
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// One entry of the conversation list, carrying a preview of its latest message.
///
/// `preview`, `preview_time` and `active` are stored rather than derived. The store is
/// the only writer that keeps them consistent with the message map and the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub avatar: String,
    pub name: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub preview_time: String,
    #[serde(default)]
    pub active: bool,
}

impl Conversation {
    /// Creates an inactive conversation with an empty preview.
    pub fn new(id: impl Into<ConversationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            avatar: String::new(),
            name: name.into(),
            preview: String::new(),
            preview_time: String::new(),
            active: false,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>, time: impl Into<String>) -> Self {
        self.preview = preview.into();
        self.preview_time = time.into();
        self
    }

    /// Returns the uppercase first letter of the display name, used when no avatar loads.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .find(|ch| ch.is_alphanumeric())
            .map(|ch| ch.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Truncation rule for conversation previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPolicy {
    pub max_chars: usize,
    pub ellipsis: String,
}

impl Default for PreviewPolicy {
    fn default() -> Self {
        Self {
            max_chars: 30,
            ellipsis: "...".to_string(),
        }
    }
}

impl PreviewPolicy {
    /// Returns `content` unchanged when it fits, otherwise its first `max_chars`
    /// characters followed by the ellipsis.
    pub fn apply(&self, content: &str) -> String {
        match content.char_indices().nth(self.max_chars) {
            Some((cut, _)) => format!("{}{}", &content[..cut], self.ellipsis),
            None => content.to_string(),
        }
    }
}
