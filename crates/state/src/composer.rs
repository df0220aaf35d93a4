use crate::error::{ChatStateResult, OutsideProviderSnafu};
use crate::message::MessageId;
use crate::provider::ChatHandle;

/// A key-down as seen by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, shift: bool) -> Self {
        Self {
            key: key.into(),
            shift,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.key.eq_ignore_ascii_case("enter")
    }
}

/// What the view must do with a key-down after the composer handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The platform's default handling (newline insertion) must be suppressed.
    pub prevent_default: bool,
    pub sent: Option<MessageId>,
}

/// Stateless controller behind the message composer.
///
/// The draft lives in the store; the composer only translates input events into
/// store operations.
#[derive(Debug, Clone)]
pub struct Composer {
    chat: ChatHandle,
}

impl Composer {
    /// Binds a composer to `chat`, failing when the handle has no live provider.
    pub fn new(chat: ChatHandle) -> ChatStateResult<Self> {
        snafu::ensure!(
            chat.is_attached(),
            OutsideProviderSnafu {
                stage: "create-composer",
            }
        );
        Ok(Self { chat })
    }

    pub fn draft(&self) -> ChatStateResult<String> {
        self.chat.read(|store| store.draft().to_string())
    }

    /// Writes the full edited text back to the store.
    pub fn input(&self, text: impl Into<String>) -> ChatStateResult<()> {
        let text = text.into();
        self.chat.update(|store| store.set_draft(text))
    }

    /// Sends the current draft unless it is blank.
    pub fn submit(&self) -> ChatStateResult<Option<MessageId>> {
        self.chat.update(|store| {
            let draft = store.draft().to_string();
            if draft.trim().is_empty() {
                return None;
            }
            store.send_message(&draft)
        })
    }

    /// Enter without Shift sends and suppresses the newline. Everything else,
    /// including Shift+Enter, keeps its default behaviour.
    pub fn key_down(&self, press: &KeyPress) -> ChatStateResult<KeyOutcome> {
        if !press.is_enter() || press.shift {
            return Ok(KeyOutcome::default());
        }

        let sent = self.submit()?;
        Ok(KeyOutcome {
            prevent_default: true,
            sent,
        })
    }
}
