use std::cell::RefCell;
use std::rc::{Rc, Weak};

use snafu::OptionExt;

use crate::error::{ChatStateResult, OutsideProviderSnafu, StoreBusySnafu};
use crate::store::ChatStore;

/// Owns the session's [`ChatStore`] and scopes every [`ChatHandle`] derived from it.
///
/// Handles stay valid only while the provider is alive; afterwards every access fails
/// with [`ChatStateError::OutsideProvider`](crate::ChatStateError::OutsideProvider).
pub struct ChatProvider {
    store: Rc<RefCell<ChatStore>>,
}

impl ChatProvider {
    pub fn new(store: ChatStore) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
        }
    }

    pub fn handle(&self) -> ChatHandle {
        ChatHandle {
            store: Rc::downgrade(&self.store),
        }
    }
}

/// Cheap, cloneable access to the chat store, injected into views.
#[derive(Clone)]
pub struct ChatHandle {
    store: Weak<RefCell<ChatStore>>,
}

impl ChatHandle {
    /// A handle that was never attached to a provider.
    pub fn detached() -> Self {
        Self { store: Weak::new() }
    }

    pub fn is_attached(&self) -> bool {
        self.store.strong_count() > 0
    }

    pub fn read<R>(&self, f: impl FnOnce(&ChatStore) -> R) -> ChatStateResult<R> {
        let store = self.store.upgrade().context(OutsideProviderSnafu {
            stage: "read-chat-store",
        })?;
        let guard = store.try_borrow().ok().context(StoreBusySnafu {
            stage: "read-chat-store",
        })?;
        Ok(f(&guard))
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ChatStore) -> R) -> ChatStateResult<R> {
        let store = self.store.upgrade().context(OutsideProviderSnafu {
            stage: "update-chat-store",
        })?;
        let mut guard = store.try_borrow_mut().ok().context(StoreBusySnafu {
            stage: "update-chat-store",
        })?;
        Ok(f(&mut guard))
    }
}

impl std::fmt::Debug for ChatHandle {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ChatHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
