use std::cell::RefCell;
use std::rc::Rc;

use gpui::*;
use natter_state::{
    ChatHandle, ChatProvider, ChatStateResult, ChatStore, StoreEvent,
    Subscription as StoreSubscription,
};

/// GPUI-side owner of the chat store.
///
/// Store notifications are queued while a mutation runs and re-emitted as GPUI
/// events once it returns, so views can subscribe with `cx.subscribe` and read the
/// store from their handlers.
pub struct ChatState {
    provider: ChatProvider,
    pending_events: Rc<RefCell<Vec<StoreEvent>>>,
    _store_subscription: StoreSubscription,
}

impl EventEmitter<StoreEvent> for ChatState {}

impl ChatState {
    pub fn new(store: ChatStore) -> Self {
        let pending_events = Rc::new(RefCell::new(Vec::new()));
        let queue = pending_events.clone();
        let store_subscription =
            store.subscribe(move |event| queue.borrow_mut().push(event.clone()));

        Self {
            provider: ChatProvider::new(store),
            pending_events,
            _store_subscription: store_subscription,
        }
    }

    /// Handle to inject into views; it stops working once this entity is released.
    pub fn handle(&self) -> ChatHandle {
        self.provider.handle()
    }

    pub fn read_store<R>(&self, f: impl FnOnce(&ChatStore) -> R) -> ChatStateResult<R> {
        self.provider.handle().read(f)
    }

    pub fn update_store<R>(
        &mut self,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut ChatStore) -> R,
    ) -> ChatStateResult<R> {
        let result = self.provider.handle().update(f);
        self.flush(cx);
        result
    }

    /// Runs `f`, which mutates the store through some [`ChatHandle`], then forwards
    /// whatever it changed.
    pub fn forward<R>(&mut self, cx: &mut Context<Self>, f: impl FnOnce() -> R) -> R {
        let result = f();
        self.flush(cx);
        result
    }

    fn flush(&mut self, cx: &mut Context<Self>) {
        let events = std::mem::take(&mut *self.pending_events.borrow_mut());
        if events.is_empty() {
            return;
        }

        for event in events {
            cx.emit(event);
        }
        cx.notify();
    }
}
