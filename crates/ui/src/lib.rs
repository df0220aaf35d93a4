#![deny(unsafe_code)]

/// Chat application shell and components.
///
/// Desktop front end for `natter-state` built with GPUI and gpui-component. All chat
/// data is local to the running session.
pub mod app;
/// Views over the shared chat store.
pub mod chat;
