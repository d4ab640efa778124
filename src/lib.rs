//! SplitScreen: the logic core of a dual-pane web browser.
//!
//! Favorites and recent history live in a [`PageStore`](managers::page_store::PageStore);
//! the two resizable panes are sized by a
//! [`SplitPaneLayout`](managers::split_layout::SplitPaneLayout).
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
