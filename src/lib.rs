//! timemark: timestamped video bookmarks with notes.
//!
//! A capture side turns the current playback position into a bookmark and
//! appends it to a synchronized key-value store; a panel lists, edits and
//! deletes bookmarks and re-renders when the store reports a change.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
