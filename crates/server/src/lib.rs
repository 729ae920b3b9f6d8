//! Command dispatcher for the plugin boundary.
//!
//! Receives [`tokenmove_protocol::Command`]s from the panel, drives the
//! engine against the host store, and answers with
//! [`tokenmove_protocol::Event`]s. User-facing notifications go out through
//! the fire-and-forget [`Notifier`] side channel, never through control flow.

pub mod notify;
pub mod server;

pub use notify::{LogNotifier, Notifier};
pub use server::PluginServer;
