//! Outbound side of the bot: message formatting and direct messages.

pub mod format;
mod notifier;

pub use notifier::{direct_space_name, ChatNotifier, Notifier};
