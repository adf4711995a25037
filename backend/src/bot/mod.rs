//! Command routing and event dispatch.

mod commands;
mod completeness;
mod events;

pub use completeness::{CompletenessCheck, RandomCompleteness};

use std::sync::Arc;

use crate::chat::Notifier;
use crate::config::CommandsConfig;
use crate::registry::UserRegistry;

/// Slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/checktimesheet [month]`
    Check,
    /// `/registertimesheet <spreadsheetId>`
    Register,
    /// `/checkalltimesheets <YYYYMM>` (admin only)
    CheckAll,
}

/// The bot: registry plus its outbound collaborators.
pub struct Bot {
    registry: Arc<UserRegistry>,
    notifier: Arc<dyn Notifier>,
    completeness: Arc<dyn CompletenessCheck>,
    commands: CommandsConfig,
}

impl Bot {
    pub fn new(
        registry: Arc<UserRegistry>,
        notifier: Arc<dyn Notifier>,
        completeness: Arc<dyn CompletenessCheck>,
        commands: CommandsConfig,
    ) -> Self {
        Self {
            registry,
            notifier,
            completeness,
            commands,
        }
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Map a Google Chat command id to a command.
    pub fn resolve_command(&self, command_id: &str) -> Option<Command> {
        if command_id == self.commands.check {
            Some(Command::Check)
        } else if command_id == self.commands.register {
            Some(Command::Register)
        } else if command_id == self.commands.check_all {
            Some(Command::CheckAll)
        } else {
            None
        }
    }
}
