use std::sync::OnceLock;

use bridgette_common::Message;
use regex::Regex;

use super::{Bot, Command};
use crate::chat::format;
use crate::error::{BotError, Result};
use crate::models::user::{UserField, UserRecord, UserRef};

/// Bulk-check month argument: exactly six digits (YYYYMM).
fn is_valid_month(month: &str) -> bool {
    static MONTH: OnceLock<Regex> = OnceLock::new();
    MONTH
        .get_or_init(|| Regex::new(r"^\d{6}$").expect("month pattern is valid"))
        .is_match(month)
}

impl Bot {
    /// Route a slash command to its handler.
    ///
    /// The caller's record is created first if it does not exist yet.
    pub async fn handle_slash_command(
        &self,
        command_id: &str,
        args: &str,
        user: &UserRef,
    ) -> Result<Message> {
        let record = match self.registry.get_or_create(user).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Could not ensure user {} exists: {}", user.id, e);
                None
            }
        };

        let Some(command) = self.resolve_command(command_id) else {
            tracing::info!("Unknown command id {} from {}", command_id, user.id);
            return Ok(format::text(format::UNKNOWN_COMMAND));
        };

        tracing::info!(?command, user = %user.id, "Handling slash command");

        match command {
            Command::Check => self.check_timesheet(args, user, record),
            Command::Register => self.register_timesheet(args, record).await,
            Command::CheckAll => self.check_all_timesheets(args, user).await,
        }
    }

    async fn register_timesheet(&self, args: &str, record: Option<UserRecord>) -> Result<Message> {
        let mut parts = args.split_whitespace();
        let spreadsheet_id = match (parts.next(), parts.next()) {
            (Some(id), None) => id,
            _ => return Ok(format::text(format::REGISTER_USAGE)),
        };

        let Some(record) = record else {
            return Ok(format::text(format::USER_NOT_FOUND));
        };

        self.registry
            .update_field(record.row, UserField::SpreadsheetId, spreadsheet_id)
            .await?;

        tracing::info!("Registered timesheet {} for {}", spreadsheet_id, record.user_id);
        Ok(format::text(format::REGISTER_SUCCESS))
    }

    fn check_timesheet(
        &self,
        args: &str,
        user: &UserRef,
        record: Option<UserRecord>,
    ) -> Result<Message> {
        let record = record.ok_or_else(|| BotError::UserUnavailable(user.id.clone()))?;

        if !record.is_enabled {
            return Ok(format::text(format::CONSENT_REQUIRED));
        }

        if !record.has_spreadsheet() {
            return Ok(format::text(format::REGISTRATION_REQUIRED));
        }

        let month = if args.is_empty() { format::CURRENT_MONTH } else { args };
        Ok(format::check_placeholder(&record.display_name, month))
    }

    async fn check_all_timesheets(&self, args: &str, user: &UserRef) -> Result<Message> {
        let is_admin = self.registry.is_admin(&user.id).await.unwrap_or_else(|e| {
            tracing::warn!("Treating {} as non-admin: {}", user.id, e);
            false
        });
        if !is_admin {
            return Ok(format::text(format::PERMISSION_DENIED));
        }

        let month = args;
        if !is_valid_month(month) {
            return Ok(format::text(format::MONTH_USAGE));
        }

        let enabled_users = self.registry.list_enabled().await?;
        if enabled_users.is_empty() {
            return Ok(format::text(format::NO_ENABLED_USERS));
        }

        let mut checked = 0;
        let mut incomplete = 0;

        for enabled in &enabled_users {
            if enabled.spreadsheet_id.is_empty() {
                tracing::info!("User {} has not registered a timesheet.", enabled.user_id);
                continue;
            }

            if !self
                .completeness
                .is_complete(&enabled.spreadsheet_id, month)
                .await
            {
                incomplete += 1;
                let reminder = format::reminder(&enabled.display_name, month);
                self.notifier.send_direct(&enabled.user_id, &reminder).await;
            }
            checked += 1;
        }

        tracing::info!(
            month,
            checked,
            incomplete,
            "Bulk timesheet check finished"
        );
        Ok(format::bulk_summary(month, checked, incomplete))
    }
}
