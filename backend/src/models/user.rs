use std::fmt;

use bridgette_common::EventUser;
use serde::Serialize;

/// Identity of a chat participant as carried by an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Stable resource name, e.g. `users/1234567890`.
    pub id: String,
    pub display_name: String,
    pub email: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

impl From<&EventUser> for UserRef {
    fn from(user: &EventUser) -> Self {
        Self {
            id: user.name.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
        }
    }
}

/// 1-based row number of a record in the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RowLocation(pub u32);

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.0)
    }
}

/// User record, one row of the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    /// Where the record lives in the table
    pub row: RowLocation,
    /// Stable external id, unique key
    pub user_id: String,
    /// Captured on creation, never refreshed
    pub display_name: String,
    pub email: String,
    /// Timesheet spreadsheet, empty until registered
    pub spreadsheet_id: String,
    /// Consent flag, gates timesheet commands
    pub is_enabled: bool,
    /// Set out of band, gates the bulk check
    pub is_admin: bool,
    /// Kept for layout compatibility, never written by the bot
    pub last_notified: Option<String>,
}

impl UserRecord {
    pub fn has_spreadsheet(&self) -> bool {
        !self.spreadsheet_id.is_empty()
    }
}

/// Partial record returned by the "all enabled" listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnabledUser {
    pub row: RowLocation,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub spreadsheet_id: String,
}

/// Fields the bot writes after a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    SpreadsheetId,
    IsEnabled,
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserField::SpreadsheetId => write!(f, "spreadsheet_id"),
            UserField::IsEnabled => write!(f, "is_enabled"),
        }
    }
}
