//! Configuration for the Bridgette backend.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Which row store backs the user registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryBackend {
    /// Google Sheets spreadsheet (production).
    #[default]
    Sheets,
    /// Local SQLite file emulating the sheet.
    Sqlite,
}

/// Location and layout of the user table.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub backend: RegistryBackend,
    /// Spreadsheet holding the user table (sheets backend).
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Sheet (tab) name inside the spreadsheet.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Database file (sqlite backend).
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    #[serde(default)]
    pub columns: ColumnLayout,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend: RegistryBackend::default(),
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            sqlite_path: default_sqlite_path(),
            columns: ColumnLayout::default(),
        }
    }
}

/// 1-based column positions of the user table. Row 1 holds headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub user_id: u32,
    pub display_name: u32,
    pub email: u32,
    pub spreadsheet_id: u32,
    pub is_enabled: u32,
    pub is_admin: u32,
    pub last_notified: u32,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            user_id: 1,
            display_name: 2,
            email: 3,
            spreadsheet_id: 4,
            is_enabled: 5,
            is_admin: 6,
            last_notified: 7,
        }
    }
}

impl ColumnLayout {
    /// Number of columns a full row spans.
    pub fn width(&self) -> u32 {
        [
            self.user_id,
            self.display_name,
            self.email,
            self.spreadsheet_id,
            self.is_enabled,
            self.is_admin,
            self.last_notified,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Google API endpoints and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Bearer token for Sheets and Chat calls.
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,
    #[serde(default = "default_chat_base_url")]
    pub chat_base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            sheets_base_url: default_sheets_base_url(),
            chat_base_url: default_chat_base_url(),
        }
    }
}

/// Slash command ids as configured in the Google Chat app.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandsConfig {
    /// `/checktimesheet [month]`
    #[serde(default = "default_check_command")]
    pub check: String,
    /// `/registertimesheet <spreadsheetId>`
    #[serde(default = "default_register_command")]
    pub register: String,
    /// `/checkalltimesheets <YYYYMM>`
    #[serde(default = "default_check_all_command")]
    pub check_all: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            check: default_check_command(),
            register: default_register_command(),
            check_all: default_check_all_command(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_sheet_name() -> String {
    "Users".to_string()
}
fn default_sqlite_path() -> String {
    "./data/registry.db".to_string()
}
fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}
fn default_chat_base_url() -> String {
    "https://chat.googleapis.com".to_string()
}
fn default_check_command() -> String {
    "1".to_string()
}
fn default_register_command() -> String {
    "2".to_string()
}
fn default_check_all_command() -> String {
    "3".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (BRIDGETTE__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("registry.sheet_name", default_sheet_name())?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("BRIDGETTE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
