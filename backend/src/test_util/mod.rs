//! Fakes and fixtures shared by unit and integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridgette_common::{ChatEvent, Message};

use crate::bot::{Bot, CompletenessCheck};
use crate::chat::Notifier;
use crate::config::{
    ColumnLayout, CommandsConfig, Config, GoogleConfig, LoggingConfig, RegistryBackend,
    RegistryConfig, ServerConfig,
};
use crate::registry::{header_row, Cell, RowStore, StoreError, UserRegistry};

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        registry: RegistryConfig {
            backend: RegistryBackend::Sqlite,
            spreadsheet_id: "test-db".to_string(),
            sheet_name: "Users".to_string(),
            sqlite_path: ":memory:".to_string(),
            columns: ColumnLayout::default(),
        },
        google: GoogleConfig {
            access_token: "test-token".to_string(),
            sheets_base_url: "http://localhost:1".to_string(),
            chat_base_url: "http://localhost:1".to_string(),
        },
        commands: CommandsConfig::default(),
    }
}

/// In-memory sheet with operation counters and failure switches.
#[derive(Default)]
pub struct MemoryRowStore {
    rows: Mutex<Vec<Vec<Cell>>>,
    reads: AtomicUsize,
    appends: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryRowStore {
    /// Store holding only the default header row.
    pub fn with_header() -> Self {
        let store = Self::default();
        store.push_row(header_row(&ColumnLayout::default()));
        store
    }

    /// Insert a row directly, bypassing the counters.
    pub fn push_row(&self, cells: Vec<Cell>) {
        self.rows.lock().unwrap().push(cells);
    }

    pub fn snapshot(&self) -> Vec<Vec<Cell>> {
        self.rows.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every operation fail as if the sheet were missing.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make appends and cell writes fail while reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        self.check_available()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Request("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn rows(&self) -> Result<Vec<Vec<Cell>>, StoreError> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError> {
        self.check_writable()?;
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.push_row(cells);
        Ok(())
    }

    async fn write_cell(&self, row: u32, column: u32, value: Cell) -> Result<(), StoreError> {
        self.check_writable()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().unwrap();
        let cells = row
            .checked_sub(1)
            .and_then(|i| rows.get_mut(i as usize))
            .ok_or_else(|| StoreError::Request(format!("row {} out of range", row)))?;
        let index = column
            .checked_sub(1)
            .ok_or_else(|| StoreError::Request("column numbers start at 1".to_string()))?
            as usize;
        if cells.len() <= index {
            cells.resize(index + 1, Cell::empty());
        }
        cells[index] = value;
        Ok(())
    }
}

/// Notifier that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, Message)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, Message)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_direct(&self, user_id: &str, message: &Message) {
        self.sent
            .lock()
            .unwrap()
            .push((user_id.to_string(), message.clone()));
    }
}

/// Completeness check with a fixed answer.
pub struct FixedCompleteness(pub bool);

#[async_trait]
impl CompletenessCheck for FixedCompleteness {
    async fn is_complete(&self, _spreadsheet_id: &str, _month: &str) -> bool {
        self.0
    }
}

/// Bot over `store` with default command ids and a fixed completeness answer.
pub fn test_bot(store: Arc<MemoryRowStore>, notifier: Arc<RecordingNotifier>, complete: bool) -> Bot {
    let registry = Arc::new(UserRegistry::new(store, ColumnLayout::default()));
    Bot::new(
        registry,
        notifier,
        Arc::new(FixedCompleteness(complete)),
        CommandsConfig::default(),
    )
}

pub fn event_from_json(value: serde_json::Value) -> ChatEvent {
    serde_json::from_value(value).expect("valid chat event")
}
