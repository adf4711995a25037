use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::store::{Cell, RowStore, StoreError};

/// SQLite emulation of the user sheet for local development.
///
/// Each row is stored as a JSON array of cells keyed by its row number.
pub struct SqliteRowStore {
    conn: Mutex<Connection>,
}

impl SqliteRowStore {
    /// Open (or create) the database and seed `header` as row 1 if the table is empty.
    pub fn new(database_url: &str, header: Vec<Cell>) -> Result<Self, StoreError> {
        // Parse sqlite: prefix if present
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sheet_rows (
                row INTEGER PRIMARY KEY,
                cells TEXT NOT NULL
            )",
            [],
        ).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM sheet_rows", [], |row| row.get(0))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if count == 0 {
            conn.execute(
                "INSERT INTO sheet_rows (row, cells) VALUES (1, ?1)",
                params![encode(&header)?],
            ).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }

        tracing::info!("SQLite row store initialized with database: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn encode(cells: &[Cell]) -> Result<String, StoreError> {
    serde_json::to_string(cells).map_err(|e| StoreError::InvalidResponse(e.to_string()))
}

fn decode(json: &str) -> Result<Vec<Cell>, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl RowStore for SqliteRowStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    async fn rows(&self) -> Result<Vec<Vec<Cell>>, StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut stmt = conn
            .prepare("SELECT cells FROM sheet_rows ORDER BY row")
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let encoded = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Request(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        encoded.iter().map(|json| decode(json)).collect()
    }

    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError> {
        let conn = self.conn.lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        conn.execute(
            "INSERT INTO sheet_rows (row, cells)
             VALUES ((SELECT COALESCE(MAX(row), 0) + 1 FROM sheet_rows), ?1)",
            params![encode(&cells)?],
        ).map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(())
    }

    async fn write_cell(&self, row: u32, column: u32, value: Cell) -> Result<(), StoreError> {
        if column == 0 {
            return Err(StoreError::Request("column numbers start at 1".to_string()));
        }

        let conn = self.conn.lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT cells FROM sheet_rows WHERE row = ?1",
                params![row],
                |r| r.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let Some(existing) = existing else {
            return Err(StoreError::Request(format!("row {} does not exist", row)));
        };

        let mut cells = decode(&existing)?;
        let index = (column - 1) as usize;
        if cells.len() <= index {
            cells.resize(index + 1, Cell::empty());
        }
        cells[index] = value;

        conn.execute(
            "UPDATE sheet_rows SET cells = ?1 WHERE row = ?2",
            params![encode(&cells)?, row],
        ).map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(())
    }
}
