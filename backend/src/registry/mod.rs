//! User registry: one table of user records keyed by chat user id.
//!
//! Lookups are a linear scan over the data rows (row 2 onwards); the
//! first matching row wins. Records are appended on first contact and
//! never deleted. There is no locking: two concurrent "not found"
//! lookups for the same id can both append a row.

mod sheets;
mod sqlite;
mod store;

pub use sheets::SheetsRowStore;
pub use sqlite::SqliteRowStore;
pub use store::{Cell, RowStore, StoreError};

use std::sync::Arc;

use crate::config::ColumnLayout;
use crate::models::user::{EnabledUser, RowLocation, UserField, UserRecord, UserRef};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The backing table could not be read or written.
    #[error("User registry unavailable")]
    Unavailable(#[from] StoreError),
}

/// Header row written when a backend has to create the table itself.
pub fn header_row(columns: &ColumnLayout) -> Vec<Cell> {
    let mut header = vec![Cell::empty(); columns.width() as usize];
    let titles = [
        (columns.user_id, "User ID"),
        (columns.display_name, "Display Name"),
        (columns.email, "Email"),
        (columns.spreadsheet_id, "Spreadsheet ID"),
        (columns.is_enabled, "Is Enabled"),
        (columns.is_admin, "Is Admin"),
        (columns.last_notified, "Last Notified"),
    ];
    for (column, title) in titles {
        if let Some(cell) = column.checked_sub(1).and_then(|i| header.get_mut(i as usize)) {
            *cell = Cell::from(title);
        }
    }
    header
}

fn data_rows(table: Vec<Vec<Cell>>) -> Vec<(RowLocation, Vec<Cell>)> {
    table
        .into_iter()
        .enumerate()
        .skip(1)
        .map(|(index, cells)| (RowLocation(index as u32 + 1), cells))
        .collect()
}

pub struct UserRegistry {
    store: Arc<dyn RowStore>,
    columns: ColumnLayout,
}

impl UserRegistry {
    pub fn new(store: Arc<dyn RowStore>, columns: ColumnLayout) -> Self {
        Self { store, columns }
    }

    /// Every row of the table, header included.
    async fn read(&self) -> Result<Vec<Vec<Cell>>, RegistryError> {
        self.store.rows().await.map_err(|e| {
            tracing::error!("Error reading user table ({}): {}", self.store.kind(), e);
            RegistryError::Unavailable(e)
        })
    }

    /// Data rows with their 1-based locations, header skipped.
    async fn scan(&self) -> Result<Vec<(RowLocation, Vec<Cell>)>, RegistryError> {
        Ok(data_rows(self.read().await?))
    }

    async fn append(&self, cells: Vec<Cell>, what: &str) -> Result<(), RegistryError> {
        self.store.append_row(cells).await.map_err(|e| {
            tracing::error!("Error appending {}: {}", what, e);
            RegistryError::Unavailable(e)
        })
    }

    fn cell<'a>(&self, cells: &'a [Cell], column: u32) -> Option<&'a Cell> {
        column.checked_sub(1).and_then(|i| cells.get(i as usize))
    }

    fn text(&self, cells: &[Cell], column: u32) -> String {
        self.cell(cells, column).map(Cell::to_text).unwrap_or_default()
    }

    fn flag(&self, cells: &[Cell], column: u32) -> bool {
        self.cell(cells, column).is_some_and(Cell::is_true)
    }

    fn matches(&self, cells: &[Cell], user_id: &str) -> bool {
        self.cell(cells, self.columns.user_id)
            .is_some_and(|c| c.to_text() == user_id)
    }

    fn to_record(&self, row: RowLocation, cells: &[Cell]) -> UserRecord {
        let last_notified = self.text(cells, self.columns.last_notified);
        UserRecord {
            row,
            user_id: self.text(cells, self.columns.user_id),
            display_name: self.text(cells, self.columns.display_name),
            email: self.text(cells, self.columns.email),
            spreadsheet_id: self.text(cells, self.columns.spreadsheet_id),
            is_enabled: self.flag(cells, self.columns.is_enabled),
            is_admin: self.flag(cells, self.columns.is_admin),
            last_notified: (!last_notified.is_empty()).then_some(last_notified),
        }
    }

    fn column_of(&self, field: UserField) -> u32 {
        match field {
            UserField::SpreadsheetId => self.columns.spreadsheet_id,
            UserField::IsEnabled => self.columns.is_enabled,
        }
    }

    async fn find_record(&self, user_id: &str) -> Result<Option<UserRecord>, RegistryError> {
        Ok(self
            .scan()
            .await?
            .into_iter()
            .find(|(_, cells)| self.matches(cells, user_id))
            .map(|(row, cells)| self.to_record(row, &cells)))
    }

    /// Location of the first row whose user id equals `user_id` exactly.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<RowLocation>, RegistryError> {
        Ok(self.find_record(user_id).await?.map(|record| record.row))
    }

    /// Return the caller's record, appending a fresh one on first contact.
    pub async fn get_or_create(&self, user: &UserRef) -> Result<UserRecord, RegistryError> {
        let table = self.read().await?;
        let table_len = table.len();
        let rows = data_rows(table);

        if let Some((row, cells)) = rows.iter().find(|(_, cells)| self.matches(cells, &user.id)) {
            return Ok(self.to_record(*row, cells));
        }

        // A blank table has no header yet; the first append would land on
        // row 1 and be skipped by every later scan.
        if table_len == 0 {
            self.append(header_row(&self.columns), "header row").await?;
            tracing::info!("Wrote header row to empty user table ({})", self.store.kind());
        }

        // Header plus every data row precede the new one.
        let row = RowLocation(table_len.max(1) as u32 + 1);
        let record = UserRecord {
            row,
            user_id: user.id.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            spreadsheet_id: String::new(),
            is_enabled: false,
            is_admin: false,
            last_notified: None,
        };

        let mut cells = vec![Cell::empty(); self.columns.width() as usize];
        let values = [
            (self.columns.user_id, Cell::from(record.user_id.as_str())),
            (self.columns.display_name, Cell::from(record.display_name.as_str())),
            (self.columns.email, Cell::from(record.email.as_str())),
            (self.columns.spreadsheet_id, Cell::empty()),
            (self.columns.is_enabled, Cell::Bool(false)),
            (self.columns.is_admin, Cell::Bool(false)),
            (self.columns.last_notified, Cell::empty()),
        ];
        for (column, value) in values {
            if let Some(cell) = column.checked_sub(1).and_then(|i| cells.get_mut(i as usize)) {
                *cell = value;
            }
        }

        self.append(cells, &format!("user {}", user.id)).await?;

        tracing::info!("Created new user: {} ({}) at {}", user.id, user.display_name, row);
        Ok(record)
    }

    /// Write one field of the record at `row`. No existence check is made.
    pub async fn update_field(
        &self,
        row: RowLocation,
        field: UserField,
        value: impl Into<Cell>,
    ) -> Result<(), RegistryError> {
        let column = self.column_of(field);
        self.store
            .write_cell(row.0, column, value.into())
            .await
            .map_err(|e| {
                tracing::error!("Error writing {} at {}: {}", field, row, e);
                RegistryError::Unavailable(e)
            })?;

        tracing::debug!("Updated {} at {}", field, row);
        Ok(())
    }

    /// Every record whose consent flag is set, in table order.
    pub async fn list_enabled(&self) -> Result<Vec<EnabledUser>, RegistryError> {
        Ok(self
            .scan()
            .await?
            .into_iter()
            .filter(|(_, cells)| self.flag(cells, self.columns.is_enabled))
            .map(|(row, cells)| EnabledUser {
                row,
                user_id: self.text(&cells, self.columns.user_id),
                display_name: self.text(&cells, self.columns.display_name),
                email: self.text(&cells, self.columns.email),
                spreadsheet_id: self.text(&cells, self.columns.spreadsheet_id),
            })
            .collect())
    }

    /// Whether `user_id` carries the admin flag. Unknown users are not admins.
    pub async fn is_admin(&self, user_id: &str) -> Result<bool, RegistryError> {
        Ok(self
            .find_record(user_id)
            .await?
            .is_some_and(|record| record.is_admin))
    }
}
