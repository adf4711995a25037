//! Generic key-row store underneath the user registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single cell value as stored by the spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Text(s) if s.is_empty())
    }

    /// Truthy only for boolean `true` or the string `"TRUE"`.
    pub fn is_true(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Text(s) => s == "TRUE",
            Cell::Number(_) => false,
        }
    }

    /// The cell rendered as text, the way the sheet would display it.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::empty()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Table unavailable: {0}")]
    Unavailable(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Two-dimensional table addressed by 1-based row and column numbers.
///
/// Row 1 is the header row. Rows are only ever appended, never removed.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Short backend name for logs (e.g. "sheets", "sqlite").
    fn kind(&self) -> &'static str;

    /// Read every row, header included, in table order.
    async fn rows(&self) -> Result<Vec<Vec<Cell>>, StoreError>;

    /// Append a row after the last one.
    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError>;

    /// Overwrite a single cell.
    async fn write_cell(&self, row: u32, column: u32, value: Cell) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_true() {
        assert!(Cell::Bool(true).is_true());
        assert!(Cell::from("TRUE").is_true());
        assert!(!Cell::Bool(false).is_true());
        assert!(!Cell::from("true").is_true());
        assert!(!Cell::from("FALSE").is_true());
        assert!(!Cell::empty().is_true());
        assert!(!Cell::Number(1.0).is_true());
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Cell::Bool(true).to_text(), "TRUE");
        assert_eq!(Cell::Number(42.0).to_text(), "42");
        assert_eq!(Cell::from("abc").to_text(), "abc");
    }

    #[test]
    fn test_untagged_deserialize() {
        let cells: Vec<Cell> = serde_json::from_str(r#"["users/1", true, 3, ""]"#).unwrap();
        assert_eq!(cells[0], Cell::from("users/1"));
        assert_eq!(cells[1], Cell::Bool(true));
        assert_eq!(cells[2], Cell::Number(3.0));
        assert!(cells[3].is_empty());
    }
}
