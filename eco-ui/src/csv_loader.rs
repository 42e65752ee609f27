//! CSV loader for expense rows.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter. Header
//! names are case-sensitive.
//!
//! | Column     | Required | Notes                                                   |
//! |------------|----------|---------------------------------------------------------|
//! | `category` | yes      | Empty cells are reported as "Other"                     |
//! | `amount`   | yes      | Coerced like form input: `"12.50 pesos"` is `12.50`, junk is `0` |
//! | `tag`      | no       | `sustainable`, `unsustainable` or `neutral`; anything else is neutral |
//!
//! ### Example
//!
//! ```csv
//! category,amount,tag
//! Groceries,200,sustainable
//! Gas,300,unsustainable
//! Rent,400
//! ```
use std::path::Path;

use eco_core::ExpenseEntry;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    category: String,
    amount: String,
    #[serde(default)]
    tag: Option<String>,
}

impl From<CsvRow> for ExpenseEntry {
    fn from(row: CsvRow) -> Self {
        ExpenseEntry::from_input(&row.category, &row.amount, row.tag.as_deref().unwrap_or(""))
    }
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, etc.). `row` is the 1-based data row when known.
    #[error("CSV parse error on row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parse CSV text and return the expense entries in file order.
///
/// Values never fail to convert; only structural problems are errors.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] – the CSV is structurally invalid or a
///   required column is missing.
pub fn load_from_str(input: &str) -> Result<Vec<ExpenseEntry>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let entries = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            result
                .map(ExpenseEntry::from)
                .map_err(|source| CsvLoadError::Parse {
                    row: idx + 1,
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(rows = entries.len(), "loaded expense rows from CSV");
    Ok(entries)
}

/// Read a file from disk and delegate to [`load_from_str`].
///
/// # Errors
///
/// [`CsvLoadError::Io`] when the file cannot be read, otherwise whatever
/// [`load_from_str`] reports.
pub fn load_from_file(path: &Path) -> Result<Vec<ExpenseEntry>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
