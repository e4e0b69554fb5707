use thiserror::Error;

/// Reasons a spreadsheet could not be turned into a post table.
///
/// Both variants end the current load attempt; the session keeps running and
/// the message is shown in the status line.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A required column is absent from the header row.
    #[error("'{0}' column not found. Please ensure your file has this column.")]
    MissingColumn(&'static str),

    /// Unreadable file, wrong format, missing sheet, I/O failure.
    #[error("Error loading data: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

/// A single cell in a typed column that could not be converted.
///
/// Never aborts a load: the cell becomes missing and the failure is counted.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}, column '{column}': cannot read '{value}'")]
pub struct CellParseError {
    pub column: &'static str,
    pub row: usize,
    pub value: String,
}
