//! Import/export error model.

use thiserror::Error;

/// A data row that failed validation. `row` is 1-based and does not count
/// the header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {message}")]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

/// Why an import was aborted. Nothing is imported when this is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("the file has no header row")]
    MissingHeader,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ImportError {
    /// Names of the missing columns, if that is why the import failed.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            ImportError::MissingColumns(cols) => cols,
            _ => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_are_named() {
        let err = ImportError::MissingColumns(vec!["Matricola".to_string(), "Gruppo".to_string()]);
        assert_eq!(err.to_string(), "missing required columns: Matricola, Gruppo");
        assert_eq!(err.missing_columns().len(), 2);
    }

    #[test]
    fn row_errors_carry_their_number() {
        let err: ImportError = RowError::new(3, "invalid birth date").into();
        assert_eq!(err.to_string(), "row 3: invalid birth date");
    }
}
