//! Header-addressed reading and BOM-prefixed writing shared by every sheet.

use std::collections::HashMap;

use csv::StringRecord;

use crate::error::{ExportError, ImportError, RowError};

/// UTF-8 byte order mark; spreadsheet programs need it to detect the encoding.
pub const BOM: &str = "\u{feff}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Prefix the output with a UTF-8 BOM.
    pub bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { bom: true }
    }
}

/// Column positions by trimmed header name.
#[derive(Debug, Clone)]
pub(crate) struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, required: &[&str]) -> Result<Self, ImportError> {
        let mut index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            index.entry(name.trim().to_string()).or_insert(i);
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|name| !index.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }
        Ok(Self { index })
    }

    /// Trimmed cell value; empty when the column or cell is absent.
    pub(crate) fn value<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|i| record.get(*i))
            .map_or("", str::trim)
    }

    pub(crate) fn optional(&self, record: &StringRecord, name: &str) -> Option<String> {
        let value = self.value(record, name);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub(crate) fn required(
        &self,
        record: &StringRecord,
        name: &str,
        row: usize,
    ) -> Result<String, RowError> {
        self.optional(record, name)
            .ok_or_else(|| RowError::new(row, format!("{name} is required")))
    }
}

/// Parse `input` and return its columns plus numbered data rows.
///
/// Rows whose cells are all blank are skipped but still counted, so row
/// numbers match what the user sees in a spreadsheet.
pub(crate) fn read_rows(
    input: &str,
    required: &[&str],
) -> Result<(Columns, Vec<(usize, StringRecord)>), ImportError> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::MissingHeader);
    }
    let columns = Columns::resolve(&headers, required)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push((i + 1, record));
    }
    Ok((columns, rows))
}

/// Serialize a header row plus data rows.
pub(crate) fn write_rows<I, R>(
    headers: &[&str],
    rows: I,
    options: ExportOptions,
) -> Result<String, ExportError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut out = Vec::new();
    if options.bom {
        out.extend_from_slice(BOM.as_bytes());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let out = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(out)?)
}

/// Log the outcome of an import and pass it through.
pub(crate) fn logged<T>(sheet: &str, result: Result<Vec<T>, ImportError>) -> Result<Vec<T>, ImportError> {
    match &result {
        Ok(items) => tracing::info!(sheet, count = items.len(), "import completed"),
        Err(err) => tracing::warn!(sheet, error = %err, "import aborted"),
    }
    result
}
