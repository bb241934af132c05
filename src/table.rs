use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;

use crate::error::InteractomeError;

/// A source dump held fully in memory: header row plus raw records.
///
/// Fields are kept verbatim; adapters interpret them through [`cell`].
#[derive(Debug, Clone)]
pub struct RawTable {
    name: String,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RawTable {
    /// Reads a tab-separated dump. Files ending in `.gz` are decompressed on the fly.
    pub fn read_tsv(path: &Path, name: &str) -> Result<Self, InteractomeError> {
        Self::read_delimited(path, name, b'\t')
    }

    pub fn read_delimited(path: &Path, name: &str, delimiter: u8) -> Result<Self, InteractomeError> {
        let reader = open_maybe_gz(path)?;
        Self::from_reader(reader, name, delimiter).map_err(|err| match err {
            InteractomeError::TableRead { message, .. } => InteractomeError::TableRead {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_reader<R: Read>(
        reader: R,
        name: &str,
        delimiter: u8,
    ) -> Result<Self, InteractomeError> {
        // MITAB fields embed bare quotes (psi-mi:"MI:0326"), so quoting stays off for tabs.
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .quoting(delimiter != b'\t')
            .flexible(true)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|err| read_error(name, err))?
            .clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| read_error(name, err))?;
        tracing::debug!(table = name, rows = rows.len(), "table loaded");
        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &StringRecord> {
        self.rows.iter()
    }

    /// Index of a named column; a missing column is fatal for the source.
    pub fn column(&self, header: &str) -> Result<usize, InteractomeError> {
        self.headers
            .iter()
            .position(|value| value.trim().trim_start_matches('#') == header)
            .ok_or_else(|| InteractomeError::MissingColumn {
                table: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// Verifies a positional layout has at least `width` columns.
    pub fn require_width(&self, width: usize) -> Result<(), InteractomeError> {
        if self.headers.len() < width {
            return Err(InteractomeError::MissingColumn {
                table: self.name.clone(),
                column: format!("#{width}"),
            });
        }
        Ok(())
    }
}

/// A cell value, treating blank cells and the `-` placeholder as absent.
pub fn cell(row: &StringRecord, index: usize) -> Option<&str> {
    row.get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "-")
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InteractomeError> {
    let file = File::open(path).map_err(|err| InteractomeError::TableRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let is_gz = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if is_gz {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn read_error(name: &str, err: csv::Error) -> InteractomeError {
    InteractomeError::TableRead {
        path: name.into(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reads_mitab_with_bare_quotes() {
        let data = "#ID(s) interactor A\tID(s) interactor B\tInteraction detection method(s)\n\
                    uniprotkb:P1\tuniprotkb:P2\tpsi-mi:\"MI:0018\"(two hybrid)\n";
        let table = RawTable::from_reader(data.as_bytes(), "mitab", b'\t').unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.column("ID(s) interactor A").unwrap(), 0);
        let row = table.rows().next().unwrap();
        assert_eq!(cell(row, 2), Some("psi-mi:\"MI:0018\"(two hybrid)"));
    }

    #[test]
    fn missing_column_is_reported() {
        let table = RawTable::from_reader("A\tB\n".as_bytes(), "imex", b'\t').unwrap();
        let err = table.column("provider").unwrap_err();
        assert_matches!(err, InteractomeError::MissingColumn { column, .. } if column == "provider");
        assert_matches!(table.require_width(15), Err(InteractomeError::MissingColumn { .. }));
    }

    #[test]
    fn placeholder_cells_are_absent() {
        let table = RawTable::from_reader("A\tB\tC\n-\t \tx\n".as_bytes(), "t", b'\t').unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(cell(row, 0), None);
        assert_eq!(cell(row, 1), None);
        assert_eq!(cell(row, 2), Some("x"));
        assert_eq!(cell(row, 3), None);
    }
}
