use std::fs;
use std::path::Path;

use crate::error::{HarmonizerError, Result};

/// One delimited-text record: ordered field values.
pub type Row = Vec<String>;

/// A header row plus data rows, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub header: Row,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Split raw rows into header and data. Fewer than two rows means there
    /// is nothing to normalize.
    pub fn from_rows(mut rows: Vec<Row>, label: &str) -> Result<Self> {
        if rows.len() < 2 {
            return Err(HarmonizerError::EmptyDataset(label.to_string()));
        }
        let header = rows.remove(0);
        Ok(Self { header, rows })
    }

    pub fn standardize_header(&mut self) {
        self.header = standardize_header(&self.header);
    }

    /// Rows with fewer fields than the header.
    pub fn short_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.len() < self.header.len())
            .count()
    }

    pub fn into_rows(self) -> Vec<Row> {
        let mut all = Vec::with_capacity(self.rows.len() + 1);
        all.push(self.header);
        all.extend(self.rows);
        all
    }
}

/// Lowercase, trim, and replace spaces with underscores.
pub fn standardize_header(header: &[String]) -> Row {
    header
        .iter()
        .map(|h| h.trim().to_lowercase().replace(' ', "_"))
        .collect()
}

/// Reads and writes delimited text. Shared by every category processor.
#[derive(Debug, Clone, Copy)]
pub struct CsvStore {
    delimiter: u8,
}

impl Default for CsvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvStore {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read every record, header included. Short rows are kept as-is.
    pub fn read_rows(&self, path: &Path) -> Result<Vec<Row>> {
        let read_err = |source: csv::Error| HarmonizerError::Read {
            path: path.display().to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(read_err)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    /// Write all rows, creating parent directories as needed.
    pub fn write_rows(&self, path: &Path, rows: &[Row]) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| HarmonizerError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;
        }

        let write_err = |source: csv::Error| HarmonizerError::Write {
            path: path.display().to_string(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(write_err)?;
        for row in rows {
            writer.write_record(row).map_err(write_err)?;
        }
        writer.flush().map_err(|e| write_err(csv::Error::from(e)))?;
        Ok(())
    }

    pub fn load(&self, path: &Path, label: &str) -> Result<Dataset> {
        Dataset::from_rows(self.read_rows(path)?, label)
    }

    pub fn save(&self, path: &Path, dataset: Dataset) -> Result<()> {
        self.write_rows(path, &dataset.into_rows())
    }
}
