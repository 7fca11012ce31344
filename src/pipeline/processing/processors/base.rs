use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::processing::dataset::{CsvStore, Row};

/// Summary of one processed dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Rows with fewer fields than the header
    pub short_rows: usize,
}

/// Base trait for category-specific processors
pub trait CategoryProcessor: Send + Sync {
    /// Normalize the dataset at `input` and write it to `output`
    fn process(&self, input: &Path, output: &Path) -> Result<ProcessReport>;

    /// Get the category label this processor handles
    fn category(&self) -> &str;

    /// Get a human-readable name for this processor
    fn name(&self) -> &str;
}

/// The read → standardize header → resolve columns → normalize rows → write
/// sequence every tabular processor shares.
///
/// `resolve` turns the standardized header into the processor's column
/// layout (failing on missing required columns); `normalize` rewrites one
/// data row in place using that layout.
pub(crate) fn harmonize<C, R, N>(
    store: &CsvStore,
    label: &str,
    input: &Path,
    output: &Path,
    resolve: R,
    normalize: N,
) -> Result<ProcessReport>
where
    R: FnOnce(&[String]) -> Result<C>,
    N: Fn(&C, &mut Row),
{
    let mut dataset = store.load(input, label)?;
    dataset.standardize_header();
    let columns = resolve(dataset.header.as_slice())?;

    for row in dataset.rows.iter_mut() {
        normalize(&columns, row);
    }

    let report = ProcessReport {
        rows: dataset.rows.len(),
        short_rows: dataset.short_rows(),
    };
    store.save(output, dataset)?;

    debug!(
        category = label,
        rows = report.rows,
        short_rows = report.short_rows,
        output = %output.display(),
        "Dataset harmonized"
    );
    Ok(report)
}
