use std::path::Path;

use super::base::{harmonize, CategoryProcessor, ProcessReport};
use crate::constants;
use crate::error::Result;
use crate::pipeline::fields::dates::looks_like_date_column;
use crate::pipeline::fields::identifier::looks_like_patient_id_column;
use crate::pipeline::fields::{normalize_date, normalize_patient_id};
use crate::pipeline::processing::columns::ColumnIndex;
use crate::pipeline::processing::dataset::{CsvStore, Row};

/// Columns picked out of an arbitrary header by name heuristics.
struct GenericColumns {
    patient_id: ColumnIndex,
    dates: Vec<usize>,
}

impl GenericColumns {
    fn resolve(header: &[String]) -> Result<Self> {
        let patient_id = header
            .iter()
            .position(|h| looks_like_patient_id_column(h))
            .map(ColumnIndex::at)
            .unwrap_or(ColumnIndex::ABSENT);

        let dates = header
            .iter()
            .enumerate()
            .filter(|(_, h)| looks_like_date_column(h))
            .map(|(i, _)| i)
            .collect();

        Ok(Self { patient_id, dates })
    }

    fn normalize(&self, row: &mut Row) {
        self.patient_id.apply(row, normalize_patient_id);
        for &idx in &self.dates {
            ColumnIndex::at(idx).apply(row, normalize_date);
        }
    }
}

/// Fallback for datasets that fit no specific category. Nothing is
/// required; only identifier-like and date-like columns are touched.
pub struct GenericProcessor {
    store: CsvStore,
}

impl GenericProcessor {
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }
}

impl Default for GenericProcessor {
    fn default() -> Self {
        Self::new(CsvStore::new())
    }
}

impl CategoryProcessor for GenericProcessor {
    fn process(&self, input: &Path, output: &Path) -> Result<ProcessReport> {
        harmonize(
            &self.store,
            self.category(),
            input,
            output,
            GenericColumns::resolve,
            GenericColumns::normalize,
        )
    }

    fn category(&self) -> &str {
        constants::GENERIC
    }

    fn name(&self) -> &str {
        "Generic Processor"
    }
}
