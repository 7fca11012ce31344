use std::path::Path;

use super::base::{harmonize, CategoryProcessor, ProcessReport};
use crate::constants;
use crate::error::Result;
use crate::pipeline::fields::{
    normalize_abnormal_flag, normalize_date, normalize_patient_id, normalize_reference_range,
    normalize_result_value, normalize_test_name, normalize_units,
};
use crate::pipeline::processing::columns::{ColumnIndex, ColumnSpec, PATIENT_ID};
use crate::pipeline::processing::dataset::{CsvStore, Row};

const TEST_NAME: ColumnSpec = ColumnSpec::required(
    "test_name",
    &["test_name", "lab_test", "test", "procedure_name", "component"],
);
const TEST_DATE: ColumnSpec = ColumnSpec::optional(
    "test_date",
    &["test_date", "date", "collection_date", "result_date", "date_performed"],
);
const RESULT_VALUE: ColumnSpec = ColumnSpec::optional(
    "result_value",
    &["result_value", "value", "result", "numeric_result", "observation_value"],
);
const UNITS: ColumnSpec =
    ColumnSpec::optional("units", &["units", "unit", "unit_of_measure", "uom"]);
const REFERENCE_RANGE: ColumnSpec = ColumnSpec::optional(
    "reference_range",
    &["reference_range", "ref_range", "normal_range", "normal_values", "reference_interval"],
);
const ABNORMAL_FLAG: ColumnSpec = ColumnSpec::optional(
    "abnormal_flag",
    &["abnormal_flag", "flag", "abnormal", "result_flag", "status"],
);

struct LabColumns {
    patient_id: ColumnIndex,
    test_name: ColumnIndex,
    test_date: ColumnIndex,
    result_value: ColumnIndex,
    units: ColumnIndex,
    reference_range: ColumnIndex,
    abnormal_flag: ColumnIndex,
}

impl LabColumns {
    fn resolve(header: &[String]) -> Result<Self> {
        Ok(Self {
            patient_id: PATIENT_ID.resolve(header)?,
            test_name: TEST_NAME.resolve(header)?,
            test_date: TEST_DATE.resolve(header)?,
            result_value: RESULT_VALUE.resolve(header)?,
            units: UNITS.resolve(header)?,
            reference_range: REFERENCE_RANGE.resolve(header)?,
            abnormal_flag: ABNORMAL_FLAG.resolve(header)?,
        })
    }

    fn normalize(&self, row: &mut Row) {
        self.patient_id.apply(row, normalize_patient_id);
        self.test_name.apply(row, normalize_test_name);
        self.test_date.apply(row, normalize_date);

        // Value precision depends on the unit as written, so the value goes
        // before the unit is rewritten. Rows without a unit keep their value.
        if let Some(unit) = self.units.value(row).map(str::to_string) {
            self.result_value
                .apply(row, |value| normalize_result_value(value, &unit));
        }

        self.units.apply(row, normalize_units);
        self.reference_range.apply(row, normalize_reference_range);
        self.abnormal_flag.apply(row, normalize_abnormal_flag);
    }
}

/// Laboratory results: test names, values, units, ranges, flags.
pub struct LabResultsProcessor {
    store: CsvStore,
}

impl LabResultsProcessor {
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }
}

impl Default for LabResultsProcessor {
    fn default() -> Self {
        Self::new(CsvStore::new())
    }
}

impl CategoryProcessor for LabResultsProcessor {
    fn process(&self, input: &Path, output: &Path) -> Result<ProcessReport> {
        harmonize(
            &self.store,
            self.category(),
            input,
            output,
            LabColumns::resolve,
            LabColumns::normalize,
        )
    }

    fn category(&self) -> &str {
        constants::LAB_RESULTS
    }

    fn name(&self) -> &str {
        "Lab Results Processor"
    }
}
