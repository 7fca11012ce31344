use std::path::Path;

use super::base::{harmonize, CategoryProcessor, ProcessReport};
use crate::constants;
use crate::error::Result;
use crate::pipeline::fields::{normalize_date, normalize_gender, normalize_patient_id};
use crate::pipeline::processing::columns::{ColumnIndex, ColumnSpec, PATIENT_ID};
use crate::pipeline::processing::dataset::{CsvStore, Row};

const DATE_OF_BIRTH: ColumnSpec = ColumnSpec::required(
    "date_of_birth",
    &["date_of_birth", "dob", "birth_date", "birthdate"],
);
const GENDER: ColumnSpec = ColumnSpec::required("gender", &["gender", "sex"]);

struct PatientColumns {
    patient_id: ColumnIndex,
    date_of_birth: ColumnIndex,
    gender: ColumnIndex,
}

impl PatientColumns {
    fn resolve(header: &[String]) -> Result<Self> {
        Ok(Self {
            patient_id: PATIENT_ID.resolve(header)?,
            date_of_birth: DATE_OF_BIRTH.resolve(header)?,
            gender: GENDER.resolve(header)?,
        })
    }

    fn normalize(&self, row: &mut Row) {
        self.patient_id.apply(row, normalize_patient_id);
        self.date_of_birth.apply(row, normalize_date);
        self.gender.apply(row, normalize_gender);
    }
}

/// Patient demographics: identifiers, birth dates, gender.
pub struct PatientProcessor {
    store: CsvStore,
}

impl PatientProcessor {
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }
}

impl Default for PatientProcessor {
    fn default() -> Self {
        Self::new(CsvStore::new())
    }
}

impl CategoryProcessor for PatientProcessor {
    fn process(&self, input: &Path, output: &Path) -> Result<ProcessReport> {
        harmonize(
            &self.store,
            self.category(),
            input,
            output,
            PatientColumns::resolve,
            PatientColumns::normalize,
        )
    }

    fn category(&self) -> &str {
        constants::PATIENTS
    }

    fn name(&self) -> &str {
        "Patient Demographics Processor"
    }
}
