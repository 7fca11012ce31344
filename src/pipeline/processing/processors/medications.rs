use std::path::Path;

use super::base::{harmonize, CategoryProcessor, ProcessReport};
use crate::constants;
use crate::error::Result;
use crate::pipeline::fields::{
    normalize_date, normalize_dosage, normalize_frequency, normalize_medication_name,
    normalize_patient_id, normalize_route,
};
use crate::pipeline::processing::columns::{ColumnIndex, ColumnSpec, PATIENT_ID};
use crate::pipeline::processing::dataset::{CsvStore, Row};

const MEDICATION_NAME: ColumnSpec = ColumnSpec::required(
    "medication_name",
    &["medication_name", "drug_name", "medication", "drug", "med_name"],
);
const PRESCRIBED_DATE: ColumnSpec = ColumnSpec::optional(
    "prescribed_date",
    &["prescribed_date", "date_prescribed", "order_date", "start_date"],
);
const DOSAGE: ColumnSpec = ColumnSpec::optional("dosage", &["dosage", "dose", "strength", "amount"]);
const FREQUENCY: ColumnSpec = ColumnSpec::optional(
    "frequency",
    &["frequency", "freq", "schedule", "sig", "instructions"],
);
const ROUTE: ColumnSpec = ColumnSpec::optional(
    "route",
    &["route", "administration_route", "route_of_administration"],
);

struct MedicationColumns {
    patient_id: ColumnIndex,
    medication_name: ColumnIndex,
    prescribed_date: ColumnIndex,
    dosage: ColumnIndex,
    frequency: ColumnIndex,
    route: ColumnIndex,
}

impl MedicationColumns {
    fn resolve(header: &[String]) -> Result<Self> {
        Ok(Self {
            patient_id: PATIENT_ID.resolve(header)?,
            medication_name: MEDICATION_NAME.resolve(header)?,
            prescribed_date: PRESCRIBED_DATE.resolve(header)?,
            dosage: DOSAGE.resolve(header)?,
            frequency: FREQUENCY.resolve(header)?,
            route: ROUTE.resolve(header)?,
        })
    }

    fn normalize(&self, row: &mut Row) {
        self.patient_id.apply(row, normalize_patient_id);
        self.medication_name.apply(row, normalize_medication_name);
        self.prescribed_date.apply(row, normalize_date);
        self.dosage.apply(row, normalize_dosage);
        self.frequency.apply(row, normalize_frequency);
        self.route.apply(row, normalize_route);
    }
}

/// Medication orders: drug names, dosages, schedules, routes.
pub struct MedicationsProcessor {
    store: CsvStore,
}

impl MedicationsProcessor {
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }
}

impl Default for MedicationsProcessor {
    fn default() -> Self {
        Self::new(CsvStore::new())
    }
}

impl CategoryProcessor for MedicationsProcessor {
    fn process(&self, input: &Path, output: &Path) -> Result<ProcessReport> {
        harmonize(
            &self.store,
            self.category(),
            input,
            output,
            MedicationColumns::resolve,
            MedicationColumns::normalize,
        )
    }

    fn category(&self) -> &str {
        constants::MEDICATIONS
    }

    fn name(&self) -> &str {
        "Medications Processor"
    }
}
