use std::path::Path;

use super::base::{harmonize, CategoryProcessor, ProcessReport};
use crate::constants;
use crate::error::Result;
use crate::pipeline::fields::{
    normalize_datetime, normalize_numeric, normalize_patient_id, normalize_percentage,
    normalize_temperature, VITALS_PRECISION,
};
use crate::pipeline::processing::columns::{ColumnIndex, ColumnSpec, PATIENT_ID};
use crate::pipeline::processing::dataset::{CsvStore, Row};

const DATETIME: ColumnSpec = ColumnSpec::required(
    "datetime",
    &["datetime", "date_time", "timestamp", "recorded_at", "measurement_time", "date"],
);
const SYSTOLIC: ColumnSpec =
    ColumnSpec::optional("systolic", &["systolic", "bp_systolic", "sbp", "systolic_bp"]);
const DIASTOLIC: ColumnSpec =
    ColumnSpec::optional("diastolic", &["diastolic", "bp_diastolic", "dbp", "diastolic_bp"]);
const HEART_RATE: ColumnSpec = ColumnSpec::optional("heart_rate", &["heart_rate", "hr", "pulse"]);
const TEMPERATURE: ColumnSpec =
    ColumnSpec::optional("temperature", &["temperature", "temp", "body_temperature"]);
const RESPIRATORY_RATE: ColumnSpec =
    ColumnSpec::optional("respiratory_rate", &["respiratory_rate", "resp_rate", "rr"]);
const OXYGEN_SATURATION: ColumnSpec = ColumnSpec::optional(
    "oxygen_saturation",
    &["oxygen_saturation", "o2_sat", "spo2", "oxygen_sat"],
);

fn one_decimal(raw: &str) -> String {
    normalize_numeric(raw, VITALS_PRECISION)
}

struct VitalsColumns {
    patient_id: ColumnIndex,
    datetime: ColumnIndex,
    systolic: ColumnIndex,
    diastolic: ColumnIndex,
    heart_rate: ColumnIndex,
    temperature: ColumnIndex,
    respiratory_rate: ColumnIndex,
    oxygen_saturation: ColumnIndex,
}

impl VitalsColumns {
    fn resolve(header: &[String]) -> Result<Self> {
        Ok(Self {
            patient_id: PATIENT_ID.resolve(header)?,
            datetime: DATETIME.resolve(header)?,
            systolic: SYSTOLIC.resolve(header)?,
            diastolic: DIASTOLIC.resolve(header)?,
            heart_rate: HEART_RATE.resolve(header)?,
            temperature: TEMPERATURE.resolve(header)?,
            respiratory_rate: RESPIRATORY_RATE.resolve(header)?,
            oxygen_saturation: OXYGEN_SATURATION.resolve(header)?,
        })
    }

    fn normalize(&self, row: &mut Row) {
        self.patient_id.apply(row, normalize_patient_id);
        self.datetime.apply(row, normalize_datetime);
        self.systolic.apply(row, one_decimal);
        self.diastolic.apply(row, one_decimal);
        self.heart_rate.apply(row, one_decimal);
        self.temperature.apply(row, normalize_temperature);
        self.respiratory_rate.apply(row, one_decimal);
        self.oxygen_saturation.apply(row, normalize_percentage);
    }
}

/// Vital signs: timestamps, blood pressure, rates, temperature, SpO2.
pub struct VitalsProcessor {
    store: CsvStore,
}

impl VitalsProcessor {
    pub fn new(store: CsvStore) -> Self {
        Self { store }
    }
}

impl Default for VitalsProcessor {
    fn default() -> Self {
        Self::new(CsvStore::new())
    }
}

impl CategoryProcessor for VitalsProcessor {
    fn process(&self, input: &Path, output: &Path) -> Result<ProcessReport> {
        harmonize(
            &self.store,
            self.category(),
            input,
            output,
            VitalsColumns::resolve,
            VitalsColumns::normalize,
        )
    }

    fn category(&self) -> &str {
        constants::VITALS
    }

    fn name(&self) -> &str {
        "Vital Signs Processor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonizerError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn normalizes_vitals_row() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("vitals.csv");
        let output = dir.path().join("vitals_out.csv");
        fs::write(
            &input,
            "MRN,Timestamp,SBP,DBP,Pulse,Temp,RR,SpO2\n\
             55,04/01/2023 08:30:00,120 mmHg,80,72,98.6,16,0.97\n",
        )
        .unwrap();

        VitalsProcessor::default().process(&input, &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "mrn,timestamp,sbp,dbp,pulse,temp,rr,spo2"
        );
        assert_eq!(
            lines.next().unwrap(),
            "PT-55,2023-04-01T08:30:00,120.0,80.0,72.0,37.0,16.0,97.0"
        );
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("vitals.csv");
        let output = dir.path().join("vitals_out.csv");
        fs::write(&input, "patient_id,date,heart_rate\n1,2023-01-02,88\n").unwrap();

        VitalsProcessor::default().process(&input, &output).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("PT-1,2023-01-02T00:00:00,88.0\n"));
    }

    #[test]
    fn missing_datetime_is_routing_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("vitals.csv");
        fs::write(&input, "patient_id,heart_rate\n1,88\n").unwrap();

        let err = VitalsProcessor::default()
            .process(&input, &dir.path().join("out.csv"))
            .unwrap_err();
        assert!(matches!(err, HarmonizerError::ColumnNotFound(ref c) if c == "datetime"));
    }
}
