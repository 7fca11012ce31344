//! Closed vocabularies for enumerated fields.
//!
//! Every table lists its canonical labels alongside the raw spellings, so a
//! value that is already canonical maps to itself. Substring matching walks
//! the table in order, which is why full words precede the short
//! abbreviations they contain.

use super::text::title_case;

type Table = &'static [(&'static str, &'static str)];

const FREQUENCIES: Table = &[
    ("once daily", "once daily"),
    ("twice daily", "twice daily"),
    ("three times daily", "three times daily"),
    ("four times daily", "four times daily"),
    ("every 4 hours", "every 4 hours"),
    ("every 6 hours", "every 6 hours"),
    ("every 8 hours", "every 8 hours"),
    ("every 12 hours", "every 12 hours"),
    ("once weekly", "once weekly"),
    ("as needed", "as needed"),
    ("q12h", "every 12 hours"),
    ("q4h", "every 4 hours"),
    ("q6h", "every 6 hours"),
    ("q8h", "every 8 hours"),
    ("bid", "twice daily"),
    ("tid", "three times daily"),
    ("qid", "four times daily"),
    ("prn", "as needed"),
    ("weekly", "once weekly"),
    ("daily", "once daily"),
    ("qd", "once daily"),
    ("od", "once daily"),
];

const ROUTES: Table = &[
    ("intravenous", "intravenous"),
    ("intramuscular", "intramuscular"),
    ("subcutaneous", "subcutaneous"),
    ("sublingual", "sublingual"),
    ("topical", "topical"),
    ("inhalation", "inhalation"),
    ("by mouth", "oral"),
    ("oral", "oral"),
    ("ivp", "intravenous"),
    ("inh", "inhalation"),
    ("top", "topical"),
    ("po", "oral"),
    ("iv", "intravenous"),
    ("im", "intramuscular"),
    ("sc", "subcutaneous"),
    ("sq", "subcutaneous"),
    ("sl", "sublingual"),
];

const TEST_NAMES: Table = &[
    ("wbc", "White Blood Cell Count"),
    ("rbc", "Red Blood Cell Count"),
    ("hgb", "Hemoglobin"),
    ("hb", "Hemoglobin"),
    ("hct", "Hematocrit"),
    ("plt", "Platelet Count"),
    ("gluc", "Glucose"),
    ("bun", "Blood Urea Nitrogen"),
    ("crea", "Creatinine"),
    ("na", "Sodium"),
    ("k", "Potassium"),
    ("cl", "Chloride"),
    ("co2", "Carbon Dioxide"),
    ("ca", "Calcium"),
    ("phos", "Phosphorus"),
    ("mg", "Magnesium"),
    ("ast", "Aspartate Aminotransferase"),
    ("alt", "Alanine Aminotransferase"),
    ("alp", "Alkaline Phosphatase"),
    ("tbil", "Total Bilirubin"),
    ("dbil", "Direct Bilirubin"),
    ("tprot", "Total Protein"),
    ("alb", "Albumin"),
    ("a1c", "Hemoglobin A1C"),
    ("tsh", "Thyroid Stimulating Hormone"),
    ("ft4", "Free Thyroxine"),
    ("hdl", "HDL Cholesterol"),
    ("ldl", "LDL Cholesterol"),
    ("chol", "Total Cholesterol"),
    ("trig", "Triglycerides"),
];

/// Abbreviations shorter than this only match exactly.
const MIN_TEST_SUBSTRING: usize = 3;

const UNITS: Table = &[
    ("g/dl", "g/dL"),
    ("g/l", "g/L"),
    ("mg/dl", "mg/dL"),
    ("mg/l", "mg/L"),
    ("mmol/l", "mmol/L"),
    ("umol/l", "μmol/L"),
    ("u/l", "U/L"),
    ("iu/l", "IU/L"),
    ("meq/l", "mEq/L"),
    ("ng/ml", "ng/mL"),
    ("pg/ml", "pg/mL"),
    ("k/ul", "K/μL"),
    ("m/ul", "M/μL"),
    ("thou/ul", "K/μL"),
    ("mill/ul", "M/μL"),
];

fn exact(table: Table, key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(raw, canonical)| *raw == key || canonical.to_lowercase() == key)
        .map(|(_, canonical)| *canonical)
}

fn containing(table: Table, value: &str, min_len: usize) -> Option<&'static str> {
    table
        .iter()
        .filter(|(raw, _)| raw.len() >= min_len)
        .find(|(raw, _)| value.contains(raw))
        .map(|(_, canonical)| *canonical)
}

/// Unmapped values become "Unknown".
pub fn normalize_gender(raw: &str) -> String {
    let label = match raw.trim().to_lowercase().as_str() {
        "m" | "male" | "man" => "Male",
        "f" | "female" | "woman" => "Female",
        "o" | "other" => "Other",
        _ => "Unknown",
    };
    label.to_string()
}

/// Unmapped flags pass through uppercased.
pub fn normalize_abnormal_flag(raw: &str) -> String {
    let flag = raw.trim().to_uppercase();
    let label = match flag.as_str() {
        "H" | "HIGH" | "ELEVATED" | "ABOVE NORMAL" => "H",
        "L" | "LOW" | "DECREASED" | "BELOW NORMAL" => "L",
        "N" | "NORMAL" | "WNL" | "WITHIN NORMAL LIMITS" => "N",
        "A" | "ABNORMAL" | "ABN" => "A",
        "C" | "CRITICAL" | "CRIT" | "PANIC" => "C",
        _ => return flag,
    };
    label.to_string()
}

/// Unmapped frequencies pass through lowercased.
pub fn normalize_frequency(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    exact(FREQUENCIES, &value)
        .or_else(|| containing(FREQUENCIES, &value, 1))
        .map(str::to_string)
        .unwrap_or(value)
}

/// Unmapped routes pass through lowercased.
pub fn normalize_route(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    exact(ROUTES, &value)
        .or_else(|| containing(ROUTES, &value, 1))
        .map(str::to_string)
        .unwrap_or(value)
}

/// Unmapped test names are title-cased.
pub fn normalize_test_name(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    exact(TEST_NAMES, &value)
        .or_else(|| containing(TEST_NAMES, &value, MIN_TEST_SUBSTRING))
        .map(str::to_string)
        .unwrap_or_else(|| title_case(&value))
}

/// Unmapped units pass through trimmed, case preserved.
pub fn normalize_units(raw: &str) -> String {
    let unit = raw.trim();
    exact(UNITS, &unit.to_lowercase())
        .map(str::to_string)
        .unwrap_or_else(|| unit.to_string())
}

/// Qualitative lab results (`pos`, `NEG`, ...), if the value is one.
pub fn result_qualifier(value: &str) -> Option<&'static str> {
    match value.trim().to_lowercase().as_str() {
        "positive" | "pos" => Some("Positive"),
        "negative" | "neg" => Some("Negative"),
        "normal" | "nrm" => Some("Normal"),
        "abnormal" | "abn" => Some("Abnormal"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(f: fn(&str) -> String, inputs: &[&str]) {
        for raw in inputs {
            let once = f(raw);
            assert_eq!(f(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn gender_mapping() {
        assert_eq!(normalize_gender("m"), "Male");
        assert_eq!(normalize_gender(" FEMALE "), "Female");
        assert_eq!(normalize_gender("o"), "Other");
        assert_eq!(normalize_gender(""), "Unknown");
        assert_eq!(normalize_gender("x"), "Unknown");
    }

    #[test]
    fn abnormal_flags() {
        assert_eq!(normalize_abnormal_flag("high"), "H");
        assert_eq!(normalize_abnormal_flag("Within Normal Limits"), "N");
        assert_eq!(normalize_abnormal_flag("panic"), "C");
        assert_eq!(normalize_abnormal_flag("borderline"), "BORDERLINE");
    }

    #[test]
    fn frequencies() {
        assert_eq!(normalize_frequency("BID"), "twice daily");
        assert_eq!(normalize_frequency("q12h"), "every 12 hours");
        assert_eq!(normalize_frequency("take prn for pain"), "as needed");
        assert_eq!(normalize_frequency("Every Other Month"), "every other month");
    }

    #[test]
    fn routes() {
        assert_eq!(normalize_route("PO"), "oral");
        assert_eq!(normalize_route("by mouth"), "oral");
        assert_eq!(normalize_route("IVP"), "intravenous");
        assert_eq!(normalize_route("intramuscular injection"), "intramuscular");
        assert_eq!(normalize_route("rectal"), "rectal");
    }

    #[test]
    fn test_names() {
        assert_eq!(normalize_test_name("HGB"), "Hemoglobin");
        assert_eq!(normalize_test_name("hb"), "Hemoglobin");
        assert_eq!(normalize_test_name("HbA1c"), "Hemoglobin A1C");
        assert_eq!(normalize_test_name("serum glucose"), "Glucose");
        assert_eq!(normalize_test_name("vitamin d"), "Vitamin D");
        assert_eq!(normalize_test_name("LDL chol"), "LDL Cholesterol");
    }

    #[test]
    fn units() {
        assert_eq!(normalize_units("g/dl"), "g/dL");
        assert_eq!(normalize_units(" MMOL/L "), "mmol/L");
        assert_eq!(normalize_units("umol/l"), "μmol/L");
        assert_eq!(normalize_units("cells/hpf"), "cells/hpf");
    }

    #[test]
    fn qualifiers() {
        assert_eq!(result_qualifier("POS"), Some("Positive"));
        assert_eq!(result_qualifier("neg"), Some("Negative"));
        assert_eq!(result_qualifier("12.1"), None);
    }

    #[test]
    fn enumerated_normalizers_idempotent() {
        assert_idempotent(normalize_gender, &["m", "F", "woman", "?", ""]);
        assert_idempotent(normalize_abnormal_flag, &["high", "wnl", "crit", "odd"]);
        assert_idempotent(
            normalize_frequency,
            &["qd", "BID", "tid", "q6h", "weekly", "prn", "three times daily", "odd"],
        );
        assert_idempotent(
            normalize_route,
            &["po", "iv", "im", "sc", "sl", "top", "inh", "intramuscular", "nasal"],
        );
        assert_idempotent(
            normalize_test_name,
            &["wbc", "k", "na", "a1c", "hdl", "Vitamin D", "Creatinine", "ldl chol"],
        );
        assert_idempotent(normalize_units, &["g/dl", "umol/l", "k/ul", "cells"]);
    }
}
