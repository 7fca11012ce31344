use crate::constants::{PATIENT_ID_PREFIX, SHORT_ID_LEN};

/// Normalize a patient identifier.
///
/// Whitespace is trimmed. Identifiers already carrying the canonical prefix
/// are kept; short raw identifiers gain the prefix; longer ones pass through
/// unprefixed. Empty stays empty.
pub fn normalize_patient_id(raw: &str) -> String {
    let id = raw.trim();
    if id.is_empty() || id.starts_with(PATIENT_ID_PREFIX) {
        return id.to_string();
    }
    if id.chars().count() < SHORT_ID_LEN {
        format!("{}{}", PATIENT_ID_PREFIX, id)
    } else {
        id.to_string()
    }
}

/// Heuristic used by the generic processor to spot an identifier column.
pub fn looks_like_patient_id_column(header: &str) -> bool {
    header.contains("patient")
        && (header.contains("id") || header.contains("number") || header.contains("mrn"))
}
