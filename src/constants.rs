/// Category labels accepted on job intake.
/// These are the keys of the built-in processor registry.
pub const PATIENTS: &str = "patients";
pub const VITALS: &str = "vitals";
pub const MEDICATIONS: &str = "medications";
pub const LAB_RESULTS: &str = "lab_results";
pub const GENERIC: &str = "generic";

/// Prefix given to short raw patient identifiers.
pub const PATIENT_ID_PREFIX: &str = "PT-";

/// Raw identifiers shorter than this get [`PATIENT_ID_PREFIX`].
pub const SHORT_ID_LEN: usize = 8;

/// Canonical output date pattern (`YYYY-MM-DD`).
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical output timestamp pattern for vitals.
pub const CANONICAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Directory, relative to the input's parent, where derived outputs land.
pub const RESULTS_DIR_NAME: &str = "results";

/// Suffix appended to the input's file stem for derived outputs.
pub const HARMONIZED_SUFFIX: &str = "harmonized";

