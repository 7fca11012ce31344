//! Field normalizers.
//!
//! Every function here maps one raw cell value to its canonical form. They
//! never fail: a value that can't be normalized is returned as-is (at most
//! trimmed). Enumerated and date normalizers are idempotent.

pub mod dates;
pub mod identifier;
pub mod numeric;
pub mod text;
pub mod vocab;

pub use dates::{normalize_date, normalize_datetime};
pub use identifier::normalize_patient_id;
pub use numeric::{
    normalize_numeric, normalize_percentage, normalize_result_value, normalize_temperature,
    VITALS_PRECISION,
};
pub use text::{normalize_dosage, normalize_medication_name, normalize_reference_range};
pub use vocab::{
    normalize_abnormal_flag, normalize_frequency, normalize_gender, normalize_route,
    normalize_test_name, normalize_units,
};
