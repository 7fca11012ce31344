// Category processors: one per dataset category

pub mod base;
pub mod generic;
pub mod lab_results;
pub mod medications;
pub mod patients;
pub mod vitals;

pub use base::{CategoryProcessor, ProcessReport};
pub use generic::GenericProcessor;
pub use lab_results::LabResultsProcessor;
pub use medications::MedicationsProcessor;
pub use patients::PatientProcessor;
pub use vitals::VitalsProcessor;
