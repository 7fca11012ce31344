// Normalization pipeline: field normalizers, category processors, routing

pub mod dispatcher;
pub mod fields;
pub mod processing;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use registry::ProcessorRegistry;
