pub mod status_client;

pub use status_client::HttpStatusReporter;
