// Dataset processing: tabular I/O, column resolution, and category processors

pub mod columns;
pub mod dataset;
pub mod processors;

pub use dataset::{CsvStore, Dataset, Row};
pub use processors::{CategoryProcessor, ProcessReport};
