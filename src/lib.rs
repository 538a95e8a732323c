pub mod airports;
pub mod dataset;
pub mod fetch;
pub mod ingest;
pub mod names;
pub mod output;
pub mod views;
