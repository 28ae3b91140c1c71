// Public library interface for trace-uploader
// This allows the diagnostic binaries to share the pipeline stages

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod metadata;
pub mod scanner;
pub mod ui;
