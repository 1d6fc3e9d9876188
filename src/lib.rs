pub mod analyzers;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod filter;
pub mod ingest;
pub mod loader;
pub mod output;
pub mod parser;
pub mod record;
