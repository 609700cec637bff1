pub mod analyzers;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod server;
pub mod session;
