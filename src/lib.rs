//! csvql: SQL queries over CSV/TSV files with optional plotting.
//!
//! The binary self-manages a private runtime environment (an isolated
//! install root holding the relocated entry point and a dependency
//! manifest) and re-executes itself inside it on first use.

pub mod cli;
pub mod config;
pub mod engine;
pub mod env;
pub mod handlers;
pub mod plot;
pub mod printer;
pub mod query;
pub mod settings;
pub mod utils;
