// Library root for the command-line adapter. Exposes the file loaders and
// command runners so integration tests can drive them without a process.

pub mod cli;
pub mod commands;
pub mod config;
pub mod metrics;
pub mod table;
