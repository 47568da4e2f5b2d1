//! Command-line front end for the verdict harness.

pub mod cli;
pub mod commands;
pub mod config;
pub mod main_lib;

pub use main_lib::init_tracing;
