//! skillpack CLI support: configuration, logging, exit codes, and console
//! output for the `skillpack` binary.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod output;
