//! syzcfg - fuzzing-session configuration for a kernel syscall fuzzer
//!
//! This library loads and validates a session config, resolves the set of
//! syscalls enabled for program generation, compiles the crash suppressions,
//! and projects per-instance VM launch descriptors.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod json_output;
pub mod suppression;
pub mod syscalls;
pub mod vm;

pub use config::{parse, parse_file, Config, ParsedConfig};
pub use error::ConfigError;
