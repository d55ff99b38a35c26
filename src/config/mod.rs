//! Fuzzing-session configuration
//!
//! The pipeline runs once at startup:
//! 1. reject unknown top-level keys ([`schema::check_unknown_fields`])
//! 2. decode on top of defaults ([`schema::decode_config`])
//! 3. validate and default-fill ([`validator::validate`])
//! 4. resolve enabled syscalls and compile suppressions
//!
//! The result is an immutable [`ParsedConfig`].

pub mod schema;
mod types;
pub mod validator;

pub use types::{Config, OutputMode, RawConfig, SandboxMode, FIELDS};

use crate::error::ConfigError;
use crate::filter::{resolve_syscalls, EnabledSyscalls};
use crate::suppression::Suppressions;
use crate::syscalls::SyscallTable;
use std::fs;
use std::path::Path;

/// Everything derived from one config file
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub config: Config,
    pub syscalls: EnabledSyscalls,
    pub suppressions: Suppressions,
}

/// Read and parse a config file
///
/// # Errors
/// Returns [`ConfigError::NoConfigFile`] for an empty path and
/// [`ConfigError::ReadConfig`] if the file cannot be read; otherwise any error
/// from [`parse`].
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    table: &dyn SyscallTable,
) -> Result<ParsedConfig, ConfigError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigFile);
    }
    tracing::debug!(path = %path.display(), "reading config");
    let data = fs::read(path).map_err(|source| ConfigError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&data, table)
}

/// Parse a config from raw JSON bytes
pub fn parse(data: &[u8], table: &dyn SyscallTable) -> Result<ParsedConfig, ConfigError> {
    let object = schema::decode_object(data)?;
    schema::check_unknown_fields(&object)?;
    let raw = schema::decode_config(object)?;
    let config = validator::validate(raw)?;

    let syscalls = resolve_syscalls(table, &config.enable_syscalls, &config.disable_syscalls)?;
    let suppressions = Suppressions::compile(&config.suppressions)?;

    Ok(ParsedConfig {
        config,
        syscalls,
        suppressions,
    })
}
