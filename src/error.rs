//! Errors produced while interpreting a fuzzing-session configuration
//!
//! Every failure is terminal for the parse: there is no partially accepted
//! configuration. Each variant carries the key, field, pattern or value that
//! caused it so the message is actionable on its own.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating or projecting a config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config file supplied")]
    NoConfigFile,

    #[error("failed to read config file {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown field '{0}' in config")]
    UnknownField(String),

    #[error("failed to parse config file: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("bad config syzkaller param: can't find {0}")]
    MissingBinary(String),

    #[error("config param {0} is empty")]
    MissingRequiredField(&'static str),

    #[error("invalid config param count: {0}, want (0, 1000]")]
    OutOfRange(i64),

    #[error("config param {field} must contain one of {allowed}")]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("unknown enabled syscall: {0}")]
    UnknownEnabledSyscall(String),

    #[error("unknown disabled syscall: {0}")]
    UnknownDisabledSyscall(String),

    #[error("failed to compile suppression '{pattern}': {source}")]
    InvalidSuppressionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to create instance temp dir: {0}")]
    TempDirAllocationFailed(#[source] std::io::Error),

    #[error("invalid syscall catalog: {0}")]
    Catalog(String),
}

impl ConfigError {
    /// True for the two "pattern matched no catalog entry" variants
    pub fn is_unknown_syscall(&self) -> bool {
        matches!(
            self,
            ConfigError::UnknownEnabledSyscall(_) | ConfigError::UnknownDisabledSyscall(_)
        )
    }
}
