//! JSON output format for parsed configurations (--format json)

use crate::config::{Config, ParsedConfig};
use crate::syscalls::SyscallTable;
use serde::Serialize;

/// Summary of one parsed config file
#[derive(Debug, Clone, Serialize)]
pub struct JsonConfigSummary<'a> {
    /// Validated config with defaults filled in
    pub config: &'a Config,
    /// Number of enabled syscalls
    pub enabled_count: usize,
    /// Total entries in the catalog the config was resolved against
    pub catalog_size: usize,
    /// Enabled syscall names, in catalog order (only with --list-syscalls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_syscalls: Option<Vec<&'a str>>,
    /// Suppression pattern sources, user patterns first
    pub suppressions: Vec<&'a str>,
}

impl<'a> JsonConfigSummary<'a> {
    pub fn new(parsed: &'a ParsedConfig, table: &'a dyn SyscallTable, list_syscalls: bool) -> Self {
        Self {
            config: &parsed.config,
            enabled_count: parsed.syscalls.len(),
            catalog_size: table.calls().len(),
            enabled_syscalls: list_syscalls.then(|| parsed.syscalls.names(table)),
            suppressions: parsed.suppressions.sources(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
