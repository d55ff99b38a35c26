//! CLI argument parsing for syzcfg

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the config summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "syzcfg")]
#[command(version)]
#[command(about = "Validate a fuzzing-session config and show what it resolves to", long_about = None)]
pub struct Cli {
    /// Config file (JSON)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Syscall catalog (TOML) to resolve against instead of the built-in x86_64 table
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print the names of all enabled syscalls
    #[arg(long = "list-syscalls")]
    pub list_syscalls: bool,

    /// Allocate one instance directory and print its VM launch descriptor
    #[arg(long = "vm-config")]
    pub vm_config: bool,

    /// Check whether a crash report matches a suppression
    #[arg(long = "check-report", value_name = "FILE")]
    pub check_report: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
