use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use syzcfg::cli::{Cli, OutputFormat};
use syzcfg::config::{self, ParsedConfig};
use syzcfg::json_output::JsonConfigSummary;
use syzcfg::syscalls::{SyscallCatalog, SyscallTable};
use syzcfg::vm::{self, ProcessTempDir};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_catalog(args: &Cli) -> Result<SyscallCatalog> {
    match &args.catalog {
        Some(path) => {
            let catalog = SyscallCatalog::from_toml(path)?;
            tracing::debug!(path = %path.display(), calls = catalog.len(), "loaded syscall catalog");
            Ok(catalog)
        }
        None => Ok(SyscallCatalog::x86_64()),
    }
}

fn print_text_summary(parsed: &ParsedConfig, table: &dyn SyscallTable, list_syscalls: bool) {
    let cfg = &parsed.config;
    println!("type:         {} x{} ({} procs each)", cfg.vm_type, cfg.count, cfg.procs);
    println!("http:         {}", cfg.http);
    println!("workdir:      {}", cfg.workdir.display());
    println!("output:       {}", cfg.output);
    println!("sandbox:      {}", cfg.sandbox);
    println!("cover:        {}", cfg.cover);
    println!("leak:         {}", cfg.leak);
    println!(
        "syscalls:     {} of {} enabled",
        parsed.syscalls.len(),
        table.calls().len()
    );
    println!("suppressions: {}", parsed.suppressions.len());

    if list_syscalls {
        println!();
        for name in parsed.syscalls.names(table) {
            println!("{}", name);
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let catalog = load_catalog(&args)?;
    let parsed = config::parse_file(&args.config, &catalog)?;
    tracing::debug!(
        syscalls = parsed.syscalls.len(),
        suppressions = parsed.suppressions.len(),
        "config parsed"
    );

    match args.format {
        OutputFormat::Text => print_text_summary(&parsed, &catalog, args.list_syscalls),
        OutputFormat::Json => {
            let summary = JsonConfigSummary::new(&parsed, &catalog, args.list_syscalls);
            println!("{}", summary.to_json()?);
        }
    }

    if args.vm_config {
        let vm_cfg = vm::create_vm_config(&parsed.config, &ProcessTempDir)?;
        println!("{}", serde_json::to_string_pretty(&vm_cfg)?);
    }

    if let Some(report) = &args.check_report {
        let output = fs::read(report)
            .with_context(|| format!("Failed to read crash report: {}", report.display()))?;
        match parsed.suppressions.matches(&output) {
            Some(re) => println!("suppressed by '{}'", re.as_str()),
            None => println!("not suppressed"),
        }
    }

    Ok(())
}
