use super::types::{executor_path, fuzzer_path, Config, OutputMode, RawConfig, SandboxMode};
use crate::error::ConfigError;
use std::path::Path;

/// Largest accepted VM count
pub const MAX_COUNT: i64 = 1000;

/// Check a decoded config and fill in derived defaults
///
/// Checks run in a fixed order and the first failure is returned. The only
/// I/O is the existence check for the fuzzer and executor binaries.
pub fn validate(raw: RawConfig) -> Result<Config, ConfigError> {
    check_binary(&fuzzer_path(&raw.syzkaller), "bin/syz-fuzzer")?;
    check_binary(&executor_path(&raw.syzkaller), "bin/syz-executor")?;

    if raw.http.is_empty() {
        return Err(ConfigError::MissingRequiredField("http"));
    }
    if raw.workdir.as_os_str().is_empty() {
        return Err(ConfigError::MissingRequiredField("workdir"));
    }
    if raw.vmlinux.as_os_str().is_empty() {
        return Err(ConfigError::MissingRequiredField("vmlinux"));
    }
    if raw.vm_type.is_empty() {
        return Err(ConfigError::MissingRequiredField("type"));
    }

    if raw.count <= 0 || raw.count > MAX_COUNT {
        return Err(ConfigError::OutOfRange(raw.count));
    }
    let count = u32::try_from(raw.count).map_err(|_| ConfigError::OutOfRange(raw.count))?;

    let procs = if raw.procs <= 0 {
        1
    } else {
        u32::try_from(raw.procs).unwrap_or(u32::MAX)
    };

    let output = if raw.output.is_empty() {
        default_output(&raw.vm_type)
    } else {
        OutputMode::parse(&raw.output).ok_or_else(|| ConfigError::InvalidEnum {
            field: "output",
            value: raw.output.clone(),
            allowed: OutputMode::ALLOWED,
        })?
    };

    let sandbox = SandboxMode::parse(&raw.sandbox).ok_or_else(|| ConfigError::InvalidEnum {
        field: "sandbox",
        value: raw.sandbox.clone(),
        allowed: SandboxMode::ALLOWED,
    })?;

    Ok(Config {
        http: raw.http,
        workdir: raw.workdir,
        vmlinux: raw.vmlinux,
        kernel: raw.kernel,
        cmdline: raw.cmdline,
        image: raw.image,
        cpu: raw.cpu,
        mem: raw.mem,
        sshkey: raw.sshkey,
        port: raw.port,
        bin: raw.bin,
        debug: raw.debug,
        output,
        syzkaller: raw.syzkaller,
        vm_type: raw.vm_type,
        count,
        procs,
        cover: raw.cover,
        sandbox,
        leak: raw.leak,
        console_dev: raw.console_dev,
        enable_syscalls: raw.enable_syscalls,
        disable_syscalls: raw.disable_syscalls,
        suppressions: raw.suppressions,
    })
}

/// Local instances have no console to capture
fn default_output(vm_type: &str) -> OutputMode {
    if vm_type == "local" {
        OutputMode::None
    } else {
        OutputMode::Stdout
    }
}

fn check_binary(path: &Path, name: &str) -> Result<(), ConfigError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::MissingBinary(name.to_string()))
    }
}
