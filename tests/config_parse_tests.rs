//! End-to-end config parsing tests
//!
//! Each test builds a throwaway toolkit root with the two required binaries
//! and parses JSON configs against a small synthetic catalog.

use serde_json::{json, Value};
use std::fs;
use syzcfg::config::{parse, OutputMode, SandboxMode, FIELDS};
use syzcfg::suppression::BUILTIN_SUPPRESSIONS;
use syzcfg::syscalls::{Syscall, SyscallCatalog, SyscallTable};
use syzcfg::ConfigError;
use tempfile::TempDir;

fn toolkit() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("bin")).unwrap();
    fs::write(dir.path().join("bin/syz-fuzzer"), b"#!/bin/sh\n").unwrap();
    fs::write(dir.path().join("bin/syz-executor"), b"#!/bin/sh\n").unwrap();
    dir
}

fn catalog() -> SyscallCatalog {
    SyscallCatalog::new(vec![
        Syscall::new(0, "read"),
        Syscall::new(1, "write"),
        Syscall::new(2, "open"),
        Syscall::new(3, "open$dir").with_call_name("open"),
        Syscall::new(4, "openat"),
        Syscall::new(5, "mmap"),
        Syscall::new(6, "clock_gettime"),
        Syscall::new(7, "close"),
    ])
    .unwrap()
}

fn base(root: &TempDir) -> Value {
    json!({
        "http": "localhost:56741",
        "workdir": "/tmp/syz-workdir",
        "vmlinux": "/linux/vmlinux",
        "syzkaller": root.path(),
        "type": "qemu",
        "count": 1,
    })
}

fn with(mut value: Value, key: &str, field: Value) -> Value {
    value.as_object_mut().unwrap().insert(key.to_string(), field);
    value
}

fn without(mut value: Value, key: &str) -> Value {
    value.as_object_mut().unwrap().remove(key);
    value
}

fn parse_value(value: &Value) -> Result<syzcfg::ParsedConfig, ConfigError> {
    parse(value.to_string().as_bytes(), &catalog())
}

#[test]
fn test_minimal_config_defaults() {
    let root = toolkit();
    let parsed = parse_value(&base(&root)).unwrap();
    let cfg = &parsed.config;

    assert!(cfg.cover);
    assert!(!cfg.leak);
    assert!(!cfg.debug);
    assert_eq!(cfg.sandbox, SandboxMode::Setuid);
    assert_eq!(cfg.output, OutputMode::Stdout);
    assert_eq!(cfg.procs, 1);
}

#[test]
fn test_every_declared_field_is_accepted() {
    let root = toolkit();
    let full = json!({
        "Http": "localhost:56741",
        "Workdir": "/tmp/syz-workdir",
        "Vmlinux": "/linux/vmlinux",
        "Kernel": "/linux/arch/x86/boot/bzImage",
        "Cmdline": "console=ttyS0",
        "Image": "/images/wheezy.img",
        "Cpu": 2,
        "Mem": 2048,
        "Sshkey": "/images/ssh/id_rsa",
        "Port": 23505,
        "Bin": "qemu-system-x86_64",
        "Debug": true,
        "Output": "file",
        "Syzkaller": root.path(),
        "Type": "kvm",
        "Count": 8,
        "Procs": 4,
        "Cover": false,
        "Sandbox": "namespace",
        "Leak": true,
        "ConsoleDev": "/dev/ttyUSB0",
        "Enable_Syscalls": ["open*"],
        "Disable_Syscalls": ["openat"],
        "Suppressions": ["WARNING: .* at foo"],
    });
    assert_eq!(full.as_object().unwrap().len(), FIELDS.len());

    let parsed = parse_value(&full).unwrap();
    let cfg = &parsed.config;
    assert_eq!(cfg.cpu, 2);
    assert_eq!(cfg.mem, 2048);
    assert_eq!(cfg.port, 23505);
    assert_eq!(cfg.output, OutputMode::File);
    assert_eq!(cfg.sandbox, SandboxMode::Namespace);
    assert!(!cfg.cover);
    assert!(cfg.leak);
    assert_eq!(cfg.console_dev, "/dev/ttyUSB0");
    assert_eq!(parsed.syscalls.iter().collect::<Vec<_>>(), vec![2, 3, 5, 6]);
    assert_eq!(parsed.suppressions.len(), 6);
}

#[test]
fn test_keys_are_case_insensitive() {
    let root = toolkit();
    let value = json!({
        "HTTP": "localhost:56741",
        "workDir": "/tmp/syz-workdir",
        "VMLINUX": "/linux/vmlinux",
        "SYZKALLER": root.path(),
        "tYpE": "qemu",
        "COUNT": 3,
        "enable_SYSCALLS": ["read"],
    });
    let parsed = parse_value(&value).unwrap();
    assert_eq!(parsed.config.count, 3);
    assert_eq!(parsed.config.enable_syscalls, vec!["read".to_string()]);
}

#[test]
fn test_unknown_field_names_key() {
    let root = toolkit();
    let value = with(base(&root), "Enable_Syscall", json!(["read"]));
    let err = parse_value(&value).unwrap_err();
    assert_eq!(err.to_string(), "unknown field 'Enable_Syscall' in config");
}

#[test]
fn test_malformed_json() {
    let err = parse(b"{\"http\": \"x\",", &catalog()).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedInput(_)));
    assert!(err.to_string().starts_with("failed to parse config file"));
}

#[test]
fn test_malformed_field_type() {
    let root = toolkit();
    let value = with(base(&root), "cover", json!("yes"));
    assert!(matches!(
        parse_value(&value).unwrap_err(),
        ConfigError::MalformedInput(_)
    ));
}

#[test]
fn test_missing_required_fields() {
    let root = toolkit();
    for (key, field) in [
        ("http", "http"),
        ("workdir", "workdir"),
        ("vmlinux", "vmlinux"),
        ("type", "type"),
    ] {
        let err = parse_value(&without(base(&root), key)).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingRequiredField(f) if f == field),
            "removing {key} gave {err}"
        );
    }
}

#[test]
fn test_count_boundaries() {
    let root = toolkit();
    for bad in [0, 1001, -5] {
        let err = parse_value(&with(base(&root), "count", json!(bad))).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange(c) if c == bad));
    }
    for good in [1, 1000] {
        let parsed = parse_value(&with(base(&root), "count", json!(good))).unwrap();
        assert_eq!(parsed.config.count, good as u32);
    }
}

#[test]
fn test_output_defaults_by_type() {
    let root = toolkit();
    let local = parse_value(&with(base(&root), "type", json!("local"))).unwrap();
    assert_eq!(local.config.output, OutputMode::None);

    let qemu = parse_value(&with(base(&root), "type", json!("qemu"))).unwrap();
    assert_eq!(qemu.config.output, OutputMode::Stdout);
}

#[test]
fn test_invalid_sandbox() {
    let root = toolkit();
    let err = parse_value(&with(base(&root), "sandbox", json!("chroot"))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "config param sandbox must contain one of none/setuid/namespace"
    );
}

#[test]
fn test_no_enable_list_enables_whole_catalog() {
    let root = toolkit();
    let parsed = parse_value(&base(&root)).unwrap();
    let table = catalog();
    let all: Vec<u32> = table.calls().iter().map(|c| c.id).collect();
    assert_eq!(parsed.syscalls.iter().collect::<Vec<_>>(), all);
}

#[test]
fn test_enable_and_disable_same_leaves_forced() {
    let root = toolkit();
    let value = with(
        with(base(&root), "enable_syscalls", json!(["read"])),
        "disable_syscalls",
        json!(["read"]),
    );
    let parsed = parse_value(&value).unwrap();
    let table = catalog();
    assert_eq!(parsed.syscalls.names(&table), vec!["mmap", "clock_gettime"]);
}

#[test]
fn test_wildcard_matches_prefix() {
    let root = toolkit();
    let value = with(base(&root), "enable_syscalls", json!(["open*"]));
    let parsed = parse_value(&value).unwrap();
    let table = catalog();
    assert_eq!(
        parsed.syscalls.names(&table),
        vec!["open", "open$dir", "openat", "mmap", "clock_gettime"]
    );
}

#[test]
fn test_lone_star_is_not_a_wildcard() {
    let root = toolkit();
    let value = with(base(&root), "disable_syscalls", json!(["*"]));
    let err = parse_value(&value).unwrap_err();
    assert_eq!(err.to_string(), "unknown disabled syscall: *");
}

#[test]
fn test_unknown_enabled_syscall() {
    let root = toolkit();
    let value = with(base(&root), "enable_syscalls", json!(["read", "ioctl$foo"]));
    let err = parse_value(&value).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownEnabledSyscall(p) if p == "ioctl$foo"));
}

#[test]
fn test_suppressions_order() {
    let root = toolkit();
    let value = with(
        base(&root),
        "suppressions",
        json!(["first signature", "second .* signature"]),
    );
    let parsed = parse_value(&value).unwrap();
    let mut expected = vec!["first signature", "second .* signature"];
    expected.extend(BUILTIN_SUPPRESSIONS);
    assert_eq!(parsed.suppressions.sources(), expected);
}

#[test]
fn test_invalid_suppression() {
    let root = toolkit();
    let value = with(base(&root), "suppressions", json!(["[unterminated"]));
    let err = parse_value(&value).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("failed to compile suppression '[unterminated'"));
}

#[test]
fn test_missing_toolkit_binary() {
    let root = toolkit();
    fs::remove_file(root.path().join("bin/syz-executor")).unwrap();
    let err = parse_value(&base(&root)).unwrap_err();
    assert!(matches!(err, ConfigError::MissingBinary(b) if b == "bin/syz-executor"));
}

#[test]
fn test_builtin_catalog_end_to_end() {
    let root = toolkit();
    let value = with(base(&root), "enable_syscalls", json!(["socket", "connect"]));
    let table = SyscallCatalog::x86_64();
    let parsed = parse(value.to_string().as_bytes(), &table).unwrap();
    assert_eq!(
        parsed.syscalls.names(&table),
        vec!["mmap", "socket", "connect", "clock_gettime"]
    );
}
