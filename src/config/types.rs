use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Every top-level key a config file may contain
///
/// Keys are matched case-insensitively. This list must stay in sync with the
/// serde names of [`RawConfig`].
pub const FIELDS: [&str; 24] = [
    "Http",
    "Workdir",
    "Vmlinux",
    "Kernel",
    "Cmdline",
    "Image",
    "Cpu",
    "Mem",
    "Sshkey",
    "Port",
    "Bin",
    "Debug",
    "Output",
    "Syzkaller",
    "Type",
    "Count",
    "Procs",
    "Cover",
    "Sandbox",
    "Leak",
    "ConsoleDev",
    "Enable_Syscalls",
    "Disable_Syscalls",
    "Suppressions",
];

/// Config file as decoded, before any validation or default-filling
///
/// # Example JSON
/// ```json
/// {
///     "http": "localhost:56741",
///     "workdir": "/syzkaller/workdir",
///     "vmlinux": "/linux/vmlinux",
///     "syzkaller": "/syzkaller",
///     "type": "qemu",
///     "count": 4,
///     "enable_syscalls": ["open*", "read"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    #[serde(rename = "Http")]
    pub http: String,
    #[serde(rename = "Workdir")]
    pub workdir: PathBuf,
    #[serde(rename = "Vmlinux")]
    pub vmlinux: PathBuf,
    /// e.g. arch/x86/boot/bzImage
    #[serde(rename = "Kernel")]
    pub kernel: PathBuf,
    #[serde(rename = "Cmdline")]
    pub cmdline: String,
    #[serde(rename = "Image")]
    pub image: PathBuf,
    #[serde(rename = "Cpu")]
    pub cpu: u32,
    /// MiB
    #[serde(rename = "Mem")]
    pub mem: u64,
    #[serde(rename = "Sshkey")]
    pub sshkey: PathBuf,
    #[serde(rename = "Port")]
    pub port: u16,
    /// qemu/lkvm binary name
    #[serde(rename = "Bin")]
    pub bin: String,
    #[serde(rename = "Debug")]
    pub debug: bool,
    #[serde(rename = "Output")]
    pub output: String,
    /// Toolkit checkout; binaries are looked up under its `bin` subdir
    #[serde(rename = "Syzkaller")]
    pub syzkaller: PathBuf,
    #[serde(rename = "Type")]
    pub vm_type: String,
    #[serde(rename = "Count")]
    pub count: i64,
    #[serde(rename = "Procs")]
    pub procs: i64,
    #[serde(rename = "Cover")]
    pub cover: bool,
    #[serde(rename = "Sandbox")]
    pub sandbox: String,
    #[serde(rename = "Leak")]
    pub leak: bool,
    #[serde(rename = "ConsoleDev")]
    pub console_dev: String,
    #[serde(rename = "Enable_Syscalls")]
    pub enable_syscalls: Vec<String>,
    #[serde(rename = "Disable_Syscalls")]
    pub disable_syscalls: Vec<String>,
    #[serde(rename = "Suppressions")]
    pub suppressions: Vec<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            http: String::new(),
            workdir: PathBuf::new(),
            vmlinux: PathBuf::new(),
            kernel: PathBuf::new(),
            cmdline: String::new(),
            image: PathBuf::new(),
            cpu: 0,
            mem: 0,
            sshkey: PathBuf::new(),
            port: 0,
            bin: String::new(),
            debug: false,
            output: String::new(),
            syzkaller: PathBuf::new(),
            vm_type: String::new(),
            count: 0,
            procs: 0,
            cover: true,
            sandbox: SandboxMode::Setuid.to_string(),
            leak: false,
            console_dev: String::new(),
            enable_syscalls: Vec::new(),
            disable_syscalls: Vec::new(),
            suppressions: Vec::new(),
        }
    }
}

/// Where VM console output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    None,
    Stdout,
    Dmesg,
    File,
}

impl OutputMode {
    pub const ALLOWED: &'static str = "none/stdout/dmesg/file";

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "stdout" => Some(Self::Stdout),
            "dmesg" => Some(Self::Dmesg),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Stdout => "stdout",
            Self::Dmesg => "dmesg",
            Self::File => "file",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Isolation applied to the fuzzer process inside the VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxMode {
    /// Nothing special; has false positives, e.g. from killing init
    None,
    /// Impersonate user nobody (65534)
    Setuid,
    /// New mount/net/pid/... namespaces; needs a kernel built with namespace support
    Namespace,
}

impl SandboxMode {
    pub const ALLOWED: &'static str = "none/setuid/namespace";

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "setuid" => Some(Self::Setuid),
            "namespace" => Some(Self::Namespace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Setuid => "setuid",
            Self::Namespace => "namespace",
        }
    }
}

impl fmt::Display for SandboxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, defaulted fuzzing-session configuration
///
/// Produced once by [`crate::config::parse`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub http: String,
    pub workdir: PathBuf,
    pub vmlinux: PathBuf,
    pub kernel: PathBuf,
    pub cmdline: String,
    pub image: PathBuf,
    pub cpu: u32,
    pub mem: u64,
    pub sshkey: PathBuf,
    pub port: u16,
    pub bin: String,
    pub debug: bool,
    pub output: OutputMode,
    pub syzkaller: PathBuf,
    pub vm_type: String,
    /// In (0, 1000]
    pub count: u32,
    /// At least 1
    pub procs: u32,
    pub cover: bool,
    pub sandbox: SandboxMode,
    pub leak: bool,
    pub console_dev: String,
    pub enable_syscalls: Vec<String>,
    pub disable_syscalls: Vec<String>,
    pub suppressions: Vec<String>,
}

impl Config {
    /// `<syzkaller>/bin/syz-fuzzer`
    pub fn fuzzer_path(&self) -> PathBuf {
        fuzzer_path(&self.syzkaller)
    }

    /// `<syzkaller>/bin/syz-executor`
    pub fn executor_path(&self) -> PathBuf {
        executor_path(&self.syzkaller)
    }
}

pub(crate) fn fuzzer_path(root: &Path) -> PathBuf {
    root.join("bin").join("syz-fuzzer")
}

pub(crate) fn executor_path(root: &Path) -> PathBuf {
    root.join("bin").join("syz-executor")
}
