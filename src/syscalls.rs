//! Syscall catalog consumed by the enabled-syscall resolver
//!
//! A catalog is a read-only table of known system calls. Each entry has a
//! numeric identifier, a canonical name (e.g. `open$dir`) and an optional
//! short alias naming the underlying kernel call (e.g. `open`).
//!
//! The resolver only sees the [`SyscallTable`] trait, so tests can hand it a
//! small synthetic catalog instead of the full built-in one.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// x86_64 syscall numbers and kernel names used for the built-in catalog
const X86_64_SYSCALLS: &[(u32, &str)] = &[
    (0, "read"),
    (1, "write"),
    (2, "open"),
    (3, "close"),
    (4, "stat"),
    (5, "fstat"),
    (6, "lstat"),
    (7, "poll"),
    (8, "lseek"),
    (9, "mmap"),
    (10, "mprotect"),
    (11, "munmap"),
    (12, "brk"),
    (13, "rt_sigaction"),
    (14, "rt_sigprocmask"),
    (15, "rt_sigreturn"),
    (16, "ioctl"),
    (17, "pread64"),
    (18, "pwrite64"),
    (19, "readv"),
    (20, "writev"),
    (21, "access"),
    (22, "pipe"),
    (23, "select"),
    (24, "sched_yield"),
    (25, "mremap"),
    (26, "msync"),
    (27, "mincore"),
    (28, "madvise"),
    (29, "shmget"),
    (30, "shmat"),
    (31, "shmctl"),
    (32, "dup"),
    (33, "dup2"),
    (34, "pause"),
    (35, "nanosleep"),
    (36, "getitimer"),
    (37, "alarm"),
    (38, "setitimer"),
    (39, "getpid"),
    (40, "sendfile"),
    (41, "socket"),
    (42, "connect"),
    (43, "accept"),
    (44, "sendto"),
    (45, "recvfrom"),
    (46, "sendmsg"),
    (47, "recvmsg"),
    (48, "shutdown"),
    (49, "bind"),
    (50, "listen"),
    (51, "getsockname"),
    (52, "getpeername"),
    (53, "socketpair"),
    (54, "setsockopt"),
    (55, "getsockopt"),
    (56, "clone"),
    (57, "fork"),
    (58, "vfork"),
    (59, "execve"),
    (60, "exit"),
    (61, "wait4"),
    (62, "kill"),
    (63, "uname"),
    (72, "fcntl"),
    (73, "flock"),
    (74, "fsync"),
    (75, "fdatasync"),
    (76, "truncate"),
    (77, "ftruncate"),
    (78, "getdents"),
    (79, "getcwd"),
    (80, "chdir"),
    (81, "fchdir"),
    (82, "rename"),
    (83, "mkdir"),
    (84, "rmdir"),
    (85, "creat"),
    (86, "link"),
    (87, "unlink"),
    (88, "symlink"),
    (89, "readlink"),
    (90, "chmod"),
    (91, "fchmod"),
    (92, "chown"),
    (93, "fchown"),
    (94, "lchown"),
    (95, "umask"),
    (96, "gettimeofday"),
    (97, "getrlimit"),
    (98, "getrusage"),
    (99, "sysinfo"),
    (102, "getuid"),
    (104, "getgid"),
    (105, "setuid"),
    (107, "setgid"),
    (108, "geteuid"),
    (109, "getegid"),
    (110, "setpgid"),
    (111, "getppid"),
    (112, "getpgrp"),
    (113, "setsid"),
    (131, "sigaltstack"),
    (157, "prctl"),
    (158, "arch_prctl"),
    (186, "gettid"),
    (202, "futex"),
    (217, "getdents64"),
    (218, "set_tid_address"),
    (228, "clock_gettime"),
    (231, "exit_group"),
    (257, "openat"),
    (262, "newfstatat"),
    (273, "set_robust_list"),
    (318, "getrandom"),
    (332, "statx"),
];

/// One known system call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syscall {
    /// Catalog identifier
    pub id: u32,

    /// Canonical name, unique within the catalog
    pub name: String,

    /// Short alias for the underlying kernel call, if it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_name: Option<String>,
}

impl Syscall {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            call_name: None,
        }
    }

    pub fn with_call_name(mut self, call_name: impl Into<String>) -> Self {
        self.call_name = Some(call_name.into());
        self
    }
}

/// Read-only view of a syscall catalog
pub trait SyscallTable {
    /// Every entry, in catalog order
    fn calls(&self) -> &[Syscall];

    /// Lookup by canonical name
    fn by_name(&self, name: &str) -> Option<&Syscall>;
}

/// Concrete catalog with a by-name index
#[derive(Debug, Clone)]
pub struct SyscallCatalog {
    calls: Vec<Syscall>,
    by_name: HashMap<String, usize>,
}

impl SyscallCatalog {
    /// Build a catalog, rejecting duplicate identifiers or names
    pub fn new(calls: Vec<Syscall>) -> Result<Self, ConfigError> {
        let mut by_name = HashMap::with_capacity(calls.len());
        let mut ids = HashMap::with_capacity(calls.len());
        for (idx, call) in calls.iter().enumerate() {
            if call.name.is_empty() {
                return Err(ConfigError::Catalog(format!(
                    "syscall {} has an empty name",
                    call.id
                )));
            }
            if let Some(prev) = ids.insert(call.id, &call.name) {
                return Err(ConfigError::Catalog(format!(
                    "duplicate syscall id {} ('{}' and '{}')",
                    call.id, prev, call.name
                )));
            }
            if by_name.insert(call.name.clone(), idx).is_some() {
                return Err(ConfigError::Catalog(format!(
                    "duplicate syscall name '{}'",
                    call.name
                )));
            }
        }
        Ok(Self { calls, by_name })
    }

    /// Built-in catalog of x86_64 kernel syscalls
    pub fn x86_64() -> Self {
        let calls: Vec<Syscall> = X86_64_SYSCALLS
            .iter()
            .map(|&(id, name)| Syscall::new(id, name))
            .collect();
        let by_name = calls
            .iter()
            .enumerate()
            .map(|(idx, call)| (call.name.clone(), idx))
            .collect();
        Self { calls, by_name }
    }

    /// Load a catalog from a TOML file
    ///
    /// # Example TOML
    /// ```toml
    /// [[call]]
    /// id = 0
    /// name = "open"
    ///
    /// [[call]]
    /// id = 1
    /// name = "open$dir"
    /// call_name = "open"
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::Catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct CatalogFile {
            #[serde(default)]
            call: Vec<Syscall>,
        }

        let file: CatalogFile =
            toml::from_str(content).map_err(|e| ConfigError::Catalog(e.to_string()))?;
        Self::new(file.call)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Lookup by identifier
    pub fn by_id(&self, id: u32) -> Option<&Syscall> {
        self.calls.iter().find(|c| c.id == id)
    }
}

impl SyscallTable for SyscallCatalog {
    fn calls(&self) -> &[Syscall] {
        &self.calls
    }

    fn by_name(&self, name: &str) -> Option<&Syscall> {
        self.by_name.get(name).map(|&idx| &self.calls[idx])
    }
}
