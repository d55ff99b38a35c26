//! VM launch descriptors
//!
//! A [`VmConfig`] is built fresh for every instance about to start, from the
//! immutable session [`Config`] plus a working directory handed out by an
//! [`InstanceDirAllocator`].

use crate::config::Config;
use crate::error::ConfigError;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Upper bound on instance directories under one workdir
pub const MAX_INSTANCES: usize = 1000;

/// Minimal field set needed to start one VM instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmConfig {
    /// `<type>-<index>`
    pub name: String,
    pub index: usize,
    pub workdir: PathBuf,
    pub bin: String,
    pub kernel: PathBuf,
    pub cmdline: String,
    pub image: PathBuf,
    pub sshkey: PathBuf,
    pub executor: PathBuf,
    pub console_dev: String,
    pub cpu: u32,
    pub mem: u64,
    pub debug: bool,
}

/// Hands out a unique per-instance working directory
///
/// Implementations must not return the same directory twice, even to
/// concurrent callers.
pub trait InstanceDirAllocator {
    fn allocate(&self, workdir: &Path) -> io::Result<(PathBuf, usize)>;
}

/// Allocates `<workdir>/instance-N` for the lowest free N
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTempDir;

impl InstanceDirAllocator for ProcessTempDir {
    fn allocate(&self, workdir: &Path) -> io::Result<(PathBuf, usize)> {
        fs::create_dir_all(workdir)?;
        for index in 0..MAX_INSTANCES {
            let path = workdir.join(format!("instance-{}", index));
            // create_dir is atomic; AlreadyExists means another instance owns it
            match fs::create_dir(&path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), index, "allocated instance dir");
                    return Ok((path, index));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::other(format!(
            "all {} instance dirs under {} are taken",
            MAX_INSTANCES,
            workdir.display()
        )))
    }
}

/// Build the launch descriptor for the next VM instance
pub fn create_vm_config(
    cfg: &Config,
    allocator: &dyn InstanceDirAllocator,
) -> Result<VmConfig, ConfigError> {
    let (workdir, index) = allocator
        .allocate(&cfg.workdir)
        .map_err(ConfigError::TempDirAllocationFailed)?;

    Ok(VmConfig {
        name: format!("{}-{}", cfg.vm_type, index),
        index,
        workdir,
        bin: cfg.bin.clone(),
        kernel: cfg.kernel.clone(),
        cmdline: cfg.cmdline.clone(),
        image: cfg.image.clone(),
        sshkey: cfg.sshkey.clone(),
        executor: cfg.executor_path(),
        console_dev: cfg.console_dev.clone(),
        cpu: cfg.cpu,
        mem: cfg.mem,
        debug: cfg.debug,
    })
}
