//! Enabled-syscall resolution from Enable_Syscalls / Disable_Syscalls
//!
//! Patterns select catalog entries by:
//! - Exact canonical name: `open$dir`
//! - Exact short alias: `open` (matches every entry whose call name is `open`)
//! - Prefix of the canonical name, with a trailing `*`: `open*`

use crate::error::ConfigError;
use crate::syscalls::{Syscall, SyscallTable};
use serde::Serialize;
use std::collections::BTreeSet;

/// Syscalls the executor generates regardless of the user's filters
pub const FORCED_SYSCALLS: [&str; 2] = ["mmap", "clock_gettime"];

/// A parsed syscall selection pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyscallPattern {
    /// Canonical name or short alias
    Exact(String),
    /// Canonical name prefix (pattern without its trailing `*`)
    Prefix(String),
}

impl SyscallPattern {
    /// Parse a raw pattern. A lone `*` is an exact name, not a wildcard.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix('*') {
            Some(prefix) if !prefix.is_empty() => Self::Prefix(prefix.to_string()),
            _ => Self::Exact(raw.to_string()),
        }
    }

    pub fn matches(&self, call: &Syscall) -> bool {
        match self {
            Self::Exact(name) => {
                call.name == *name || call.call_name.as_deref() == Some(name.as_str())
            }
            Self::Prefix(prefix) => call.name.starts_with(prefix.as_str()),
        }
    }

    fn matching<'a>(&'a self, table: &'a dyn SyscallTable) -> impl Iterator<Item = u32> + 'a {
        table
            .calls()
            .iter()
            .filter(move |call| self.matches(call))
            .map(|call| call.id)
    }
}

/// Set of syscall identifiers enabled for program generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnabledSyscalls {
    ids: BTreeSet<u32>,
}

impl EnabledSyscalls {
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Canonical names of the enabled entries, in catalog order
    pub fn names<'a>(&'a self, table: &'a dyn SyscallTable) -> Vec<&'a str> {
        table
            .calls()
            .iter()
            .filter(|call| self.contains(call.id))
            .map(|call| call.name.as_str())
            .collect()
    }
}

impl FromIterator<u32> for EnabledSyscalls {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Compute the enabled syscall set from the catalog and the user's patterns
///
/// An empty enable list starts from the whole catalog. Disable patterns are
/// applied afterwards and always win over enables, except for
/// [`FORCED_SYSCALLS`] which are re-inserted last. A pattern that matches no
/// catalog entry fails the whole resolution.
pub fn resolve_syscalls(
    table: &dyn SyscallTable,
    enable: &[String],
    disable: &[String],
) -> Result<EnabledSyscalls, ConfigError> {
    let mut ids = BTreeSet::new();

    if enable.is_empty() {
        ids.extend(table.calls().iter().map(|call| call.id));
    } else {
        for raw in enable {
            let pattern = SyscallPattern::parse(raw);
            let mut matched = false;
            for id in pattern.matching(table) {
                ids.insert(id);
                matched = true;
            }
            if !matched {
                return Err(ConfigError::UnknownEnabledSyscall(raw.clone()));
            }
        }
    }

    for raw in disable {
        let pattern = SyscallPattern::parse(raw);
        // Counted against the full catalog, not the shrinking working set
        let mut matched = 0usize;
        for id in pattern.matching(table) {
            ids.remove(&id);
            matched += 1;
        }
        if matched == 0 {
            return Err(ConfigError::UnknownDisabledSyscall(raw.clone()));
        }
    }

    // Catalogs are required to contain these
    for name in FORCED_SYSCALLS {
        if let Some(call) = table.by_name(name) {
            ids.insert(call.id);
        }
    }

    Ok(EnabledSyscalls { ids })
}
