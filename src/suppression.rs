//! Known-benign crash signatures
//!
//! User-supplied suppressions are compiled together with a fixed set of
//! built-in patterns. A crash report whose text matches any of them is
//! classified as known-benign and ignored.

use crate::error::ConfigError;
use regex::bytes::Regex;

/// Built-in suppressions, always appended after the user's own
pub const BUILTIN_SUPPRESSIONS: [&str; 5] = [
    "panic: failed to start executor binary",
    "panic: executor failed: pthread_create failed",
    "panic: failed to create temp dir",
    "fatal error: runtime: out of memory",
    r"Out of memory: Kill process .* \(syz-fuzzer\)",
];

/// Ordered list of compiled suppression matchers
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    patterns: Vec<Regex>,
}

impl Suppressions {
    /// Compile `user` followed by [`BUILTIN_SUPPRESSIONS`]
    ///
    /// # Errors
    /// Fails on the first pattern that does not compile; nothing is returned
    /// for the patterns before it.
    pub fn compile(user: &[String]) -> Result<Self, ConfigError> {
        let sources = user
            .iter()
            .map(String::as_str)
            .chain(BUILTIN_SUPPRESSIONS.iter().copied());

        let mut patterns = Vec::with_capacity(user.len() + BUILTIN_SUPPRESSIONS.len());
        for source in sources {
            let re = Regex::new(source).map_err(|e| ConfigError::InvalidSuppressionPattern {
                pattern: source.to_string(),
                source: e,
            })?;
            patterns.push(re);
        }

        Ok(Self { patterns })
    }

    /// First pattern found anywhere in `output`
    pub fn matches(&self, output: &[u8]) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(output))
    }

    pub fn is_suppressed(&self, output: &[u8]) -> bool {
        self.matches(output).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Regex> {
        self.patterns.iter()
    }

    /// Pattern sources in compilation order
    pub fn sources(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }
}
