//! Whitelist rule parsing and lookup.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::ConfigError;

/// An immutable set of whitelist rules, partitioned into exact-path
/// rules and subtree rules for lookup.
///
/// Built once during startup; [`Whitelist::contains`] takes `&self` and
/// is safe for unlimited concurrent callers afterwards.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    exact: HashSet<String>,
    subtrees: HashSet<String>,
    duplicates: Vec<String>,
}

impl Whitelist {
    /// A whitelist covering nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load rules from a file, one rule per line.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::WhitelistRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(text.lines())
    }

    /// Parse rule lines.
    ///
    /// Blank lines are ignored. Every other line must start with `/`;
    /// a `/**` suffix registers a subtree rule over the named directory,
    /// anything else registers an exact rule. Re-registering a rule
    /// already present is a no-op recorded in [`Whitelist::duplicates`].
    pub fn parse<'a, I>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut list = Whitelist::default();
        for (idx, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if !line.starts_with('/') {
                return Err(ConfigError::RelativeRule {
                    line: idx + 1,
                    rule: line.to_string(),
                });
            }
            let inserted = match line.strip_suffix("/**") {
                Some(dir) => list.subtrees.insert(dir.to_string()),
                None => list.exact.insert(line.to_string()),
            };
            if !inserted {
                list.duplicates.push(line.to_string());
            }
        }
        Ok(list)
    }

    /// Whether a canonical path is covered by any rule.
    ///
    /// The exact set is checked first, then the subtree set: for the
    /// full path (a subtree rule covers the named directory itself) and
    /// for each ancestor obtained by truncating at the last `/`,
    /// stopping at the root. Truncation only ever happens at separator
    /// boundaries, so a rule for `/usr/include` matches `/usr/include/x`
    /// but never `/usr/included-other`.
    pub fn contains(&self, path: &str) -> bool {
        if self.exact.contains(path) || self.subtrees.contains(path) {
            return true;
        }
        let mut prefix = path;
        while let Some(cut) = prefix.rfind('/') {
            if cut == 0 {
                break;
            }
            prefix = &prefix[..cut];
            if self.subtrees.contains(prefix) {
                return true;
            }
        }
        false
    }

    /// Rule lines that were already present when re-registered.
    /// Diagnostic only; duplicates never abort construction.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.exact.len() + self.subtrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.subtrees.is_empty()
    }
}
