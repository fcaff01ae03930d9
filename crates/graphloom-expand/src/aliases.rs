//! Versioned aliases for legacy strategy names
//!
//! Earlier releases shipped the parameterize family under several
//! spellings. Those live on as registry entries pointing at the
//! canonical strategy name, with the version window in which the alias
//! warns and then stops resolving. Resolution logs a deprecation
//! warning; it never changes behavior.

use std::collections::HashMap;

/// A release version as (major, minor, patch)
pub type Version = (u32, u32, u32);

/// A deprecated strategy name pointing at its canonical replacement
#[derive(Debug, Clone)]
pub struct AliasEntry {
    /// The canonical strategy name to use instead
    pub canonical: &'static str,
    /// Version from which resolving the alias warns
    pub warn_starting: Version,
    /// Version from which the alias no longer resolves
    pub fail_starting: Version,
    /// Short migration note surfaced with the warning
    pub migration: &'static str,
}

/// Registry of legacy strategy-name aliases
pub struct AliasRegistry {
    entries: HashMap<&'static str, AliasEntry>,
    current: Version,
}

impl AliasRegistry {
    /// Create a registry with the built-in legacy aliases
    pub fn new(current: Version) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "parametrized",
            AliasEntry {
                canonical: "parameterize_values",
                warn_starting: (1, 10, 0),
                fail_starting: (2, 0, 0),
                migration: "use Parameterize::values instead",
            },
        );
        entries.insert(
            "parametrized_input",
            AliasEntry {
                canonical: "parameterize_sources",
                warn_starting: (1, 10, 0),
                fail_starting: (2, 0, 0),
                migration: "use Parameterize::sources instead",
            },
        );
        entries.insert(
            "parameterized_inputs",
            AliasEntry {
                canonical: "parameterize_sources",
                warn_starting: (1, 10, 0),
                fail_starting: (2, 0, 0),
                migration: "use Parameterize::sources instead",
            },
        );
        Self { entries, current }
    }

    /// Resolve a legacy alias to its canonical strategy name
    ///
    /// Returns `None` for names that are not registered aliases. A
    /// deprecated alias inside its warning window resolves with a logged
    /// warning; past its fail version it no longer resolves at all.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        let entry = self.entries.get(name)?;
        if self.current >= entry.fail_starting {
            log::warn!(
                "strategy alias '{}' was removed in {:?}; {}",
                name,
                entry.fail_starting,
                entry.migration
            );
            return None;
        }
        if self.current >= entry.warn_starting {
            log::warn!(
                "strategy alias '{}' is deprecated since {:?} and will be removed in {:?}; {}",
                name,
                entry.warn_starting,
                entry.fail_starting,
                entry.migration
            );
        }
        Some(entry.canonical)
    }

    /// Look up the alias entry for a legacy name
    pub fn get(&self, name: &str) -> Option<&AliasEntry> {
        self.entries.get(name)
    }
}
