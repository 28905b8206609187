//! Per-variable forwarding policy.
//!
//! Built-in defaults are overlaid by the comma-separated `WENV` specification:
//!
//! ```text
//! WENV='var1, !var2, @var3, #var4, $var5'
//! ```
//!
//! `!` ignores a variable, `@` converts it as a single path, `#` converts it as a
//! `:`-separated path list and `$` (or no modifier) passes it unchanged.

use std::collections::HashMap;

use crate::errors::WenvError;

/// Environment variable holding user overrides.
pub const POLICY_ENV: &str = "WENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarPolicy {
    Ignore,
    Pass,
    Convert,
    PathList,
}

impl VarPolicy {
    fn from_modifier(c: char) -> Option<Self> {
        match c {
            '!' => Some(VarPolicy::Ignore),
            '@' => Some(VarPolicy::Convert),
            '#' => Some(VarPolicy::PathList),
            '$' => Some(VarPolicy::Pass),
            _ => None,
        }
    }
}

// Shell-only variables that mean nothing (or the wrong thing) to Windows programs.
const DEFAULT_IGNORE: &[&str] = &[
    "home", "path", "ifs", "IFS", "SHELL", "prompt", "EDITOR", "PAGER", "BROWSER",
];
const DEFAULT_CONVERT: &[&str] = &["HOME", "GOBIN"];
const DEFAULT_PATH_LIST: &[&str] = &["PATH", "GOPATH"];

/// Case-sensitive mapping from variable name to policy. Names not present pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    entries: HashMap<String, VarPolicy>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let defaults = [
            (DEFAULT_IGNORE, VarPolicy::Ignore),
            (DEFAULT_CONVERT, VarPolicy::Convert),
            (DEFAULT_PATH_LIST, VarPolicy::PathList),
        ];
        let entries = defaults
            .iter()
            .flat_map(|(names, policy)| names.iter().map(move |n| (n.to_string(), *policy)))
            .collect();
        Self { entries }
    }
}

impl PolicyTable {
    /// Built-in defaults with the optional override specification applied on top.
    pub fn resolve(override_spec: Option<&str>) -> Result<Self, WenvError> {
        let mut table = Self::default();
        if let Some(spec) = override_spec {
            table.apply_overrides(spec)?;
        }
        tracing::debug!(entries = table.entries.len(), "variable policy resolved");
        Ok(table)
    }

    /// Overlay entries from a `WENV`-style specification. Later entries win.
    pub fn apply_overrides(&mut self, spec: &str) -> Result<(), WenvError> {
        for segment in spec.split(',') {
            let segment = segment.trim();
            let Some(first) = segment.chars().next() else {
                continue;
            };
            let (policy, name) = match VarPolicy::from_modifier(first) {
                Some(p) => (p, &segment[first.len_utf8()..]),
                None => (VarPolicy::Pass, segment),
            };
            if name.is_empty() {
                return Err(WenvError::InvalidConfig(format!(
                    "empty var name in {POLICY_ENV}"
                )));
            }
            self.set(name, policy);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> VarPolicy {
        self.entries.get(name).copied().unwrap_or(VarPolicy::Pass)
    }

    pub(crate) fn set(&mut self, name: impl Into<String>, policy: VarPolicy) {
        self.entries.insert(name.into(), policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = PolicyTable::default();
        assert_eq!(t.get("SHELL"), VarPolicy::Ignore);
        assert_eq!(t.get("path"), VarPolicy::Ignore);
        assert_eq!(t.get("HOME"), VarPolicy::Convert);
        assert_eq!(t.get("GOBIN"), VarPolicy::Convert);
        assert_eq!(t.get("PATH"), VarPolicy::PathList);
        assert_eq!(t.get("GOPATH"), VarPolicy::PathList);
        assert_eq!(t.get("Path"), VarPolicy::Pass);
        assert_eq!(t.get("UNLISTED"), VarPolicy::Pass);
    }

    #[test]
    fn test_resolve_modifiers_and_override_of_defaults() {
        let t = PolicyTable::resolve(Some("!FOO, @BAR, #BAZ, $PATH")).unwrap();
        assert_eq!(t.get("FOO"), VarPolicy::Ignore);
        assert_eq!(t.get("BAR"), VarPolicy::Convert);
        assert_eq!(t.get("BAZ"), VarPolicy::PathList);
        assert_eq!(t.get("PATH"), VarPolicy::Pass);
    }

    #[test]
    fn test_resolve_last_wins_and_skips_empty_segments() {
        let t = PolicyTable::resolve(Some(" ,!X,, @X ,  ")).unwrap();
        assert_eq!(t.get("X"), VarPolicy::Convert);
        let t = PolicyTable::resolve(Some("SHELL")).unwrap();
        assert_eq!(t.get("SHELL"), VarPolicy::Pass);
    }

    #[test]
    fn test_dollar_escapes_modifier_characters() {
        let t = PolicyTable::resolve(Some("$!weird")).unwrap();
        assert_eq!(t.get("!weird"), VarPolicy::Pass);
    }

    #[test]
    fn test_empty_name_is_config_error() {
        for spec in ["@", "FOO, !", " # ", "$"] {
            let err = PolicyTable::resolve(Some(spec)).expect_err(spec);
            assert!(matches!(err, WenvError::InvalidConfig(_)), "{spec}: {err:?}");
        }
    }

    #[test]
    fn test_resolve_none_is_defaults() {
        assert_eq!(PolicyTable::resolve(None).unwrap(), PolicyTable::default());
        assert_eq!(PolicyTable::resolve(Some("")).unwrap(), PolicyTable::default());
    }
}
