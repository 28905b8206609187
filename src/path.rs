//! WSL <-> Windows path translation.
//!
//! Windows drives appear in WSL under a mount root (`/mnt/` unless `/etc/wsl.conf`
//! says otherwise), so `C:\Users` is `/mnt/c/Users`. Forward conversion is fallible
//! because most WSL paths live outside any drive; backward conversion always succeeds.

use std::fs;
use std::path::Path;

use crate::errors::ConversionError;
use crate::util::strip_outer_quotes;

pub const DEFAULT_MOUNT_ROOT: &str = "/mnt/";
pub const DEFAULT_WSL_CONF: &str = "/etc/wsl.conf";

/// Prefix under which Windows drive letters are mounted. Always ends in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRoot(String);

impl Default for MountRoot {
    fn default() -> Self {
        MountRoot(DEFAULT_MOUNT_ROOT.to_string())
    }
}

impl MountRoot {
    pub fn new(root: &str) -> Self {
        if root.ends_with('/') {
            MountRoot(root.to_string())
        } else {
            MountRoot(format!("{root}/"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the mount root from a wsl.conf-style file, falling back to the default
    /// when the file is unreadable or the entry is malformed.
    pub fn load(conf: &Path) -> Self {
        match fs::read_to_string(conf) {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                tracing::debug!(
                    path = %conf.display(),
                    error = %e,
                    "wsl.conf unreadable; using default mount root"
                );
                Self::default()
            }
        }
    }

    /// Only the first line whose key contains `root` is considered.
    pub fn parse(text: &str) -> Self {
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('#') || trimmed.starts_with(';') || trimmed.starts_with('[') {
                continue;
            }
            let mut parts = trimmed.split('=');
            let (Some(key), value) = (parts.next(), parts.next()) else {
                continue;
            };
            if !key.contains("root") {
                continue;
            }
            let value = match (value, parts.next()) {
                (Some(v), None) => strip_outer_quotes(v.trim()),
                _ => return Self::default(),
            };
            if value.is_empty() {
                return Self::default();
            }
            return Self::new(&value);
        }
        Self::default()
    }
}

/// Bidirectional converter parameterized by the mount root.
#[derive(Debug, Clone, Default)]
pub struct PathTranslator {
    root: MountRoot,
}

impl PathTranslator {
    pub fn new(root: MountRoot) -> Self {
        Self { root }
    }

    pub fn mount_root(&self) -> &MountRoot {
        &self.root
    }

    /// Convert a WSL path to its Windows form.
    pub fn to_windows(&self, path: &str) -> Result<String, ConversionError> {
        let mut out = String::with_capacity(path.len() + 1);
        let mut rest = path;
        if let Some(after) = path.strip_prefix(self.root.as_str()) {
            let mut chars = after.chars();
            if let Some(letter) = chars.next().filter(char::is_ascii_lowercase) {
                let tail = chars.as_str();
                if tail.is_empty() || tail.starts_with('/') {
                    out.push(letter.to_ascii_uppercase());
                    out.push(':');
                    rest = tail;
                }
            }
        }
        out.push_str(&rest.replace('/', "\\"));
        if out.starts_with('\\') {
            return Err(ConversionError::new(path));
        }
        Ok(out)
    }

    /// Convert a Windows path reported by the host to its WSL form.
    pub fn to_wsl(&self, path: &str) -> String {
        let path = path.replace('\\', "/");
        let mut chars = path.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => {
                format!(
                    "{}{}{}",
                    self.root.as_str(),
                    letter.to_ascii_lowercase(),
                    chars.as_str()
                )
            }
            _ => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tr() -> PathTranslator {
        PathTranslator::default()
    }

    #[test]
    fn test_to_windows_drive_paths() {
        assert_eq!(tr().to_windows("/mnt/c/Users").unwrap(), "C:\\Users");
        assert_eq!(tr().to_windows("/mnt/d").unwrap(), "D:");
        assert_eq!(tr().to_windows("/mnt/d/").unwrap(), "D:\\");
    }

    #[test]
    fn test_to_windows_rejects_unmounted_absolute_paths() {
        assert!(tr().to_windows("/not/mounted").is_err());
        assert!(tr().to_windows("/usr/bin").is_err());
        // Not a single lowercase drive letter under the root
        assert!(tr().to_windows("/mnt/cd/x").is_err());
        assert!(tr().to_windows("/mnt/C/x").is_err());
        assert!(tr().to_windows("/mnt/").is_err());
    }

    #[test]
    fn test_to_windows_relative_paths_only_swap_separators() {
        assert_eq!(tr().to_windows("a/b").unwrap(), "a\\b");
        assert_eq!(tr().to_windows("").unwrap(), "");
    }

    #[test]
    fn test_to_wsl() {
        assert_eq!(tr().to_wsl("D:\\foo\\bar"), "/mnt/d/foo/bar");
        assert_eq!(tr().to_wsl("c:"), "/mnt/c");
        assert_eq!(tr().to_wsl("\\\\server\\share"), "//server/share");
        assert_eq!(tr().to_wsl("rel\\x"), "rel/x");
    }

    #[test]
    fn test_round_trip_for_mounted_paths() {
        let t = tr();
        for p in ["/mnt/c/Users/me", "/mnt/z", "/mnt/e/a b/c.txt"] {
            let win = t.to_windows(p).unwrap();
            assert_eq!(t.to_wsl(&win), p, "round trip of {p} via {win}");
        }
    }

    #[test]
    fn test_custom_root() {
        let t = PathTranslator::new(MountRoot::new("/"));
        assert_eq!(t.to_windows("/c/Windows").unwrap(), "C:\\Windows");
        assert_eq!(t.to_wsl("C:\\Windows"), "/c/Windows");
        assert!(t.to_windows("/mnt/c/Windows").is_err());
    }

    #[test]
    fn test_mount_root_parse() {
        assert_eq!(MountRoot::parse(""), MountRoot::default());
        assert_eq!(
            MountRoot::parse("[automount]\nenabled = true\nroot = \"/win/\"\n").as_str(),
            "/win/"
        );
        assert_eq!(MountRoot::parse("root = /drives").as_str(), "/drives/");
        assert_eq!(MountRoot::parse("root='/x/'").as_str(), "/x/");
        assert_eq!(
            MountRoot::parse("# root = /commented/\nroot = /real/").as_str(),
            "/real/"
        );
    }

    #[test]
    fn test_mount_root_parse_malformed_falls_back() {
        assert_eq!(MountRoot::parse("root = a = b"), MountRoot::default());
        assert_eq!(MountRoot::parse("root = \"\""), MountRoot::default());
        assert_eq!(MountRoot::parse("root"), MountRoot::default());
    }

    #[test]
    fn test_mount_root_load_missing_file() {
        let td = tempfile::tempdir().expect("tmpdir");
        assert_eq!(
            MountRoot::load(&td.path().join("wsl.conf")),
            MountRoot::default()
        );
        std::fs::write(td.path().join("wsl.conf"), "root = /m/\n").unwrap();
        assert_eq!(MountRoot::load(&td.path().join("wsl.conf")).as_str(), "/m/");
    }
}
