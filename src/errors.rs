//! Error mapping guide:
//! - Lookup of the target maps to 127, an untranslatable or unstartable target to 126.
//! - Usage errors map to 2; every other fatal error maps to 1.
//! - ConversionError is recoverable: the collector drops the variable or segment and keeps going.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a command that could not be found.
pub const EXIT_NOT_FOUND: u8 = 127;
/// Exit code for a command that was found but could not be translated or started.
pub const EXIT_CANNOT_EXECUTE: u8 = 126;
/// Exit code for a malformed invocation.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for generic internal failures.
pub const EXIT_FAILURE: u8 = 1;

/// A single path or path-list segment that has no representation on the Windows side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: could not convert to Windows path")]
pub struct ConversionError {
    pub path: String,
}

impl ConversionError {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Error)]
pub enum WenvError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    InvalidConfig(String),

    /// Target executable missing from the search path.
    #[error("{name}: {source}")]
    TargetNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    /// The helper (or another collaborator) missing from the search path.
    #[error("{name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: which::Error,
    },

    /// The target's own path is untranslatable.
    #[error(transparent)]
    TargetConversion(ConversionError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}: invalid first argument")]
    InvalidHandoffName(PathBuf),

    #[error("setenv: {0}")]
    SetEnv(String),

    #[error("exec: {0}")]
    Exec(io::Error),

    #[error("{0}")]
    Spawn(io::Error),
}

impl WenvError {
    pub fn transport(context: impl Into<String>, source: io::Error) -> Self {
        WenvError::Transport {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            WenvError::Usage(_) => EXIT_USAGE,
            WenvError::TargetNotFound { .. } => EXIT_NOT_FOUND,
            WenvError::TargetConversion(_) | WenvError::Spawn(_) => EXIT_CANNOT_EXECUTE,
            WenvError::InvalidConfig(_)
            | WenvError::Lookup { .. }
            | WenvError::Conversion(_)
            | WenvError::Transport { .. }
            | WenvError::InvalidHandoffName(_)
            | WenvError::SetEnv(_)
            | WenvError::Exec(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_convention() {
        assert_eq!(WenvError::Usage("x".into()).exit_code(), 2);
        assert_eq!(
            WenvError::TargetConversion(ConversionError::new("/x")).exit_code(),
            126
        );
        assert_eq!(WenvError::Spawn(io::Error::other("boom")).exit_code(), 126);
        assert_eq!(WenvError::InvalidConfig("x".into()).exit_code(), 1);
        assert_eq!(WenvError::Exec(io::Error::other("enomem")).exit_code(), 1);
        assert_eq!(
            WenvError::TargetNotFound {
                name: "nope.exe".into(),
                source: which::Error::CannotFindBinaryPath,
            }
            .exit_code(),
            127
        );
    }

    #[test]
    fn test_conversion_error_message() {
        let e = ConversionError::new("/not/mounted");
        assert_eq!(e.to_string(), "/not/mounted: could not convert to Windows path");
    }
}
