//! Pass environment variables to Windows programs started from WSL.
//!
//! The `wenv` binary collects the environment, translating WSL paths to Windows
//! paths according to a per-variable policy, writes it to a single-use handoff file
//! in the Windows temp directory and replaces itself with `wenvhelper.exe`. The
//! helper loads and deletes that file, sets the variables in its own environment
//! and runs the requested program.
//!
//! By default `home path ifs IFS SHELL prompt EDITOR PAGER BROWSER` are ignored,
//! `HOME` and `GOBIN` are converted to Windows paths and `PATH` and `GOPATH` are
//! converted as path lists. Everything else passes unchanged. The `WENV`
//! variable adjusts this; see [`policy`].

pub mod collect;
pub mod config;
pub mod errors;
pub mod handoff;
pub mod helper;
pub mod image;
pub mod launcher;
pub mod path;
pub mod policy;
pub mod telemetry;
pub mod util;

pub use collect::{collect, utf8_vars, Collected, Dropped, EnvironmentSet};
pub use config::{Config, RetryPolicy};
pub use errors::{ConversionError, WenvError};
pub use handoff::{FileConsumer, FileHandoff, HandoffReader, HandoffWriter, HANDOFF_PREFIX};
pub use image::{exec_with_retry, ExecAttempt, Execv, ImageReplacer};
pub use launcher::{Launcher, HELPER_NAME};
pub use path::{MountRoot, PathTranslator};
pub use policy::{PolicyTable, VarPolicy};
