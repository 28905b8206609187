//! One-shot transport of the translated environment across the WSL/Windows boundary.
//!
//! The launcher writes the payload once; the helper reads it once and deletes it.
//! The file implementation places a uniquely named `wenv*` file in the Windows
//! temp directory, which both sides can reach.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempPath;

use crate::collect::EnvironmentSet;
use crate::errors::WenvError;
use crate::path::PathTranslator;
use crate::util::{ExecRequest, ExecService};

/// Every handoff file name starts with this.
pub const HANDOFF_PREFIX: &str = "wenv";

const PAYLOAD_VERSION: u32 = 1;

#[derive(Serialize)]
struct OutgoingPayload<'a> {
    version: u32,
    vars: &'a EnvironmentSet,
}

#[derive(Deserialize)]
struct IncomingPayload {
    version: u32,
    vars: EnvironmentSet,
}

/// Writer half. The ticket names the written payload and owns it until the reader takes over.
pub trait HandoffWriter {
    type Ticket: AsRef<Path>;

    fn write(&self, vars: &EnvironmentSet) -> Result<Self::Ticket, WenvError>;
}

/// Reader half. Consuming removes the payload.
pub trait HandoffReader {
    fn consume(&self, location: &Path) -> Result<EnvironmentSet, WenvError>;
}

#[derive(Debug, Clone)]
enum TempDir {
    Fixed(PathBuf),
    Host {
        exec: ExecService,
        translator: PathTranslator,
    },
}

/// File-backed handoff writer.
#[derive(Debug, Clone)]
pub struct FileHandoff {
    dir: TempDir,
}

impl FileHandoff {
    /// Write payloads into `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: TempDir::Fixed(dir.into()),
        }
    }

    /// Write payloads into the Windows `%TEMP%`, looked up at write time.
    pub fn in_host_temp(exec: ExecService, translator: PathTranslator) -> Self {
        Self {
            dir: TempDir::Host { exec, translator },
        }
    }

    fn directory(&self) -> Result<PathBuf, WenvError> {
        match &self.dir {
            TempDir::Fixed(p) => Ok(p.clone()),
            TempDir::Host { exec, translator } => host_temp_dir(exec, translator),
        }
    }
}

/// Ask `cmd.exe` for `%TEMP%` and map it into WSL.
pub fn host_temp_dir(
    exec: &ExecService,
    translator: &PathTranslator,
) -> Result<PathBuf, WenvError> {
    let out = exec
        .run(
            ExecRequest::new("cmd.exe")
                .arg("/c")
                .arg("echo %TEMP%")
                .capture_output(true),
        )
        .map_err(|e| WenvError::transport("exec cmd.exe", io::Error::other(format!("{e:#}"))))?;
    if !out.status.success() {
        let stderr = out.stderr.trim();
        let msg = if stderr.is_empty() {
            format!("exited with {}", out.status)
        } else {
            format!("exited with {}: {stderr}", out.status)
        };
        return Err(WenvError::transport("exec cmd.exe", io::Error::other(msg)));
    }
    let raw = out.stdout.trim();
    if raw.is_empty() || raw.contains('%') {
        return Err(WenvError::transport(
            "exec cmd.exe",
            io::Error::other("TEMP is not set on the Windows side"),
        ));
    }
    let dir = PathBuf::from(translator.to_wsl(raw));
    tracing::debug!(
        dir = %dir.display(),
        took_ms = out.duration.as_millis() as u64,
        "host temp directory"
    );
    Ok(dir)
}

impl HandoffWriter for FileHandoff {
    type Ticket = TempPath;

    fn write(&self, vars: &EnvironmentSet) -> Result<TempPath, WenvError> {
        let dir = self.directory()?;
        let mut file = tempfile::Builder::new()
            .prefix(HANDOFF_PREFIX)
            .tempfile_in(&dir)
            .map_err(|e| WenvError::transport("creating temp file", e))?;

        let payload = OutgoingPayload {
            version: PAYLOAD_VERSION,
            vars,
        };
        serde_json::to_writer(&mut file, &payload)
            .map_err(|e| WenvError::transport("encoding handoff payload", e.into()))?;
        file.flush()
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| WenvError::transport("closing temp file", e))?;

        let path = file.into_temp_path();
        tracing::debug!(path = %path.display(), vars = vars.len(), "handoff written");
        Ok(path)
    }
}

/// Reject locations whose file name lacks the handoff prefix.
pub fn validate_location(location: &Path) -> Result<(), WenvError> {
    let ok = location
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(HANDOFF_PREFIX));
    if ok {
        Ok(())
    } else {
        Err(WenvError::InvalidHandoffName(location.to_path_buf()))
    }
}

/// File-backed handoff reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConsumer;

impl HandoffReader for FileConsumer {
    fn consume(&self, location: &Path) -> Result<EnvironmentSet, WenvError> {
        validate_location(location)?;
        let file = File::open(location)
            .map_err(|e| WenvError::transport(location.display().to_string(), e))?;
        let decoded: Result<IncomingPayload, _> = serde_json::from_reader(BufReader::new(file));

        let payload = match decoded {
            Ok(p) if p.version == PAYLOAD_VERSION => Ok(p),
            Ok(p) => Err(WenvError::transport(
                "decoding handoff payload",
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unsupported payload version {}", p.version),
                ),
            )),
            Err(e) => Err(WenvError::transport("decoding handoff payload", e.into())),
        };

        // The payload is single-use whether or not it decoded.
        let removed = fs::remove_file(location);
        let payload = payload?;
        removed.map_err(|e| WenvError::transport("removing temp file", e))?;

        tracing::debug!(path = %location.display(), vars = payload.vars.len(), "handoff consumed");
        Ok(payload.vars)
    }
}
