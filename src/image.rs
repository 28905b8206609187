//! Process image replacement with bounded retry.
//!
//! `execv` of a Windows binary from WSL occasionally fails with ENOMEM even though
//! nothing is wrong; trying again usually succeeds.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::thread;

use crate::config::RetryPolicy;
use crate::errors::WenvError;

/// Outcome of a failed replacement. Success never returns.
#[derive(Debug)]
pub enum ExecAttempt {
    Transient(io::Error),
    Fatal(io::Error),
}

pub trait ImageReplacer {
    /// Replace the current process image. Returns only on failure.
    fn replace(&self, program: &Path, argv: &[OsString]) -> ExecAttempt;
}

/// `execv(2)` inheriting the current environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Execv;

#[cfg(unix)]
impl ImageReplacer for Execv {
    fn replace(&self, program: &Path, argv: &[OsString]) -> ExecAttempt {
        use nix::errno::Errno;
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let to_c = |s: &std::ffi::OsStr| {
            CString::new(s.as_bytes())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
        };
        let prog = match to_c(program.as_os_str()) {
            Ok(p) => p,
            Err(e) => return ExecAttempt::Fatal(e),
        };
        let args = match argv
            .iter()
            .map(|a| to_c(a.as_os_str()))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(a) => a,
            Err(e) => return ExecAttempt::Fatal(e),
        };
        match nix::unistd::execv(&prog, &args) {
            Ok(never) => match never {},
            Err(Errno::ENOMEM) => ExecAttempt::Transient(Errno::ENOMEM.into()),
            Err(e) => ExecAttempt::Fatal(e.into()),
        }
    }
}

#[cfg(not(unix))]
impl ImageReplacer for Execv {
    fn replace(&self, _program: &Path, _argv: &[OsString]) -> ExecAttempt {
        ExecAttempt::Fatal(io::Error::new(
            io::ErrorKind::Unsupported,
            "process image replacement requires a Unix host",
        ))
    }
}

/// Replace the image, retrying transient failures up to `retry.attempts` times in total.
/// Returns only the error that ended the attempts.
pub fn exec_with_retry<R>(
    replacer: &R,
    program: &Path,
    argv: &[OsString],
    retry: &RetryPolicy,
) -> WenvError
where
    R: ImageReplacer + ?Sized,
{
    let mut attempt: u32 = 1;
    loop {
        match replacer.replace(program, argv) {
            ExecAttempt::Fatal(e) => return WenvError::Exec(e),
            ExecAttempt::Transient(e) if attempt >= retry.attempts => {
                tracing::warn!(attempts = attempt, error = %e, "exec kept failing; giving up");
                return WenvError::Exec(e);
            }
            ExecAttempt::Transient(e) => {
                tracing::debug!(attempt, error = %e, "transient exec failure; retrying");
                if !retry.backoff.is_zero() {
                    thread::sleep(retry.backoff);
                }
                attempt += 1;
            }
        }
    }
}
