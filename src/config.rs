//! Launcher configuration, assembled once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::path::{MountRoot, DEFAULT_WSL_CONF};
use crate::policy::POLICY_ENV;

/// Overrides the location of `/etc/wsl.conf`.
pub const WSL_CONF_ENV: &str = "WENV_WSL_CONF";
/// Delay between exec retries, in milliseconds.
pub const EXEC_BACKOFF_ENV: &str = "WENV_EXEC_BACKOFF_MS";
/// Timeout for the `cmd.exe` temp directory query, in seconds. 0 waits forever.
pub const CMD_TIMEOUT_ENV: &str = "WENV_CMD_TIMEOUT_SECS";

/// Total exec attempts when the kernel reports a transient ENOMEM.
pub const EXEC_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: EXEC_ATTEMPTS,
            backoff: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Raw `WENV` value; parsed only when no explicit variables were given.
    pub policy_spec: Option<String>,
    pub mount_root: MountRoot,
    pub retry: RetryPolicy,
    pub cmd_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let wsl_conf = env::var_os(WSL_CONF_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WSL_CONF));
        let mount_root = MountRoot::load(&wsl_conf);
        let policy_spec = env::var(POLICY_ENV).ok().filter(|v| !v.is_empty());
        let retry = RetryPolicy {
            backoff: Duration::from_millis(env_u64(EXEC_BACKOFF_ENV).unwrap_or(0)),
            ..RetryPolicy::default()
        };
        let cmd_timeout = Duration::from_secs(env_u64(CMD_TIMEOUT_ENV).unwrap_or(0));
        tracing::debug!(
            mount_root = mount_root.as_str(),
            wsl_conf = %wsl_conf.display(),
            backoff_ms = retry.backoff.as_millis() as u64,
            "configuration loaded"
        );
        Self {
            policy_spec,
            mount_root,
            retry,
            cmd_timeout,
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let v = env::var(key).ok()?;
    match v.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(var = key, value = %v, "ignoring non-numeric value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_reads_overrides() {
        let td = tempfile::tempdir().expect("tmpdir");
        let conf = td.path().join("wsl.conf");
        std::fs::write(&conf, "[automount]\nroot = \"/drives/\"\n").unwrap();

        let old_conf = env::var_os(WSL_CONF_ENV);
        let old_backoff = env::var_os(EXEC_BACKOFF_ENV);
        env::set_var(WSL_CONF_ENV, &conf);
        env::set_var(EXEC_BACKOFF_ENV, "25");

        let cfg = Config::from_env();
        assert_eq!(cfg.mount_root.as_str(), "/drives/");
        assert_eq!(cfg.retry.attempts, 10);
        assert_eq!(cfg.retry.backoff, Duration::from_millis(25));

        match old_conf {
            Some(v) => env::set_var(WSL_CONF_ENV, v),
            None => env::remove_var(WSL_CONF_ENV),
        }
        match old_backoff {
            Some(v) => env::set_var(EXEC_BACKOFF_ENV, v),
            None => env::remove_var(EXEC_BACKOFF_ENV),
        }
    }

    #[test]
    fn test_retry_default() {
        let r = RetryPolicy::default();
        assert_eq!(r.attempts, EXEC_ATTEMPTS);
        assert!(r.backoff.is_zero());
    }
}
