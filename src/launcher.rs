//! WSL side: translate the environment, hand it off and become the helper.

use std::convert::Infallible;
use std::ffi::OsString;
use std::path::Path;

use crate::collect::{collect, EnvironmentSet};
use crate::config::{Config, RetryPolicy};
use crate::errors::{ConversionError, WenvError};
use crate::handoff::{FileHandoff, HandoffWriter};
use crate::image::{exec_with_retry, Execv, ImageReplacer};
use crate::path::PathTranslator;
use crate::policy::PolicyTable;
use crate::util::ExecService;

/// Helper executable looked up on the search path.
pub const HELPER_NAME: &str = "wenvhelper.exe";

pub struct Launcher<W, R> {
    translator: PathTranslator,
    policy_spec: Option<String>,
    helper: String,
    retry: RetryPolicy,
    writer: W,
    replacer: R,
}

impl Launcher<FileHandoff, Execv> {
    pub fn from_config(config: &Config) -> Self {
        let translator = PathTranslator::new(config.mount_root.clone());
        let writer =
            FileHandoff::in_host_temp(ExecService::new(config.cmd_timeout), translator.clone());
        Launcher::new(translator, writer, Execv)
            .with_policy_spec(config.policy_spec.clone())
            .with_retry(config.retry.clone())
    }
}

impl<W, R> Launcher<W, R>
where
    W: HandoffWriter,
    R: ImageReplacer,
{
    pub fn new(translator: PathTranslator, writer: W, replacer: R) -> Self {
        Self {
            translator,
            policy_spec: None,
            helper: HELPER_NAME.to_string(),
            retry: RetryPolicy::default(),
            writer,
            replacer,
        }
    }

    pub fn with_policy_spec(mut self, spec: Option<String>) -> Self {
        self.policy_spec = spec;
        self
    }

    pub fn with_helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = helper.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The variables to transmit: `explicit` verbatim, or the policy-filtered ambient set.
    pub fn prepare<I>(
        &self,
        explicit: EnvironmentSet,
        ambient: I,
    ) -> Result<EnvironmentSet, WenvError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if !explicit.is_empty() {
            return Ok(explicit);
        }
        let policy = PolicyTable::resolve(self.policy_spec.as_deref())?;
        let collected = collect(EnvironmentSet::new(), ambient, &policy, &self.translator);
        if !collected.dropped.is_empty() {
            tracing::debug!(
                dropped = collected.dropped.len(),
                "entries without a Windows form were left out"
            );
        }
        Ok(collected.vars)
    }

    /// Run `command` on the Windows side. Returns only on failure.
    pub fn launch<I>(
        &self,
        explicit: EnvironmentSet,
        ambient: I,
        command: &[String],
    ) -> Result<Infallible, WenvError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let Some(target) = command.first() else {
            return Err(WenvError::Usage("missing command".to_string()));
        };
        let vars = self.prepare(explicit, ambient)?;

        let target_path = which::which(target).map_err(|source| WenvError::TargetNotFound {
            name: target.clone(),
            source,
        })?;
        let win_target = target_path
            .to_str()
            .ok_or_else(|| ConversionError::new(target_path.to_string_lossy()))
            .and_then(|p| self.translator.to_windows(p))
            .map_err(WenvError::TargetConversion)?;

        // Dropping the ticket on any failure below removes the handoff file.
        let ticket = self.writer.write(&vars)?;

        let helper_path = which::which(&self.helper).map_err(|source| WenvError::Lookup {
            name: self.helper.clone(),
            source,
        })?;
        let location: &Path = ticket.as_ref();
        let win_location = location
            .to_str()
            .ok_or_else(|| ConversionError::new(location.to_string_lossy()))
            .and_then(|p| self.translator.to_windows(p))?;

        let helper_name = Path::new(&self.helper)
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(HELPER_NAME));
        let mut argv: Vec<OsString> = vec![helper_name, win_location.into(), win_target.into()];
        argv.extend(command.iter().map(OsString::from));

        tracing::debug!(
            helper = %helper_path.display(),
            target = %target_path.display(),
            vars = vars.len(),
            "replacing process image"
        );
        let err = exec_with_retry(&self.replacer, &helper_path, &argv, &self.retry);
        drop(ticket);
        Err(err)
    }
}
