//! Windows side: install the handed-off environment and run the target.
//!
//! Invoked as `wenvhelper <handoff-file> <target-path> <argv0> [arg ...]`.

use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::collect::EnvironmentSet;
use crate::errors::{WenvError, EXIT_CANNOT_EXECUTE};
use crate::handoff::{validate_location, HandoffReader};

/// Consume the handoff, start the target and wait for it. Returns the target's exit code.
pub fn run<R>(reader: &R, args: &[OsString]) -> Result<i32, WenvError>
where
    R: HandoffReader + ?Sized,
{
    let [location, target, argv @ ..] = args else {
        return Err(WenvError::Usage("too few arguments".to_string()));
    };
    let Some((argv0, rest)) = argv.split_first() else {
        return Err(WenvError::Usage("too few arguments".to_string()));
    };

    let location = Path::new(location);
    validate_location(location)?;
    let vars = reader.consume(location)?;
    install(&vars)?;

    let mut cmd = Command::new(target);
    cmd.args(rest);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.arg0(argv0);
    }
    // Windows has no separate argv[0]; the command line starts with `target` itself.
    #[cfg(not(unix))]
    let _ = argv0;

    let mut child = cmd.spawn().map_err(WenvError::Spawn)?;
    tracing::debug!(pid = child.id(), target = ?target, "target started");
    let status = child.wait().map_err(WenvError::Spawn)?;
    Ok(exit_code_of(status))
}

/// Set every variable in this process, overwriting inherited values.
///
/// All entries are checked before the first one is set, so a bad payload leaves
/// the environment untouched.
pub fn install(vars: &EnvironmentSet) -> Result<(), WenvError> {
    for (name, value) in vars {
        if name.is_empty() || name.contains(['=', '\0']) || value.contains('\0') {
            return Err(WenvError::SetEnv(format!("invalid variable {name:?}")));
        }
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }
    Ok(())
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    i32::from(EXIT_CANNOT_EXECUTE)
}
