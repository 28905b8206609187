use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use wenv::util::split_leading_assignments;
use wenv::EnvironmentSet;

#[derive(Parser, Debug)]
#[command(
    name = "wenv",
    version,
    about = "Pass environment variables to Windows programs started from WSL.",
    override_usage = "wenv 'var=x' ... command.exe [arg ...]\n       [var=x ...] wenv command.exe [arg ...]",
    after_help = concat!(
        "With leading var=x arguments only those variables are passed, unconverted.\n",
        "Otherwise the whole environment is passed following the WENV policy:\n",
        "  WENV='var1, !var2, @var3, #var4, $var5'\n",
        "! ignores a variable, @ converts it to a Windows path, # converts a path list,\n",
        "$ (or no modifier) passes it as-is."
    )
)]
pub(crate) struct Cli {
    /// Leading var=x assignments, then the command and its arguments
    #[arg(
        value_name = "ARGS",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

/// Parsed invocation: explicit variables plus the command line to run.
#[derive(Debug)]
pub(crate) struct Invocation {
    pub explicit: EnvironmentSet,
    pub command: Vec<String>,
}

impl Cli {
    /// Exits with status 2 when no command follows the assignments.
    pub(crate) fn into_invocation(self) -> Invocation {
        let (assignments, command) = split_leading_assignments(&self.args);
        if command.is_empty() {
            Cli::command()
                .error(ErrorKind::MissingRequiredArgument, "missing command to run")
                .exit();
        }
        Invocation {
            explicit: assignments.into_iter().collect(),
            command: command.to_vec(),
        }
    }
}
