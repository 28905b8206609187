use std::env;
use std::process::ExitCode;

use clap::Parser;
use wenv::{utf8_vars, Config, Launcher};

mod cli;

fn main() -> ExitCode {
    let invocation = cli::Cli::parse().into_invocation();
    wenv::telemetry::init("wenv");

    let config = Config::from_env();
    let launcher = Launcher::from_config(&config);
    match launcher.launch(
        invocation.explicit,
        utf8_vars(env::vars_os()),
        &invocation.command,
    ) {
        Ok(never) => match never {},
        Err(e) => {
            eprintln!("wenv: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
