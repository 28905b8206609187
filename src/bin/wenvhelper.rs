//! Helper for `wenv`, built for and run on the Windows side.
//!
//! The first argument names the handoff file holding the environment; the rest
//! name the program to run and its argv.

use std::env;
use std::ffi::OsString;
use std::process;

use wenv::helper;
use wenv::FileConsumer;

fn main() {
    wenv::telemetry::init("wenvhelper");
    let args: Vec<OsString> = env::args_os().skip(1).collect();
    match helper::run(&FileConsumer, &args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("wenvhelper: {e}");
            process::exit(i32::from(e.exit_code()));
        }
    }
}
