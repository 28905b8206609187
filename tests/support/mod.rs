/*!
Test support helpers shared across integration tests.

- executable(dir, name): drop a runnable shell script into dir
- script(dir, name, body): same, with a custom body
- write_handoff(dir, vars): write a handoff file the way the launcher does and keep it
- stderr_of(out): lossy stderr text for assertions
*/

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Create an executable `#!/bin/sh` script that exits 0.
#[allow(dead_code)]
#[cfg(unix)]
pub fn executable(dir: &Path, name: &str) -> PathBuf {
    script(dir, name, "exit 0")
}

/// Create an executable `#!/bin/sh` script running `body`.
#[allow(dead_code)]
#[cfg(unix)]
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let p = dir.join(name);
    std::fs::write(&p, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&p, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    p
}

/// Write a handoff payload into `dir` and detach it from the writer so it persists.
#[allow(dead_code)]
pub fn write_handoff(dir: &Path, vars: &[(&str, &str)]) -> PathBuf {
    use wenv::HandoffWriter;
    let vars: BTreeMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    wenv::FileHandoff::in_dir(dir)
        .write(&vars)
        .expect("write handoff")
        .keep()
        .expect("keep handoff")
}

#[allow(dead_code)]
pub fn stderr_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}
