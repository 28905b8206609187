#![allow(clippy::module_name_repetitions)]
//! Small utilities: quote stripping, `name=value` splitting, command execution.

pub mod exec;

pub use exec::{ExecOutput, ExecRequest, ExecService};

/// Extract outer single or double quotes if the whole string is wrapped.
pub fn strip_outer_quotes(s: &str) -> String {
    if s.len() >= 2 {
        let b = s.as_bytes();
        let first = b[0] as char;
        let last = b[s.len() - 1] as char;
        if (first == '\'' && last == '\'') || (first == '"' && last == '"') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// Split `name=value` at the first `=`. Returns None when there is no `=`.
pub fn split_assignment(s: &str) -> Option<(&str, &str)> {
    s.split_once('=')
}

/// Split leading `name=value` tokens off an argument list.
///
/// Tokens are consumed while they contain `=`; the first token without one and
/// everything after it is returned as the command line.
pub fn split_leading_assignments(args: &[String]) -> (Vec<(String, String)>, &[String]) {
    let mut vars = Vec::new();
    let mut rest = args;
    while let Some((first, tail)) = rest.split_first() {
        let Some((k, v)) = split_assignment(first) else {
            break;
        };
        vars.push((k.to_string(), v.to_string()));
        rest = tail;
    }
    (vars, rest)
}
