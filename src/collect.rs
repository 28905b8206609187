//! Build the variable set handed to the Windows side.

use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::errors::ConversionError;
use crate::path::PathTranslator;
use crate::policy::{PolicyTable, VarPolicy};

/// Name -> value mapping transmitted across the boundary.
pub type EnvironmentSet = BTreeMap<String, String>;

/// Result of a collection pass: the variables to send plus everything dropped on the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Collected {
    pub vars: EnvironmentSet,
    pub dropped: Vec<Dropped>,
}

/// A variable or path-list segment left out because it has no Windows form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub name: String,
    pub error: ConversionError,
}

/// Explicit variables win outright; otherwise apply policy and translation to `ambient`.
pub fn collect<I>(
    explicit: EnvironmentSet,
    ambient: I,
    policy: &PolicyTable,
    translator: &PathTranslator,
) -> Collected
where
    I: IntoIterator<Item = (String, String)>,
{
    if !explicit.is_empty() {
        return Collected {
            vars: explicit,
            dropped: Vec::new(),
        };
    }

    let mut out = Collected::default();
    for (name, value) in ambient {
        match policy.get(&name) {
            VarPolicy::Ignore => {}
            VarPolicy::Pass => {
                out.vars.insert(name, value);
            }
            VarPolicy::Convert => match translator.to_windows(&value) {
                Ok(win) => {
                    out.vars.insert(name, win);
                }
                Err(error) => {
                    tracing::debug!(var = %name, %error, "dropping variable");
                    out.dropped.push(Dropped { name, error });
                }
            },
            VarPolicy::PathList => {
                let mut kept: Vec<String> = Vec::new();
                for segment in value.split(':').filter(|s| !s.is_empty()) {
                    match translator.to_windows(segment) {
                        Ok(win) => kept.push(win),
                        Err(error) => {
                            tracing::debug!(var = %name, %error, "dropping path list entry");
                            out.dropped.push(Dropped {
                                name: name.clone(),
                                error,
                            });
                        }
                    }
                }
                out.vars.insert(name, kept.join(";"));
            }
        }
    }
    out
}

/// UTF-8 view of an OS environment; anything else cannot travel in the payload.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            (k, _) => {
                tracing::debug!(var = ?k, "skipping variable that is not valid UTF-8");
                None
            }
        })
}
