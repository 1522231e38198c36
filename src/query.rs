//! Query Engine: answers "would this operation be permitted?" over an
//! immutable, deep-copied snapshot of a Capability Set. Never mutates state
//! and never returns an error — a denial is a normal answer.

use std::path::{Path, PathBuf};

use crate::access::AccessMode;
use crate::capability::{CapabilitySet, FsCap};
use crate::resolver::canonicalize_best_effort;

/// `status` field of a query outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Allowed,
    Denied,
}

/// `reason` field of a query outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    GrantedPath,
    PathNotGranted,
    InsufficientAccess,
    NetworkAllowed,
    NetworkBlocked,
}

/// A structured grant/denial answer. Mandatory keys are `status` and
/// `reason`; the remaining fields are populated per §6's reason table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QueryOutcome {
    pub status: Status,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted: Option<AccessMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<AccessMode>,
}

/// An immutable, deep-copied snapshot of a Capability Set. Mutating the
/// source set after construction never affects outcomes produced here.
#[derive(Debug, Clone)]
pub struct QueryContext {
    fs: Vec<FsCap>,
    net_blocked: bool,
}

impl QueryContext {
    pub fn new(caps: &CapabilitySet) -> Self {
        Self {
            fs: caps.fs_capabilities(),
            net_blocked: caps.is_network_blocked(),
        }
    }

    pub fn query_path(&self, p: impl AsRef<Path>, mode: AccessMode) -> QueryOutcome {
        let resolved = canonicalize_best_effort(p.as_ref());

        let matches: Vec<&FsCap> = self.fs.iter().filter(|c| c.matches(&resolved)).collect();
        if matches.is_empty() {
            return QueryOutcome {
                status: Status::Denied,
                reason: Reason::PathNotGranted,
                granted_path: None,
                granted: None,
                requested: None,
            };
        }

        let granted = matches
            .iter()
            .map(|c| c.access)
            .reduce(AccessMode::join)
            .expect("matches is non-empty");

        let best = best_match(&matches);

        if granted.covers(mode) {
            QueryOutcome {
                status: Status::Allowed,
                reason: Reason::GrantedPath,
                granted_path: Some(best.resolved.clone()),
                granted: Some(granted),
                requested: Some(mode),
            }
        } else {
            QueryOutcome {
                status: Status::Denied,
                reason: Reason::InsufficientAccess,
                granted_path: None,
                granted: Some(granted),
                requested: Some(mode),
            }
        }
    }

    pub fn query_network(&self) -> QueryOutcome {
        if self.net_blocked {
            QueryOutcome {
                status: Status::Denied,
                reason: Reason::NetworkBlocked,
                granted_path: None,
                granted: None,
                requested: None,
            }
        } else {
            QueryOutcome {
                status: Status::Allowed,
                reason: Reason::NetworkAllowed,
                granted_path: None,
                granted: None,
                requested: None,
            }
        }
    }
}

/// Longest-match wins; ties broken by earliest insertion. `max_by_key` keeps
/// the *last* maximal element on ties, so the comparison is inverted here
/// (shorter-or-equal replaces) rather than used directly.
fn best_match<'a>(matches: &[&'a FsCap]) -> &'a FsCap {
    let mut best = matches[0];
    for &c in &matches[1..] {
        if c.resolved.as_os_str().len() > best.resolved.as_os_str().len() {
            best = c;
        }
    }
    best
}
