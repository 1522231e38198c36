//! Raw-Rule Safety Filter: rejects user-supplied Seatbelt S-expressions that
//! would nullify the sandbox. Conservative by design — it errs toward
//! rejection rather than trying to fully parse SBPL.

use crate::error::{NonoError, Result};

const FORBIDDEN_VERBS: &[&str] = &["file-read*", "file-write*", "process-exec", "network*"];
const BROAD_SUBPATHS: &[&str] = &["subpath \"/\"", "subpath '/'"];
const UNCONDITIONAL_GRANTS: &[&str] = &["(allow default)"];

/// Vet a raw platform rule. Returns `Ok(())` if acceptable, or `Invalid`
/// with a `fragment` describing the rejected substring.
pub fn vet(raw: &str) -> Result<()> {
    for grant in UNCONDITIONAL_GRANTS {
        if raw.contains(grant) {
            return Err(rejected(grant));
        }
    }

    if raw.contains("(allow") {
        for verb in FORBIDDEN_VERBS {
            if raw.contains(verb) {
                for broad in BROAD_SUBPATHS {
                    if raw.contains(broad) {
                        return Err(rejected(&format!("{verb} ... {broad}")));
                    }
                }
            }
        }
    }

    Ok(())
}

fn rejected(fragment: &str) -> NonoError {
    tracing::warn!(fragment, "rejected platform rule: rule_too_broad");
    NonoError::invalid(format!("rule_too_broad: {fragment}"))
}
