//! Top-level `Sandbox` entry point: ties the platform probe and back-end
//! together with the process-wide "applied once" guard.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::capability::CapabilitySet;
use crate::error::{NonoError, Result};
use crate::platform::{self, SupportInfo};

static APPLIED: AtomicBool = AtomicBool::new(false);

/// Entry point for platform probing and irreversible enforcement.
///
/// `apply` restricts only the calling thread (Landlock's kernel contract);
/// callers must invoke it before spawning any other thread that should
/// honor the sandbox, since Landlock does not offer a thread-group-wide
/// restrict primitive — children created afterward inherit it via normal
/// fork/clone rules.
pub struct Sandbox;

impl Sandbox {
    /// Whether enforcement is usable on this platform. No side effects.
    pub fn is_supported() -> bool {
        platform::is_supported()
    }

    /// Platform support details. No side effects.
    pub fn support_info() -> SupportInfo {
        platform::support_info()
    }

    /// Commit `caps` into the kernel's decision path. Irreversible.
    ///
    /// Fails with `AlreadyApplied` if called more than once in this
    /// process. On failure the process is left exactly as before the call;
    /// on success every operation outside the granted capabilities fails at
    /// the kernel boundary from this point on.
    pub fn apply(caps: &CapabilitySet) -> Result<()> {
        if APPLIED.swap(true, Ordering::SeqCst) {
            return Err(NonoError::AlreadyApplied);
        }

        match platform::enforce(caps) {
            Ok(()) => Ok(()),
            Err(e) => {
                // Enforcement did not commit; a caller may try a new set.
                APPLIED.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}
