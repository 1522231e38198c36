//! Platform back-ends (C7) and platform probe (C8).
//!
//! Exactly one back-end module is compiled in per target via `#[cfg]`; no
//! runtime `dyn Trait` dispatch is needed since the choice is static.

use crate::capability::CapabilitySet;
use crate::error::Result;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as backend;
#[cfg(target_os = "macos")]
use macos as backend;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use unsupported as backend;

/// Platform support details, returned by `Sandbox::support_info`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SupportInfo {
    pub is_supported: bool,
    pub platform: String,
    pub details: String,
}

/// Commit `caps` into the kernel's decision path. Irreversible. Called at
/// most once per process by `Sandbox::apply`.
pub(crate) fn enforce(caps: &CapabilitySet) -> Result<()> {
    backend::enforce(caps)
}

/// Whether enforcement is usable on this platform, with no side effects.
pub(crate) fn is_supported() -> bool {
    backend::is_supported()
}

/// Platform support details, with no side effects.
pub(crate) fn support_info() -> SupportInfo {
    backend::support_info()
}
