//! Fallback back-end for targets with neither Landlock nor Seatbelt.

use crate::capability::CapabilitySet;
use crate::error::{NonoError, Result};
use crate::platform::SupportInfo;

fn reason() -> String {
    format!(
        "no sandboxing back-end is available for target_os = \"{}\"",
        std::env::consts::OS
    )
}

pub(crate) fn enforce(_caps: &CapabilitySet) -> Result<()> {
    Err(NonoError::unsupported(reason()))
}

pub(crate) fn is_supported() -> bool {
    false
}

pub(crate) fn support_info() -> SupportInfo {
    SupportInfo {
        is_supported: false,
        platform: std::env::consts::OS.to_string(),
        details: reason(),
    }
}
