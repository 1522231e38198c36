//! macOS back-end: generates a Seatbelt (SBPL) profile from a Capability Set
//! and commits it in-process via `sandbox_init`.

use std::ffi::CString;
use std::fmt::Write as _;
use std::path::Path;
use std::ptr;

use crate::access::AccessMode;
use crate::capability::CapabilitySet;
use crate::error::{NonoError, Result};
use crate::platform::SupportInfo;

const BASELINE_PROFILE: &str = "\
(version 1)
(deny default)
(allow file-read* file-write*
  (literal \"/dev/null\")
  (literal \"/dev/zero\")
  (literal \"/dev/stdout\")
  (literal \"/dev/stderr\")
  (literal \"/dev/stdin\")
  (literal \"/dev/tty\"))
(allow file-read*
  (literal \"/dev/random\")
  (literal \"/dev/urandom\"))
";

pub(crate) fn enforce(caps: &CapabilitySet) -> Result<()> {
    let profile = generate_profile(caps)?;
    tracing::debug!(len = profile.len(), "generated Seatbelt profile");

    let cprofile = CString::new(profile)
        .map_err(|_| NonoError::invalid("generated Seatbelt profile contains a NUL byte"))?;

    // SAFETY: `sandbox_init` is the stable macOS Seatbelt entry point. We pass
    // a valid NUL-terminated C string and a pointer to receive an error
    // message; flags `0` means "profile is literal text", not a named
    // built-in profile.
    let mut error: *mut i8 = ptr::null_mut();
    let result = unsafe { sandbox_init(cprofile.as_ptr(), 0, &mut error) };

    if result == 0 {
        tracing::info!("applied Seatbelt sandbox");
        return Ok(());
    }

    let message = if error.is_null() {
        "sandbox_init failed with an unknown error".to_string()
    } else {
        // SAFETY: `error` was allocated by sandbox_init and is a valid C string.
        let msg = unsafe { std::ffi::CStr::from_ptr(error) }
            .to_string_lossy()
            .into_owned();
        // SAFETY: `error` must be released with sandbox_free_error exactly once.
        unsafe { sandbox_free_error(error) };
        msg
    };
    Err(NonoError::enforce_failed(message))
}

pub(crate) fn is_supported() -> bool {
    true
}

pub(crate) fn support_info() -> SupportInfo {
    SupportInfo {
        is_supported: true,
        platform: "macos".to_string(),
        details: "Seatbelt (sandbox_init) is available".to_string(),
    }
}

fn generate_profile(caps: &CapabilitySet) -> Result<String> {
    let mut profile = BASELINE_PROFILE.to_string();

    for cap in caps.fs_capabilities() {
        let escaped = escape_path(&cap.resolved)?;
        let filter = if cap.is_file { "literal" } else { "subpath" };
        match cap.access {
            AccessMode::Read => {
                let _ = writeln!(profile, "(allow file-read* ({filter} {escaped}))");
            }
            AccessMode::Write => {
                let _ = writeln!(profile, "(allow file-write* ({filter} {escaped}))");
            }
            AccessMode::ReadWrite => {
                let _ = writeln!(profile, "(allow file-read* ({filter} {escaped}))");
                let _ = writeln!(profile, "(allow file-write* ({filter} {escaped}))");
            }
        }
    }

    if caps.is_network_blocked() {
        tracing::debug!("network blocked: omitting network grant (deny default covers it)");
    } else {
        profile.push_str("(allow network*)\n");
    }

    for rule in caps.raw_rules() {
        profile.push_str(rule);
        profile.push('\n');
    }

    Ok(profile)
}

/// Escape and quote a resolved, absolute path for use in an SBPL expression.
/// Rejects characters that could break out of the line-oriented profile
/// syntax (newline, CR, NUL, parens, semicolon).
fn escape_path(path: &Path) -> Result<String> {
    let path_str = path
        .to_str()
        .ok_or_else(|| NonoError::invalid(format!("non-UTF-8 path: {}", path.display())))?;

    if path_str
        .bytes()
        .any(|b| matches!(b, b'\n' | b'\r' | b'\0' | b'(' | b')' | b';'))
    {
        return Err(NonoError::invalid(format!(
            "path contains characters that could inject into the sandbox profile: {path_str}"
        )));
    }

    let escaped = path_str.replace('\\', r"\\").replace('"', r#"\""#);
    Ok(format!("\"{escaped}\""))
}

// FFI bindings to the macOS Seatbelt sandbox API.
unsafe extern "C" {
    fn sandbox_init(profile: *const i8, flags: u64, errorbuf: *mut *mut i8) -> i32;
    fn sandbox_free_error(errorbuf: *mut i8);
}
