//! Linux back-end: translates a Capability Set into a Landlock ruleset and
//! commits it via `restrict_self`.

use landlock::{
    Access, AccessFs, AccessNet, PathBeneath, PathFd, Ruleset, RulesetAttr, RulesetCreated,
    RulesetCreatedAttr, ABI,
};

use crate::access::AccessMode;
use crate::capability::CapabilitySet;
use crate::error::{NonoError, Result};
use crate::platform::SupportInfo;

const CANDIDATE_ABIS: [ABI; 5] = [ABI::V5, ABI::V4, ABI::V3, ABI::V2, ABI::V1];

fn best_abi() -> Option<ABI> {
    CANDIDATE_ABIS
        .into_iter()
        .find(|&abi| Ruleset::default().handle_access(AccessFs::from_all(abi)).is_ok())
}

fn is_network_supported(abi: ABI) -> bool {
    matches!(abi, ABI::V4 | ABI::V5)
}

fn access_flags(mode: AccessMode, abi: ABI) -> landlock::BitFlags<AccessFs> {
    let read = AccessFs::from_read(abi);
    let all = AccessFs::from_all(abi);
    match mode {
        AccessMode::Read => read,
        AccessMode::Write => all ^ read,
        AccessMode::ReadWrite => all,
    }
}

pub(crate) fn enforce(caps: &CapabilitySet) -> Result<()> {
    let abi = best_abi().ok_or_else(|| {
        NonoError::unsupported("Landlock is not available on this kernel (requires >= 5.13)")
    })?;

    if caps.is_network_blocked() && !is_network_supported(abi) {
        tracing::warn!(?abi, "kernel lacks Landlock network support for net_blocked");
        return Err(NonoError::unsupported("net_block_unsupported"));
    }

    let mut builder = Ruleset::default()
        .handle_access(AccessFs::from_all(abi))
        .map_err(|e| NonoError::enforce_failed(format!("Landlock FS access setup failed: {e}")))?;

    if caps.is_network_blocked() {
        builder = builder
            .handle_access(AccessNet::from_all(abi))
            .map_err(|e| {
                NonoError::enforce_failed(format!("Landlock network access setup failed: {e}"))
            })?;
    }

    let mut created: RulesetCreated = builder
        .create()
        .map_err(|e| NonoError::enforce_failed(format!("Landlock ruleset creation failed: {e}")))?;

    for cap in caps.fs_capabilities() {
        if !cap.resolved.exists() {
            tracing::warn!(path = %cap.resolved.display(), "skipping capability for path that no longer exists");
            continue;
        }
        let access = access_flags(cap.access, abi);
        let fd = PathFd::new(&cap.resolved).map_err(|e| {
            NonoError::enforce_failed(format!(
                "failed to open {} for Landlock rule: {e}",
                cap.resolved.display()
            ))
        })?;
        created = created
            .add_rule(PathBeneath::new(fd, access))
            .map_err(|e| {
                NonoError::enforce_failed(format!(
                    "failed to add Landlock rule for {}: {e}",
                    cap.resolved.display()
                ))
            })?;
        tracing::debug!(path = %cap.resolved.display(), mode = %cap.access, "added Landlock path rule");
    }

    // net_blocked with network handling requested and zero NetPort rules
    // added means every bind/connect is denied outright.

    let status = created
        .restrict_self()
        .map_err(|e| NonoError::enforce_failed(format!("Landlock restrict_self failed: {e}")))?;

    if status.ruleset == landlock::RulesetStatus::NotEnforced {
        return Err(NonoError::enforce_failed(
            "kernel reported the ruleset as not enforced",
        ));
    }

    tracing::info!(?abi, "applied Landlock sandbox");
    Ok(())
}

pub(crate) fn is_supported() -> bool {
    best_abi().is_some()
}

pub(crate) fn support_info() -> SupportInfo {
    match best_abi() {
        Some(abi) => SupportInfo {
            is_supported: true,
            platform: "linux".to_string(),
            details: format!("Landlock ABI {abi:?} available"),
        },
        None => SupportInfo {
            is_supported: false,
            platform: "linux".to_string(),
            details: "Landlock is not available on this kernel (requires >= 5.13)".to_string(),
        },
    }
}
