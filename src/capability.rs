//! Capability Set: the mutable builder of filesystem, network, command, and
//! raw-rule permissions that gets frozen and handed to a platform back-end.

use std::path::{Path, PathBuf};

use crate::access::AccessMode;
use crate::error::Result;
use crate::raw_filter;
use crate::resolver::{self, canonicalize_best_effort};

/// Origin of a capability grant. Purely informational; never affects
/// enforcement or subsumption.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CapabilitySource {
    User,
    Group { name: String },
    System,
}

impl Default for CapabilitySource {
    fn default() -> Self {
        CapabilitySource::User
    }
}

/// A single filesystem capability grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsCap {
    pub original: String,
    pub resolved: PathBuf,
    pub access: AccessMode,
    pub is_file: bool,
    pub source: CapabilitySource,
}

impl FsCap {
    /// True iff this capability covers `p` under subpath semantics (§4.4).
    pub fn matches(&self, p: &Path) -> bool {
        if self.is_file {
            p == self.resolved
        } else {
            p == self.resolved || p.starts_with(&self.resolved)
        }
    }
}

/// The mutable builder of sandbox permissions.
///
/// Every mutator consumes `self` by value, so callers chain calls:
/// `caps = caps.allow_path(p, mode)?.block_network();`
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    fs: Vec<FsCap>,
    net_blocked: bool,
    cmd_allow: Vec<String>,
    cmd_block: Vec<String>,
    raw_rules: Vec<String>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruct a set from already-resolved parts, used by `SandboxState::to_caps`.
    pub(crate) fn from_parts(
        fs: Vec<FsCap>,
        net_blocked: bool,
        cmd_allow: Vec<String>,
        cmd_block: Vec<String>,
        raw_rules: Vec<String>,
    ) -> Self {
        Self {
            fs,
            net_blocked,
            cmd_allow,
            cmd_block,
            raw_rules,
        }
    }

    /// Append a directory capability. Fails if `p` does not exist or is a file.
    pub fn allow_path(mut self, p: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let r = resolver::resolve_dir(p.as_ref())?;
        self.fs.push(FsCap {
            original: p.as_ref().to_string_lossy().into_owned(),
            resolved: r.resolved,
            access: mode,
            is_file: false,
            source: CapabilitySource::User,
        });
        Ok(self)
    }

    /// Append a file capability. Fails if `p` does not exist or is a directory.
    pub fn allow_file(mut self, p: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let r = resolver::resolve_file(p.as_ref())?;
        self.fs.push(FsCap {
            original: p.as_ref().to_string_lossy().into_owned(),
            resolved: r.resolved,
            access: mode,
            is_file: true,
            source: CapabilitySource::User,
        });
        Ok(self)
    }

    /// Block all outbound/inbound network access. Idempotent.
    pub fn block_network(mut self) -> Self {
        self.net_blocked = true;
        self
    }

    /// Record `name` as an allowed command. Metadata only; never enforced
    /// at the kernel level by this crate. `cmd_allow` is a set: repeated
    /// names are not duplicated.
    pub fn allow_command(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.cmd_allow.contains(&name) {
            self.cmd_allow.push(name);
        }
        self
    }

    /// Record `name` as a blocked command. Metadata only; set semantics as
    /// `allow_command`.
    pub fn block_command(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.cmd_block.contains(&name) {
            self.cmd_block.push(name);
        }
        self
    }

    /// Vet and append a platform-raw rule (Seatbelt S-expression). Rejected
    /// rules raise `Invalid` and leave the set unchanged.
    pub fn platform_rule(mut self, raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        raw_filter::vet(&raw)?;
        self.raw_rules.push(raw);
        Ok(self)
    }

    /// Merge entries sharing `(resolved, is_file)` by joining access,
    /// preserving the position of the first occurrence.
    pub fn deduplicate(mut self) -> Self {
        let mut merged: Vec<FsCap> = Vec::with_capacity(self.fs.len());
        for entry in self.fs.drain(..) {
            if let Some(existing) = merged
                .iter_mut()
                .find(|e| e.resolved == entry.resolved && e.is_file == entry.is_file)
            {
                existing.access = existing.access.join(entry.access);
                existing.source = merge_source(&existing.source, &entry.source);
            } else {
                merged.push(entry);
            }
        }
        self.fs = merged;
        self
    }

    pub fn fs_capabilities(&self) -> Vec<FsCap> {
        self.fs.clone()
    }

    pub fn is_network_blocked(&self) -> bool {
        self.net_blocked
    }

    pub fn cmd_allow(&self) -> &[String] {
        &self.cmd_allow
    }

    pub fn cmd_block(&self) -> &[String] {
        &self.cmd_block
    }

    pub fn raw_rules(&self) -> &[String] {
        &self.raw_rules
    }

    /// True iff some FsCap covers `p`, regardless of access mode.
    pub fn path_covered(&self, p: impl AsRef<Path>) -> bool {
        let resolved = canonicalize_best_effort(p.as_ref());
        self.fs.iter().any(|c| c.matches(&resolved))
    }

    /// Short human-readable summary: every FsCap's resolved path and access,
    /// plus network status.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for cap in &self.fs {
            out.push_str(&format!(
                "{} {} ({})\n",
                if cap.is_file { "file" } else { "dir " },
                cap.resolved.display(),
                cap.access
            ));
        }
        out.push_str(if self.net_blocked {
            "network=blocked\n"
        } else {
            "network=allowed\n"
        });
        out
    }
}

fn merge_source(a: &CapabilitySource, b: &CapabilitySource) -> CapabilitySource {
    if *a == CapabilitySource::User || *b == CapabilitySource::User {
        CapabilitySource::User
    } else if a == b {
        a.clone()
    } else {
        CapabilitySource::System
    }
}
