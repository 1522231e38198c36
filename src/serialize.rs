//! Serialization: the canonical text (JSON-shaped) form of a Capability Set.
//!
//! This split deliberately separates transport (pure data, this module) from
//! materialization (`to_caps`, which re-touches the live filesystem). A
//! `SandboxState` can be decoded on a host that does not share the
//! filesystem the capabilities were registered against.

use crate::access::AccessMode;
use crate::capability::{CapabilitySet, CapabilitySource, FsCap};
use crate::error::{NonoError, Result};
use crate::resolver;

const SCHEMA_VERSION: u32 = 1;

/// The filesystem-independent projection of an `FsCap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub original: String,
    pub access: AccessMode,
    pub is_file: bool,
    pub source: CapabilitySource,
}

/// Immutable serializable snapshot of a Capability Set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxState {
    fs: Vec<FsEntry>,
    net_blocked: bool,
    cmd_allow: Vec<String>,
    cmd_block: Vec<String>,
    raw_rules: Vec<String>,
}

impl SandboxState {
    pub fn from_caps(caps: &CapabilitySet) -> Self {
        let fs = caps
            .fs_capabilities()
            .into_iter()
            .map(|c| FsEntry {
                original: c.original,
                access: c.access,
                is_file: c.is_file,
                source: c.source,
            })
            .collect();

        let mut cmd_allow = caps.cmd_allow().to_vec();
        let mut cmd_block = caps.cmd_block().to_vec();
        cmd_allow.sort();
        cmd_block.sort();

        Self {
            fs,
            net_blocked: caps.is_network_blocked(),
            cmd_allow,
            cmd_block,
            raw_rules: caps.raw_rules().to_vec(),
        }
    }

    /// Re-resolve every `original` against the current filesystem via C1.
    /// Aborts on the first entry that fails to resolve.
    pub fn to_caps(&self) -> Result<CapabilitySet> {
        let mut fs = Vec::with_capacity(self.fs.len());
        for entry in &self.fs {
            let resolved = if entry.is_file {
                resolver::resolve_file(&entry.original)?
            } else {
                resolver::resolve_dir(&entry.original)?
            };
            fs.push(FsCap {
                original: entry.original.clone(),
                resolved: resolved.resolved,
                access: entry.access,
                is_file: entry.is_file,
                source: entry.source.clone(),
            });
        }

        Ok(CapabilitySet::from_parts(
            fs,
            self.net_blocked,
            self.cmd_allow.clone(),
            self.cmd_block.clone(),
            self.raw_rules.clone(),
        ))
    }

    pub fn net_blocked(&self) -> bool {
        self.net_blocked
    }

    /// Encode to the canonical text form: deterministic key order, `fs` in
    /// insertion order, command lists sorted.
    pub fn to_text(&self) -> String {
        let wire = wire::SandboxStateWire::from(self);
        serde_json::to_string(&wire).expect("SandboxState contains only plain data")
    }

    /// Decode from the canonical text form. Fails with `Invalid` on
    /// malformed text or any schema violation.
    pub fn from_text(text: &str) -> Result<Self> {
        let wire: wire::SandboxStateWire = serde_json::from_str(text)
            .map_err(|e| NonoError::invalid(format!("malformed sandbox state: {e}")))?;

        if wire.version != SCHEMA_VERSION {
            return Err(NonoError::invalid(format!(
                "unknown schema version: {}",
                wire.version
            )));
        }

        Ok(wire.into())
    }
}

/// Wire-format structs kept separate from the public API so the public
/// `SandboxState` never exposes serde derives directly.
mod wire {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct FsEntryWire {
        pub original: String,
        pub access: AccessMode,
        pub is_file: bool,
        pub source: CapabilitySource,
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct SandboxStateWire {
        pub fs: Vec<FsEntryWire>,
        pub net_blocked: bool,
        pub cmd_allow: Vec<String>,
        pub cmd_block: Vec<String>,
        pub raw_rules: Vec<String>,
        pub version: u32,
    }

    impl From<&SandboxState> for SandboxStateWire {
        fn from(s: &SandboxState) -> Self {
            Self {
                fs: s
                    .fs
                    .iter()
                    .map(|e| FsEntryWire {
                        original: e.original.clone(),
                        access: e.access,
                        is_file: e.is_file,
                        source: e.source.clone(),
                    })
                    .collect(),
                net_blocked: s.net_blocked,
                cmd_allow: s.cmd_allow.clone(),
                cmd_block: s.cmd_block.clone(),
                raw_rules: s.raw_rules.clone(),
                version: SCHEMA_VERSION,
            }
        }
    }

    impl From<SandboxStateWire> for SandboxState {
        fn from(w: SandboxStateWire) -> Self {
            SandboxState {
                fs: w
                    .fs
                    .into_iter()
                    .map(|e| FsEntry {
                        original: e.original,
                        access: e.access,
                        is_file: e.is_file,
                        source: e.source,
                    })
                    .collect(),
                net_blocked: w.net_blocked,
                cmd_allow: w.cmd_allow,
                cmd_block: w.cmd_block,
                raw_rules: w.raw_rules,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trip_with_network_blocked() {
        let caps = CapabilitySet::new().block_network();
        let state = SandboxState::from_caps(&caps);
        let text = state.to_text();
        let decoded = SandboxState::from_text(&text).unwrap();
        assert!(decoded.net_blocked());
        assert_eq!(decoded, state);
    }

    #[test]
    fn round_trip_preserves_state_even_when_path_no_longer_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();

        let caps = CapabilitySet::new()
            .allow_file(&file, AccessMode::Read)
            .unwrap();
        let state = SandboxState::from_caps(&caps);
        let text = state.to_text();

        std::fs::remove_file(&file).unwrap();

        // Decoding never touches the filesystem, so this must still succeed.
        let decoded = SandboxState::from_text(&text).unwrap();
        assert_eq!(decoded, state);

        // Only materialization re-touches the filesystem, and fails now.
        assert!(matches!(decoded.to_caps(), Err(NonoError::NotFound { .. })));
    }

    #[test]
    fn from_text_rejects_missing_required_keys() {
        assert!(SandboxState::from_text("{}").is_err());
    }

    #[test]
    fn from_text_rejects_unknown_fields() {
        let text = r#"{"fs":[],"net_blocked":false,"cmd_allow":[],"cmd_block":[],"raw_rules":[],"version":1,"extra":true}"#;
        assert!(SandboxState::from_text(text).is_err());
    }

    #[test]
    fn from_text_rejects_unknown_version() {
        let text = r#"{"fs":[],"net_blocked":false,"cmd_allow":[],"cmd_block":[],"raw_rules":[],"version":2}"#;
        assert!(SandboxState::from_text(text).is_err());
    }

    #[test]
    fn to_text_sorts_command_lists_and_preserves_fs_order() {
        let temp_b = TempDir::new().unwrap();
        let temp_a = TempDir::new().unwrap();
        let caps = CapabilitySet::new()
            .allow_path(temp_b.path(), AccessMode::Read)
            .unwrap()
            .allow_path(temp_a.path(), AccessMode::Write)
            .unwrap()
            .allow_command("zeta")
            .allow_command("alpha");

        let state = SandboxState::from_caps(&caps);
        let text = state.to_text();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["cmd_allow"], serde_json::json!(["alpha", "zeta"]));
        assert_eq!(value["fs"][0]["original"], temp_b.path().to_string_lossy().as_ref());
        assert_eq!(value["fs"][1]["original"], temp_a.path().to_string_lossy().as_ref());
    }

    #[test]
    fn materialization_failure_reports_wrong_kind() {
        let temp = TempDir::new().unwrap();
        let caps = CapabilitySet::new()
            .allow_path(temp.path(), AccessMode::Read)
            .unwrap();
        let mut state = SandboxState::from_caps(&caps);
        // Corrupt the entry to claim it's a file when the original is a directory.
        state.fs[0].is_file = true;

        assert!(matches!(state.to_caps(), Err(NonoError::WrongKind { .. })));
    }
}
