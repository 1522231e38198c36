//! End-to-end scenarios exercising the public API surface together, mirroring
//! real call sequences a caller would make: build a capability set, query
//! it, serialize it, and observe platform probing.

use nono::{AccessMode, CapabilitySet, QueryContext, Reason, SandboxState, Status};
use tempfile::TempDir;

/// Installs a `tracing-subscriber` `EnvFilter` subscriber so the crate's
/// `tracing::debug!`/`warn!`/`info!` events are observable when running
/// with `RUST_LOG` set, e.g. `RUST_LOG=nono=debug cargo test`. Idempotent
/// across the suite's many test binaries via `try_init`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn empty_set_denies_every_path_and_allows_network() {
    init_tracing();
    let caps = CapabilitySet::new();
    let ctx = QueryContext::new(&caps);

    let outcome = ctx.query_path("/tmp/x", AccessMode::Read);
    assert_eq!(outcome.status, Status::Denied);
    assert_eq!(outcome.reason, Reason::PathNotGranted);

    let network = ctx.query_network();
    assert_eq!(network.status, Status::Allowed);
    assert_eq!(network.reason, Reason::NetworkAllowed);
}

#[test]
fn directory_grant_covers_subtree_but_not_excess_access() {
    let temp = TempDir::new().unwrap();
    let caps = CapabilitySet::new()
        .allow_path(temp.path(), AccessMode::Read)
        .unwrap();
    let ctx = QueryContext::new(&caps);

    let nested = temp.path().join("a").join("b");
    assert_eq!(ctx.query_path(&nested, AccessMode::Read).status, Status::Allowed);

    let denied = ctx.query_path(&nested, AccessMode::Write);
    assert_eq!(denied.status, Status::Denied);
    assert_eq!(denied.reason, Reason::InsufficientAccess);
    assert_eq!(denied.granted, Some(AccessMode::Read));
    assert_eq!(denied.requested, Some(AccessMode::Write));
}

#[test]
fn file_capability_is_exact_not_a_directory_prefix() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("f");
    std::fs::write(&file, b"hello").unwrap();

    let caps = CapabilitySet::new()
        .allow_file(&file, AccessMode::Read)
        .unwrap();
    let ctx = QueryContext::new(&caps);

    assert_eq!(ctx.query_path(&file, AccessMode::Read).status, Status::Allowed);

    let other = temp.path().join("other");
    let outcome = ctx.query_path(&other, AccessMode::Read);
    assert_eq!(outcome.status, Status::Denied);
    assert_eq!(outcome.reason, Reason::PathNotGranted);
}

#[test]
fn deduplicate_merges_repeated_grants_into_one_readwrite_entry() {
    let temp = TempDir::new().unwrap();
    let caps = CapabilitySet::new()
        .allow_path(temp.path(), AccessMode::Read)
        .unwrap()
        .allow_path(temp.path(), AccessMode::Write)
        .unwrap()
        .deduplicate();

    let fs = caps.fs_capabilities();
    assert_eq!(fs.len(), 1);
    assert_eq!(fs[0].access, AccessMode::ReadWrite);
}

#[test]
fn round_trip_preserves_network_block() {
    let caps = CapabilitySet::new().block_network();
    let state = SandboxState::from_caps(&caps);
    let text = state.to_text();
    let decoded = SandboxState::from_text(&text).unwrap();
    assert!(decoded.net_blocked());
}

#[test]
fn platform_rule_with_root_subpath_is_rejected() {
    let result = CapabilitySet::new().platform_rule(r#"(allow file-read* (subpath "/"))"#);
    assert!(result.is_err());
}

#[test]
fn stale_state_fails_materialization_but_not_decoding() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("f");
    std::fs::write(&file, b"x").unwrap();

    let caps = CapabilitySet::new()
        .allow_file(&file, AccessMode::Read)
        .unwrap();
    let state = SandboxState::from_caps(&caps);
    let text = state.to_text();

    std::fs::remove_file(&file).unwrap();

    let decoded = SandboxState::from_text(&text).unwrap();
    assert!(decoded.to_caps().is_err());
}

#[test]
fn probe_is_consistent_with_support_info() {
    assert_eq!(
        nono::Sandbox::is_supported(),
        nono::Sandbox::support_info().is_supported
    );
}
