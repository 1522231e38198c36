//! Capability-based, OS-enforced sandboxing for a host process.
//!
//! A caller declaratively builds a [`CapabilitySet`] (filesystem paths with
//! access modes, network allow/deny, optional command metadata, optional
//! platform-raw rules) and then irreversibly restricts the calling process
//! with [`Sandbox::apply`], so that unauthorized operations fail at the
//! kernel boundary from then on.
//!
//! Two back-ends are supported: Linux (Landlock LSM) and macOS (Seatbelt).
//! Other platforms report [`Sandbox::is_supported`] as `false`.
//!
//! ```no_run
//! use nono::{AccessMode, CapabilitySet, Sandbox};
//!
//! let caps = CapabilitySet::new()
//!     .allow_path("/tmp", AccessMode::ReadWrite)?
//!     .block_network();
//!
//! if Sandbox::is_supported() {
//!     Sandbox::apply(&caps)?;
//! }
//! # Ok::<(), nono::NonoError>(())
//! ```

mod access;
mod capability;
mod error;
mod platform;
mod query;
mod raw_filter;
mod resolver;
mod sandbox;
mod serialize;

pub use access::AccessMode;
pub use capability::{CapabilitySet, CapabilitySource, FsCap};
pub use error::{NonoError, Result};
pub use platform::SupportInfo;
pub use query::{QueryContext, QueryOutcome, Reason, Status};
pub use resolver::{resolve_any, resolve_dir, resolve_file, Resolved};
pub use sandbox::Sandbox;
pub use serialize::{FsEntry, SandboxState};
