//! Release manifest and version resolution.
//!
//! # Data Flow
//! ```text
//! channels file (JSON/YAML)
//!     → manifest.rs (parse, atomic snapshot swap)
//!     → Arc<ReleasesStatus> captured per request
//!     → resolver.rs (group/channel/version queries)
//!     → codec.rs (version ⇄ URL token)
//!
//! On change (optional):
//!     watcher.rs detects write
//!     → manifest.rs refresh
//!     → previous snapshot kept if the new file does not parse
//! ```
//!
//! # Design Decisions
//! - The snapshot is immutable; refresh replaces it wholesale
//! - Resolver borrows a snapshot explicitly, no ambient global state
//! - channels.rs is the only place stability ordering is written down

pub mod channels;
pub mod codec;
pub mod manifest;
pub mod resolver;
pub mod watcher;

pub use codec::{url_to_version, version_to_url};
pub use manifest::{Channel, ManifestError, ManifestStore, Release, ReleasesStatus};
pub use resolver::{ChannelGroup, ResolveError, Resolver};
