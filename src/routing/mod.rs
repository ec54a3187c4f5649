//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions, extract lang/group/channel)
//!     → Return: matched Route or Static
//!
//! x-original-uri header
//!     → target.rs (language, version token, page suffix)
//!     → consumed by menu building and redirects
//!
//! Route Compilation (at startup):
//!     VersionsConfig
//!     → escape location / templates prefixes
//!     → compile patterns in specificity order
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by specificity)
//! - URL shapes are separate matchers, each testable alone

pub mod matcher;
pub mod router;
pub mod target;

pub use router::{Route, Router};
pub use target::{lang_prefix, DocTarget, Lang, TargetParser, TargetShape};
