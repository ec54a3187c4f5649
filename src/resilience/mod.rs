//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Redirect target computed by a handler:
//!     → url_validation.rs (GET, follow 301/302 up to the attempt limit)
//!     → valid: redirect the visitor
//!     → invalid or unreachable: serve the not-found page
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every outbound call has a deadline
//! - The attempt loop is bounded; it never waits indefinitely
//! - Disabled by default; a disabled validator accepts everything

pub mod url_validation;

pub use url_validation::{UrlValidationError, UrlValidator};
