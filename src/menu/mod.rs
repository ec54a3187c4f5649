//! Version menus for documentation pages.
//!
//! # Data Flow
//! ```text
//! x-original-uri
//!     → routing::target (lang, version token, page suffix)
//!     → builder.rs (current entry + one row per group/channel)
//!     → TemplateData
//!     → http::template (render)
//! ```
//!
//! # Design Decisions
//! - Lookup misses degrade to empty fields, never to a failed request
//! - Channel rows follow the shared stability order

pub mod builder;

pub use builder::{MenuBuilder, MenuItem, MenuKind, TemplateData};
