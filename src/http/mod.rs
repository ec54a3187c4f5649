//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request context)
//!     → routing (route table picks a handler)
//!     → handlers.rs (manifest snapshot → resolver / menu builder)
//!     → template.rs (menu templates)
//!     → response.rs (redirects, not-found page)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;
pub mod template;

pub use request::{RequestContext, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
pub use template::{TemplateError, TemplateRenderer};
