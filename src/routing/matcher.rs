//! Route matching logic.
//!
//! # Responsibilities
//! - Match fixed paths and path prefixes (`/status`, `/404.html`)
//! - Match versioned documentation patterns and extract their parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Patterns are compiled once when the route table is built
//! - A matcher either yields a complete `Route` or nothing

use regex::{Captures, Regex};

use crate::routing::router::Route;
use crate::routing::target::Lang;

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the matched route if `path` satisfies this condition.
    fn matches(&self, path: &str) -> Option<Route>;
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
    route: Route,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>, route: Route) -> Self {
        Self {
            prefix: prefix.into(),
            route,
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> Option<Route> {
        path.starts_with(&self.prefix).then(|| self.route.clone())
    }
}

/// Matches one exact path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
    route: Route,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>, route: Route) -> Self {
        Self {
            path: path.into(),
            route,
        }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> Option<Route> {
        (path == self.path).then(|| self.route.clone())
    }
}

/// Which documentation route a pattern produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    GroupChannel,
    Group,
    RootDoc,
    Template,
}

/// Regex matcher with named groups `lang`, `group` and `channel`.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Regex,
    kind: PatternKind,
}

impl PatternMatcher {
    pub fn new(pattern: &str, kind: PatternKind) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            kind,
        })
    }

    fn build(&self, caps: &Captures<'_>) -> Option<Route> {
        let lang: Option<Lang> = caps.name("lang").and_then(|m| m.as_str().parse().ok());
        let param = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        Some(match self.kind {
            PatternKind::GroupChannel => Route::GroupChannel {
                lang,
                group: param("group")?,
                channel: param("channel")?,
            },
            PatternKind::Group => Route::Group {
                lang,
                group: param("group")?,
            },
            PatternKind::RootDoc => Route::RootDoc { lang },
            PatternKind::Template => Route::Template { lang },
        })
    }
}

impl Matcher for PatternMatcher {
    fn matches(&self, path: &str) -> Option<Route> {
        let caps = self.pattern.captures(path)?;
        self.build(&caps)
    }
}
