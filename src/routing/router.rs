//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile the route table from the versions configuration
//! - Look up the route for a request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins; order mirrors specificity
//! - Unmatched paths are served as static files

use crate::config::{I18nMode, VersionsConfig};
use crate::releases::channels::routable_alternation;
use crate::routing::matcher::{ExactPathMatcher, Matcher, PathPrefixMatcher, PatternKind, PatternMatcher};
use crate::routing::target::{Lang, NOT_FOUND_PAGE};

/// A matched route with its path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Status,
    Health,
    /// `<loc>/v1.2-beta/...`
    GroupChannel {
        lang: Option<Lang>,
        group: String,
        channel: String,
    },
    /// `<loc>/v1/...`
    Group { lang: Option<Lang>, group: String },
    /// `<loc>/...` without a recognisable version
    RootDoc { lang: Option<Lang> },
    /// `<templates>/...`
    Template { lang: Option<Lang> },
    NotFoundPage,
    Static,
}

impl Route {
    /// Short label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Status => "status",
            Route::Health => "health",
            Route::GroupChannel { .. } => "group_channel",
            Route::Group { .. } => "group",
            Route::RootDoc { .. } => "root_doc",
            Route::Template { .. } => "template",
            Route::NotFoundPage => "not_found",
            Route::Static => "static",
        }
    }
}

/// Ordered route table.
#[derive(Debug)]
pub struct Router {
    matchers: Vec<Box<dyn Matcher>>,
}

impl Router {
    /// Build the table for a versions layout and templates location.
    pub fn new(versions: &VersionsConfig, templates: &str) -> Result<Self, regex::Error> {
        let lang = match versions.i18n {
            I18nMode::Location => "/(?P<lang>ru|en)",
            I18nMode::Domain => "",
        };
        let loc = regex::escape(&versions.location);
        let tpls = regex::escape(templates);
        let channels = routable_alternation(versions.use_latest_channel);

        let matchers: Vec<Box<dyn Matcher>> = vec![
            Box::new(PathPrefixMatcher::new("/status", Route::Status)),
            Box::new(PathPrefixMatcher::new("/health", Route::Health)),
            Box::new(PatternMatcher::new(
                &format!(r"^{lang}{loc}/(?P<group>v[0-9]+\.[0-9]+)-(?P<channel>{channels})/"),
                PatternKind::GroupChannel,
            )?),
            Box::new(PatternMatcher::new(
                &format!(r"^{lang}{loc}/(?P<group>v[0-9]+)-(?P<channel>{channels})/"),
                PatternKind::GroupChannel,
            )?),
            Box::new(PatternMatcher::new(
                &format!(r"^{lang}{loc}/(?P<group>v[0-9]+)/"),
                PatternKind::Group,
            )?),
            Box::new(PatternMatcher::new(&format!(r"^{lang}{loc}/"), PatternKind::RootDoc)?),
            Box::new(PatternMatcher::new(&format!(r"^{lang}{tpls}/"), PatternKind::Template)?),
            Box::new(ExactPathMatcher::new(NOT_FOUND_PAGE, Route::NotFoundPage)),
        ];

        Ok(Self { matchers })
    }

    /// Route for `path`; `Route::Static` when nothing else matches.
    pub fn match_path(&self, path: &str) -> Route {
        self.matchers
            .iter()
            .find_map(|m| m.matches(path))
            .unwrap_or(Route::Static)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_router(use_latest: bool) -> Router {
        let versions = VersionsConfig {
            i18n: I18nMode::Location,
            use_latest_channel: use_latest,
            ..VersionsConfig::default()
        };
        Router::new(&versions, "/includes").unwrap()
    }

    #[test]
    fn test_service_routes() {
        let router = location_router(false);
        assert_eq!(router.match_path("/status"), Route::Status);
        assert_eq!(router.match_path("/health"), Route::Health);
        assert_eq!(router.match_path("/404.html"), Route::NotFoundPage);
        assert_eq!(router.match_path("/images/logo.svg"), Route::Static);
    }

    #[test]
    fn test_group_channel_routes() {
        let router = location_router(false);
        assert_eq!(
            router.match_path("/en/documentation/v1.2-beta/reference/"),
            Route::GroupChannel {
                lang: Some(Lang::En),
                group: "v1.2".into(),
                channel: "beta".into(),
            }
        );
        assert_eq!(
            router.match_path("/ru/documentation/v1-rock-solid/"),
            Route::GroupChannel {
                lang: Some(Lang::Ru),
                group: "v1".into(),
                channel: "rock-solid".into(),
            }
        );
        assert_eq!(
            router.match_path("/en/documentation/v1.2-early-access/"),
            Route::GroupChannel {
                lang: Some(Lang::En),
                group: "v1.2".into(),
                channel: "early-access".into(),
            }
        );
    }

    #[test]
    fn test_latest_channel_is_opt_in() {
        assert_eq!(
            location_router(false).match_path("/en/documentation/v1-latest/"),
            Route::RootDoc { lang: Some(Lang::En) }
        );
        assert!(matches!(
            location_router(true).match_path("/en/documentation/v1-latest/"),
            Route::GroupChannel { .. }
        ));
    }

    #[test]
    fn test_group_and_root_routes() {
        let router = location_router(false);
        assert_eq!(
            router.match_path("/en/documentation/v1/guides/a.html"),
            Route::Group {
                lang: Some(Lang::En),
                group: "v1".into(),
            }
        );
        assert_eq!(
            router.match_path("/en/documentation/v1.2.3-plus-fix6/index.html"),
            Route::RootDoc { lang: Some(Lang::En) }
        );
        assert_eq!(
            router.match_path("/ru/includes/version-menu.html"),
            Route::Template { lang: Some(Lang::Ru) }
        );
        // language segment is mandatory in location mode
        assert_eq!(router.match_path("/documentation/v1/"), Route::Static);
    }

    #[test]
    fn test_domain_mode_has_no_language_segment() {
        let router = Router::new(&VersionsConfig::default(), "/includes").unwrap();
        assert_eq!(
            router.match_path("/documentation/v1/"),
            Route::Group {
                lang: None,
                group: "v1".into(),
            }
        );
        assert_eq!(router.match_path("/includes/menu.html"), Route::Template { lang: None });
        assert_eq!(router.match_path("/en/documentation/v1/"), Route::Static);
    }
}
