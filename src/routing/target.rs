//! Extraction of language, version token and page suffix from request URLs.
//!
//! The router sits behind a front proxy that forwards the page being viewed in
//! the `x-original-uri` header. Two URL shapes carry a version:
//!
//! - `[/<lang>]<location>/<token>/<suffix>`: a regular documentation page
//! - `/404.html?uri=<url>`: the not-found page, with the original target in
//!   the `uri` query parameter
//!
//! Anything else yields an empty target and callers fall back to defaults.

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::releases::codec::url_to_version;

/// Path of the not-found page.
pub const NOT_FOUND_PAGE: &str = "/404.html";

/// Query parameter carrying the original target on the not-found page.
pub const NOT_FOUND_URI_PARAM: &str = "uri";

const PARSE_BASE: &str = "http://localhost/";

/// Documentation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Lang::En),
            "ru" => Ok(Lang::Ru),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `/<lang>` when a language segment is present, empty otherwise.
pub fn lang_prefix(lang: Option<Lang>) -> String {
    lang.map(|l| format!("/{}", l)).unwrap_or_default()
}

/// Which URL shape produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetShape {
    /// `[/<lang>]<location>/<token>/<suffix>`
    Versioned,
    /// `/404.html?uri=...` whose `uri` is a versioned URL
    NotFoundQuery,
    /// Nothing recognisable; every field is a default.
    #[default]
    NoMatch,
}

/// What an inbound URL says about the documentation being viewed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTarget {
    pub shape: TargetShape,
    pub lang: Lang,
    /// Version token as it appears in the URL, e.g. `v1.2.3-plus-fix6`.
    pub version_url: String,
    /// Full page path; empty for the not-found page.
    pub page_url: String,
    /// Page path after the version token, e.g. `reference/build.html`.
    pub page_url_relative: String,
}

impl DocTarget {
    /// Logical version decoded from the token.
    pub fn version(&self) -> String {
        url_to_version(&self.version_url)
    }
}

/// URL shape matchers bound to one versions location.
#[derive(Debug, Clone)]
pub struct TargetParser {
    location: String,
    versioned: Regex,
    lang_only: Regex,
    doc_page: Regex,
}

impl TargetParser {
    /// Compile the matchers for `location` (e.g. `/documentation`).
    pub fn new(location: &str) -> Result<Self, regex::Error> {
        let loc = regex::escape(location);
        Ok(Self {
            location: location.to_string(),
            versioned: Regex::new(&format!(r"^(?:/(ru|en))?{loc}/([^/?]+)(?:/(.*))?$"))?,
            lang_only: Regex::new(r"^/(ru|en)/(.*)$")?,
            doc_page: Regex::new(&format!(r"^(?:/[^/]+)?{loc}/.+$"))?,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Parse the value of the `x-original-uri` header.
    ///
    /// Shapes are matched against the percent-decoded path.
    pub fn parse(&self, original_uri: &str) -> DocTarget {
        let Some(url) = parse_uri(original_uri) else {
            return DocTarget::default();
        };

        if url.path() == NOT_FOUND_PAGE {
            return self.match_not_found_query(&url).unwrap_or_default();
        }

        let path = percent_decode_str(url.path()).decode_utf8_lossy();
        let path = path.as_ref();
        self.match_versioned(path)
            .or_else(|| self.match_lang_only(path))
            .unwrap_or_else(|| DocTarget {
                page_url: path.to_string(),
                ..DocTarget::default()
            })
    }

    /// `[/<lang>]<location>/<token>/<suffix>`
    fn match_versioned(&self, path: &str) -> Option<DocTarget> {
        let caps = self.versioned.captures(path)?;
        Some(DocTarget {
            shape: TargetShape::Versioned,
            lang: caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or_default(),
            version_url: caps[2].to_string(),
            page_url: path.to_string(),
            page_url_relative: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
        })
    }

    /// `/404.html?uri=[/<lang>]<location>/<token>/...`
    ///
    /// Only the version token is taken from the query; language and page stay
    /// at their defaults since the not-found page is language-neutral.
    fn match_not_found_query(&self, url: &Url) -> Option<DocTarget> {
        let uri = url
            .query_pairs()
            .find(|(k, _)| k == NOT_FOUND_URI_PARAM)
            .map(|(_, v)| v.into_owned())?;
        let path = uri.split(&['?', '#'][..]).next().unwrap_or_default();
        let caps = self.versioned.captures(path)?;
        Some(DocTarget {
            shape: TargetShape::NotFoundQuery,
            version_url: caps[2].to_string(),
            ..DocTarget::default()
        })
    }

    /// `/<lang>/<rest>` outside the versions location: no version, the
    /// relative page keeps its leading slash.
    fn match_lang_only(&self, path: &str) -> Option<DocTarget> {
        let caps = self.lang_only.captures(path)?;
        Some(DocTarget {
            shape: TargetShape::NoMatch,
            page_url: path.to_string(),
            page_url_relative: format!("/{}", &caps[2]),
            ..DocTarget::default()
        })
    }

    /// Everything after the version token of a request URI, if it has one.
    pub fn relative_suffix(&self, request_uri: &str) -> Option<String> {
        let caps = self.versioned.captures(request_uri)?;
        caps.get(3).map(|m| m.as_str().to_string())
    }

    /// Whether `path` is a page under the versions location.
    pub fn is_doc_page(&self, path: &str) -> bool {
        self.doc_page.is_match(path)
    }

    /// Language segment at the start of an arbitrary path, if any.
    pub fn lang_of_path(&self, path: &str) -> Option<Lang> {
        self.lang_only
            .captures(path)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

fn parse_uri(raw: &str) -> Option<Url> {
    if raw.is_empty() {
        return None;
    }
    Url::parse(PARSE_BASE).ok()?.join(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TargetParser {
        TargetParser::new("/documentation").unwrap()
    }

    #[test]
    fn test_versioned_page() {
        let target = parser().parse("/en/documentation/v1.2.3-plus-fix6/reference/build.html");
        assert_eq!(target.shape, TargetShape::Versioned);
        assert_eq!(target.lang, Lang::En);
        assert_eq!(target.version_url, "v1.2.3-plus-fix6");
        assert_eq!(target.page_url_relative, "reference/build.html");
        assert_eq!(target.page_url, "/en/documentation/v1.2.3-plus-fix6/reference/build.html");
        assert_eq!(target.version(), "v1.2.3+fix6");
    }

    #[test]
    fn test_versioned_page_ru_and_query() {
        let target = parser().parse("/ru/documentation/v1.2-beta/?q=1");
        assert_eq!(target.lang, Lang::Ru);
        assert_eq!(target.version_url, "v1.2-beta");
        assert_eq!(target.page_url_relative, "");
    }

    #[test]
    fn test_versioned_page_without_language() {
        let target = parser().parse("/documentation/v1/index.html");
        assert_eq!(target.shape, TargetShape::Versioned);
        assert_eq!(target.lang, Lang::En);
        assert_eq!(target.version_url, "v1");
        assert_eq!(target.page_url_relative, "index.html");
    }

    #[test]
    fn test_versioned_page_is_percent_decoded() {
        let target = parser().parse("/en/documentation/v1.2.3%2Bfix6/reference/%D1%84.html");
        assert_eq!(target.shape, TargetShape::Versioned);
        assert_eq!(target.version_url, "v1.2.3+fix6");
        assert_eq!(target.version(), "v1.2.3+fix6");
        assert_eq!(target.page_url_relative, "reference/ф.html");
        assert_eq!(target.page_url, "/en/documentation/v1.2.3+fix6/reference/ф.html");
    }

    #[test]
    fn test_not_found_page_reads_query() {
        let target = parser().parse("/404.html?uri=%2Fru%2Fdocumentation%2Fv1.2.3%2Fmissing.html");
        assert_eq!(target.shape, TargetShape::NotFoundQuery);
        assert_eq!(target.version_url, "v1.2.3");
        assert_eq!(target.lang, Lang::En);
        assert_eq!(target.page_url, "");
        assert_eq!(target.page_url_relative, "");
    }

    #[test]
    fn test_not_found_page_without_versioned_query() {
        assert_eq!(parser().parse("/404.html"), DocTarget::default());
        assert_eq!(parser().parse("/404.html?uri=/en/blog/post"), DocTarget::default());
    }

    #[test]
    fn test_no_match() {
        let target = parser().parse("/en/blog/post.html");
        assert_eq!(target.shape, TargetShape::NoMatch);
        assert_eq!(target.version_url, "");
        assert_eq!(target.page_url_relative, "/blog/post.html");

        let target = parser().parse("/assets/main.css");
        assert_eq!(target.shape, TargetShape::NoMatch);
        assert_eq!(target.page_url, "/assets/main.css");
        assert_eq!(target.page_url_relative, "");

        assert_eq!(parser().parse(""), DocTarget::default());
    }

    #[test]
    fn test_relative_suffix() {
        let p = parser();
        assert_eq!(
            p.relative_suffix("/en/documentation/v1.2-beta/guides/a.html?x=1"),
            Some("guides/a.html?x=1".to_string())
        );
        assert_eq!(p.relative_suffix("/en/documentation/v1/"), Some(String::new()));
        assert_eq!(p.relative_suffix("/en/documentation/v1"), None);
        assert_eq!(p.relative_suffix("/en/other/v1/x"), None);
    }

    #[test]
    fn test_location_is_escaped() {
        let p = TargetParser::new("/docs.v2").unwrap();
        assert_eq!(p.parse("/en/docs.v2/v1/a").version_url, "v1");
        assert_eq!(p.parse("/en/docsXv2/v1/a").shape, TargetShape::NoMatch);
    }

    #[test]
    fn test_is_doc_page_and_lang_of_path() {
        let p = parser();
        assert!(p.is_doc_page("/en/documentation/guides/"));
        assert!(p.is_doc_page("/documentation/guides/"));
        assert!(!p.is_doc_page("/en/documentation/"));
        assert_eq!(p.lang_of_path("/ru/includes/menu.html"), Some(Lang::Ru));
        assert_eq!(p.lang_of_path("/includes/menu.html"), None);
    }
}
