//! Group/channel/version lookups over one manifest snapshot.
//!
//! A `Resolver` borrows the snapshot captured at the top of a request, so every
//! query in that request answers from the same manifest.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::releases::channels::{selection_precedence, stability_order};
use crate::releases::manifest::ReleasesStatus;

/// Returned in place of a version when the root release can't be resolved.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Bare major group identifier, e.g. `v1`.
static BARE_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(v[0-9]+)$").unwrap());

/// Lookup misses from the exact-match queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no matching version for group {group}, channel {channel}")]
    NoChannel { group: String, channel: String },

    #[error("can't get version for {group}")]
    NoGroupVersion { group: String },
}

/// Result of a reverse lookup. Empty fields mean "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelGroup {
    pub channel: String,
    pub group: String,
}

/// Returns the group name when `version` is a bare major group id like `v2`.
pub fn bare_group(version: &str) -> Option<&str> {
    BARE_GROUP_RE
        .captures(version)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Numeric sort key of a group name; anything unparsable or non-finite counts as 0.
fn group_sort_key(name: &str) -> f32 {
    name.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Read-only queries over a manifest snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    releases: &'a ReleasesStatus,
    order: &'static [&'static str],
}

impl<'a> Resolver<'a> {
    pub fn new(releases: &'a ReleasesStatus) -> Self {
        Self {
            releases,
            order: stability_order(false),
        }
    }

    /// Include the `latest` channel in display order and reverse lookups.
    pub fn with_latest(mut self, enabled: bool) -> Self {
        self.order = stability_order(enabled);
        self
    }

    /// Channel names in display order for this resolver.
    pub fn channel_order(&self) -> &'static [&'static str] {
        self.order
    }

    pub fn releases(&self) -> &'a ReleasesStatus {
        self.releases
    }

    /// Group names sorted by numeric value, highest first.
    ///
    /// The sort is stable, so groups with equal keys (including every
    /// non-numeric name) keep their manifest order.
    pub fn groups_descending(&self) -> Vec<&'a str> {
        let mut groups: Vec<&'a str> = self.releases.groups.iter().map(|g| g.name.as_str()).collect();
        groups.sort_by(|a, b| {
            group_sort_key(b).total_cmp(&group_sort_key(a))
        });
        groups
    }

    /// Exact lookup of the version on `channel` within `group`.
    pub fn version_for(&self, group: &str, channel: &str) -> Result<&'a str, ResolveError> {
        self.releases
            .group(group)
            .and_then(|g| g.channel_version(channel))
            .ok_or_else(|| ResolveError::NoChannel {
                group: group.to_string(),
                channel: channel.to_string(),
            })
    }

    /// Version of the most stable channel a group offers, e.g. `v1.2.3+fix6` for `1.2`.
    ///
    /// Only `stable`, `ea`, `beta` and `alpha` are considered, in that order.
    pub fn best_version_for(&self, group: &str) -> Result<&'a str, ResolveError> {
        self.releases
            .group(group)
            .and_then(|g| {
                selection_precedence()
                    .iter()
                    .find_map(|channel| g.channel_version(channel))
            })
            .ok_or_else(|| ResolveError::NoGroupVersion {
                group: group.to_string(),
            })
    }

    /// Find which channel of which group publishes `version`.
    ///
    /// A bare group id short-circuits to `("", group)` without scanning.
    pub fn channel_and_group_for(&self, version: &str) -> ChannelGroup {
        if let Some(group) = bare_group(version) {
            return ChannelGroup {
                channel: String::new(),
                group: group.to_string(),
            };
        }

        for group in self.groups_descending() {
            let Some(release) = self.releases.group(group) else {
                continue;
            };
            for channel in self.order {
                if release.channel_version(channel) == Some(version) {
                    return ChannelGroup {
                        channel: (*channel).to_string(),
                        group: group.to_string(),
                    };
                }
            }
        }
        ChannelGroup::default()
    }

    /// Best version of the active root release, or `"unknown"`.
    pub fn root_release_version(&self, active_release: &str) -> String {
        match self.best_version_for(active_release) {
            Ok(version) => version.to_string(),
            Err(e) => {
                tracing::debug!(error = %e, active_release, "Root release version unresolved");
                UNKNOWN_VERSION.to_string()
            }
        }
    }
}
