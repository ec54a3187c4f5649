//! Stability channel ordering.
//!
//! One ordered list drives menu display, reverse lookups, route patterns and
//! the "best version" precedence, so they can never drift apart.

/// Every channel name in reverse-stability order, `latest` first.
const CHANNEL_ORDER: [&str; 6] = ["latest", "rock-solid", "stable", "ea", "beta", "alpha"];

/// Channel name that only exists when the deployment enables it.
pub const LATEST_CHANNEL: &str = "latest";

/// Alias accepted in URLs but never stored in the manifest.
pub const EARLY_ACCESS_ALIAS: &str = "early-access";

/// Channels in display order (most stable first).
///
/// `latest` is prepended only when `include_latest` is set.
pub fn stability_order(include_latest: bool) -> &'static [&'static str] {
    if include_latest {
        &CHANNEL_ORDER
    } else {
        &CHANNEL_ORDER[1..]
    }
}

/// Channels consulted, in order, when picking a group's representative version.
///
/// `rock-solid` and `latest` are deliberately absent: those tiers are only
/// reachable by an exact channel reference.
pub fn selection_precedence() -> &'static [&'static str] {
    &CHANNEL_ORDER[2..]
}

/// Regex alternation of every channel name a URL may carry.
pub fn routable_alternation(include_latest: bool) -> String {
    let mut names: Vec<&str> = stability_order(include_latest).to_vec();
    names.push(EARLY_ACCESS_ALIAS);
    names.join("|")
}
