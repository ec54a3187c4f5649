//! Version menu assembly for documentation templates.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::releases::channels::stability_order;
use crate::releases::codec::{url_to_version, version_to_url};
use crate::releases::resolver::{bare_group, Resolver};
use crate::routing::target::{DocTarget, Lang, TargetParser};

/// Group left out of the group menu's list of other groups.
pub const LEGACY_GROUP: &str = "1.0";

/// `v<major>.<minor>-<channel>`, one regex per channel set.
static GROUP_CHANNEL_RE: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [false, true].map(|latest| {
        let channels = stability_order(latest).join("|");
        Regex::new(&format!(r"^(v[0-9]+\.[0-9]+)-({channels})$")).unwrap()
    })
});

/// `v<major>` optionally followed by `.<anything>`.
static VERSION_FORM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(v[0-9]+)(\..+)?$").unwrap());

/// One navigable row of the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub group: String,
    pub channel: String,
    pub version: String,
    /// Version token without a leading `/`, e.g. `v1.2.3-plus-fix6`.
    pub version_url: String,
    pub is_current: bool,
}

/// Everything a menu template can render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    pub version_items: Vec<MenuItem>,
    pub current_group: String,
    pub current_channel: String,
    pub current_version: String,
    pub current_lang: Lang,
    /// Explicit version behind a group reference, used for source links.
    pub absolute_version: String,
    pub current_version_url: String,
    /// Page path without `<lang>/<location>/<version>`.
    pub current_page_url_relative: String,
    /// Full page path.
    pub current_page_url: String,
    /// Documentation root for top menus.
    pub menu_documentation_link: String,
}

impl TemplateData {
    fn from_target(target: &DocTarget) -> Self {
        Self {
            current_lang: target.lang,
            current_version_url: target.version_url.clone(),
            current_page_url_relative: target.page_url_relative.clone(),
            current_page_url: target.page_url.clone(),
            ..Self::default()
        }
    }

    fn current_item(&self, group: &str) -> MenuItem {
        MenuItem {
            group: group.to_string(),
            channel: self.current_channel.clone(),
            version: self.current_version.clone(),
            version_url: self.current_version_url.clone(),
            is_current: true,
        }
    }

    fn use_version(&mut self, version: &str) {
        self.current_version = version.to_string();
        self.current_version_url = version_to_url(version);
    }
}

/// Menu flavours, picked by the template being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuKind {
    /// Every group/channel pair, current entry resolved from `v1.2-beta` style tokens.
    Channel,
    /// Every group/channel pair plus documentation link and absolute version.
    #[default]
    Version,
    /// One bare row per group.
    Group,
}

impl MenuKind {
    /// `channel-menu*` and `group-menu*` templates get their own menus.
    pub fn for_template(file_name: &str) -> Self {
        if file_name.starts_with("channel-menu") {
            MenuKind::Channel
        } else if file_name.starts_with("group-menu") {
            MenuKind::Group
        } else {
            MenuKind::Version
        }
    }
}

/// Builds `TemplateData` for one request from one manifest snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MenuBuilder<'a> {
    resolver: Resolver<'a>,
    parser: &'a TargetParser,
    active_release: &'a str,
}

impl<'a> MenuBuilder<'a> {
    pub fn new(resolver: Resolver<'a>, parser: &'a TargetParser, active_release: &'a str) -> Self {
        Self {
            resolver,
            parser,
            active_release,
        }
    }

    /// Parse the original URI and build the requested menu.
    pub fn build(&self, kind: MenuKind, original_uri: &str) -> TemplateData {
        let target = self.parser.parse(original_uri);
        match kind {
            MenuKind::Channel => self.channel_menu(&target),
            MenuKind::Version => self.version_menu(&target),
            MenuKind::Group => self.group_menu(&target),
        }
    }

    /// Split `v1.2-beta` into `("v1.2", "beta")`.
    pub fn split_group_channel(&self, token: &str) -> Option<(String, String)> {
        let latest = self.resolver.channel_order().len() > stability_order(false).len();
        let caps = GROUP_CHANNEL_RE[usize::from(latest)].captures(token)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    pub fn channel_menu(&self, target: &DocTarget) -> TemplateData {
        let mut data = TemplateData::from_target(target);

        if let Some((group, channel)) = self.split_group_channel(&data.current_version_url) {
            let version = self.resolver.version_for(&group, &channel).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Channel menu: unresolved group channel");
                ""
            });
            data.current_version_url = version_to_url(version);
            data.current_group = group;
            data.current_channel = channel;
        }
        data.current_version = url_to_version(&data.current_version_url);

        if data.current_version.is_empty() {
            data.use_version(self.active_release);
        }

        if data.current_channel.is_empty() || data.current_group.is_empty() {
            let found = self.resolver.channel_and_group_for(&data.current_version);
            data.current_channel = found.channel;
            data.current_group = found.group;
        }

        let current = data.current_item(&data.current_group);
        data.version_items.push(current);
        self.push_all_channels(&mut data.version_items);
        data
    }

    pub fn version_menu(&self, target: &DocTarget) -> TemplateData {
        let mut data = TemplateData::from_target(target);
        data.current_version = url_to_version(&data.current_version_url);

        if data.current_version.is_empty() && self.parser.is_doc_page(&data.current_page_url) {
            data.use_version(self.active_release);
        }

        if let Some(caps) = VERSION_FORM_RE.captures(&data.current_version) {
            let major = &caps[1];
            let location = self.parser.location();
            if caps.get(2).is_some() {
                // a concrete version, not a group
                data.menu_documentation_link = format!("{}/{}/", location, version_to_url(major));
                data.absolute_version = data.current_version.clone();
            } else {
                data.menu_documentation_link =
                    format!("{}/{}/", location, version_to_url(&data.current_version));
                data.absolute_version = match self.resolver.best_version_for(major) {
                    Ok(version) => version.to_string(),
                    Err(e) => {
                        tracing::debug!(
                            error = %e,
                            version = %data.current_version,
                            "Version menu: can't determine absolute version"
                        );
                        String::new()
                    }
                };
            }
        }

        let found = self.resolver.channel_and_group_for(&data.current_version);
        data.current_channel = found.channel;
        data.current_group = found.group;

        let current = data.current_item(&data.current_group);
        data.version_items.push(current);
        self.push_all_channels(&mut data.version_items);
        data
    }

    pub fn group_menu(&self, target: &DocTarget) -> TemplateData {
        let mut data = TemplateData::from_target(target);
        data.current_version = url_to_version(&data.current_version_url);

        if data.current_version.is_empty() {
            data.use_version(self.active_release);
        }

        let group = bare_group(&data.current_version).unwrap_or_default().to_string();
        let current = data.current_item(&group);
        data.version_items.push(current);
        data.current_group = group;

        for group in self.resolver.groups_descending() {
            if group == LEGACY_GROUP {
                continue;
            }
            data.version_items.push(MenuItem {
                group: group.to_string(),
                ..MenuItem::default()
            });
        }
        data
    }

    /// One row per channel of every group, groups descending, channels most stable first.
    fn push_all_channels(&self, items: &mut Vec<MenuItem>) {
        for group in self.resolver.groups_descending() {
            items.extend(self.group_channels(group));
        }
    }

    /// Rows for the channels `group` actually has; absent channels are skipped.
    pub fn group_channels(&self, group: &str) -> Vec<MenuItem> {
        let Some(release) = self.resolver.releases().group(group) else {
            return Vec::new();
        };
        self.resolver
            .channel_order()
            .iter()
            .filter_map(|channel| {
                release.channel_version(channel).map(|version| MenuItem {
                    group: group.to_string(),
                    channel: (*channel).to_string(),
                    version: version.to_string(),
                    version_url: version_to_url(version),
                    is_current: false,
                })
            })
            .collect()
    }
}
