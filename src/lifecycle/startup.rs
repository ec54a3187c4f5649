//! Startup reporting.

use crate::config::RouterConfig;

/// Log the effective configuration.
///
/// At trace level the channels file content is dumped as well.
pub fn log_configuration(config: &RouterConfig) {
    tracing::info!(address = %config.listener.bind_address, "Listening address");
    tracing::info!(
        level = %config.observability.log_level,
        format = ?config.observability.log_format,
        "Logging configured"
    );
    match std::env::current_dir() {
        Ok(dir) => tracing::info!(dir = %dir.display(), "Working dir"),
        Err(e) => tracing::warn!(error = %e, "Working dir unavailable"),
    }
    tracing::info!(path = %config.paths.channels_file.display(), "Channel file used");
    tracing::info!(path = %config.paths.static_root.display(), "Directory with static files");
    tracing::info!(path = %config.paths.templates_dir().display(), "Templates directory");
    tracing::info!(location = %config.versions.location, "URL location for versions");
    tracing::info!(method = %config.versions.i18n, "Localization method");
    tracing::info!(
        enabled = config.validation.enabled,
        use_latest_channel = config.versions.use_latest_channel,
        default_group = %config.versions.default_group,
        active_release = %config.versions.active_release,
        "Routing options"
    );

    if tracing::enabled!(tracing::Level::TRACE) {
        match std::fs::read_to_string(&config.paths.channels_file) {
            Ok(content) => tracing::trace!(content = %content, "Channels file content"),
            Err(e) => tracing::trace!(error = %e, "Channels file unreadable"),
        }
    }
}
