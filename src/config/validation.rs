//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that referenced files and directories exist
//! - Validate value shapes (location prefix, bind address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Template directory '{}' doesn't exist", .0.display())]
    TemplatesMissing(PathBuf),

    #[error("The '{}' directory, specified as the templates directory, is not a directory", .0.display())]
    TemplatesNotDir(PathBuf),

    #[error("Channels file '{}' doesn't exist", .0.display())]
    ChannelsFileMissing(PathBuf),

    #[error("Versions location '{0}' must start with '/' and must not end with '/'")]
    BadLocation(String),

    #[error("Invalid bind address '{0}'")]
    BadBindAddress(String),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let templates = config.paths.templates_dir();
    match std::fs::metadata(&templates) {
        Ok(meta) if !meta.is_dir() => errors.push(ValidationError::TemplatesNotDir(templates)),
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::TemplatesMissing(templates)),
    }

    if !config.paths.channels_file.exists() {
        errors.push(ValidationError::ChannelsFileMissing(config.paths.channels_file.clone()));
    }

    let location = &config.versions.location;
    if !location.starts_with('/') || location.ends_with('/') {
        errors.push(ValidationError::BadLocation(location.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(config.listener.bind_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("root/includes")).unwrap();
        std::fs::write(dir.path().join("channels.yaml"), "groups: []").unwrap();

        let mut config = RouterConfig::default();
        config.paths.static_root = dir.path().join("root");
        config.paths.channels_file = dir.path().join("channels.yaml");

        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RouterConfig::default();
        config.paths.static_root = dir.path().join("nope");
        config.paths.channels_file = dir.path().join("missing.yaml");
        config.versions.location = "documentation/".to_string();
        config.listener.bind_address = "localhost".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::TemplatesMissing(_)));
        assert!(matches!(errors[3], ValidationError::BadBindAddress(_)));
    }
}
