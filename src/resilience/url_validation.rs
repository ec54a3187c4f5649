//! Outbound validation of redirect targets.
//!
//! A target is valid when it answers 200 or 401 after following at most
//! `max_attempts - 1` redirects (301/302 with a `Location`).

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ValidationConfig;

/// Final statuses that count as a live page.
const ALLOWED_STATUS: [StatusCode; 2] = [StatusCode::OK, StatusCode::UNAUTHORIZED];

#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("can't build validation client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} is not valid (status {status})")]
    InvalidStatus { url: String, status: StatusCode },
}

/// Checks that a redirect target exists before sending visitors there.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    client: Option<reqwest::Client>,
    max_attempts: u32,
}

impl UrlValidator {
    /// Build a validator; a disabled config yields a validator that accepts everything.
    pub fn new(config: &ValidationConfig) -> Result<Self, UrlValidationError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_idle_timeout(timeout)
            .tcp_keepalive(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(UrlValidationError::Client)?;

        Ok(Self {
            client: Some(client),
            max_attempts: config.max_attempts.max(1),
        })
    }

    pub fn disabled() -> Self {
        Self {
            client: None,
            max_attempts: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub async fn validate(&self, url: &str) -> Result<(), UrlValidationError> {
        let Some(client) = &self.client else {
            return Ok(());
        };

        let mut url = url.to_string();
        let mut attempts_left = self.max_attempts;

        loop {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|source| UrlValidationError::Request {
                    url: url.clone(),
                    source,
                })?;
            let status = response.status();
            attempts_left -= 1;

            tracing::trace!(
                url = %url,
                attempts_left,
                status = %status,
                headers = ?response.headers(),
                "Validating URL"
            );

            let is_redirect = status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND;
            if is_redirect && attempts_left > 0 {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .filter(|l| !l.is_empty());
                if let Some(location) = location {
                    url = resolve_location(&url, location);
                    continue;
                }
            }

            return if ALLOWED_STATUS.contains(&status) {
                Ok(())
            } else {
                Err(UrlValidationError::InvalidStatus { url, status })
            };
        }
    }
}

/// Absolute URL for a `Location` header, which may be relative.
fn resolve_location(current: &str, location: &str) -> String {
    Url::parse(current)
        .and_then(|base| base.join(location))
        .map(String::from)
        .unwrap_or_else(|_| location.to_string())
}
