//! Response helpers.
//!
//! # Responsibilities
//! - Build 301/302 redirects and internal `X-Accel-Redirect` rewrites
//! - Serve the localized not-found page, with a built-in fallback
//!
//! # Design Decisions
//! - Redirect targets are paths; the front proxy keeps scheme and host
//! - A missing 404 page never turns into a 500

use axum::{
    http::{header, HeaderName, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::path::Path;

use crate::routing::Lang;

/// Internal redirect header understood by nginx.
pub const X_ACCEL_REDIRECT: HeaderName = HeaderName::from_static("x-accel-redirect");

const FALLBACK_NOT_FOUND: &str = r#"<html lang="en">
<head>
    <meta charset="utf-8">
    <meta http-equiv="X-UA-Compatible" content="IE=edge">
    <title>Page Not Found</title>
    <meta name="title" content="Page Not Found">
</head>
<body style="
    display: flex;
    flex-direction: column;
    height: -webkit-fill-available;
    justify-content: space-between;
">
<div class="content">
    <div style="margin-top: 100px; width: 80%; margin-left: 50px;">
        <h1 class="docs__title">Page not found</h1>
        <div class="post-content">
            <p>Sorry, the page you were looking for does not exist.</p>
            <p>Try searching for it or check the URL to see if it looks correct.</p>
        </div>
    </div>
</div>
</body>
</html>"#;

/// Redirect with an explicit 3xx status.
pub fn redirect(status: StatusCode, location: String) -> Response {
    (status, [(header::LOCATION, location)]).into_response()
}

/// Ask the front proxy to serve `target` internally.
pub fn accel_redirect(target: String) -> Response {
    (StatusCode::OK, [(X_ACCEL_REDIRECT, target)]).into_response()
}

/// 404 response with `<static_root>/<lang>/404.html` or the built-in page.
pub async fn not_found_page(static_root: &Path, lang: Lang) -> Response {
    let page = static_root.join(lang.as_str()).join("404.html");
    match tokio::fs::read(&page).await {
        Ok(body) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(path = %page.display(), error = %e, "404.html file not found");
            (StatusCode::NOT_FOUND, Html(FALLBACK_NOT_FOUND)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect(StatusCode::FOUND, "/en/documentation/v1/".to_string());
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/en/documentation/v1/");
    }

    #[test]
    fn test_accel_redirect() {
        let response = accel_redirect("/documentation/v1.1.0/".to_string());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&X_ACCEL_REDIRECT], "/documentation/v1.1.0/");
    }

    #[tokio::test]
    async fn test_not_found_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ru")).unwrap();
        std::fs::write(dir.path().join("ru/404.html"), "нет").unwrap();

        let response = not_found_page(dir.path(), Lang::Ru).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], "нет".as_bytes());

        let response = not_found_page(dir.path(), Lang::En).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Page not found"));
    }
}
