//! Route handlers.
//!
//! Every documentation handler works on one manifest snapshot taken at the
//! start of the request.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::http::request::RequestContext;
use crate::http::response::{accel_redirect, not_found_page, redirect};
use crate::http::server::AppState;
use crate::menu::{MenuBuilder, MenuKind};
use crate::observability::metrics;
use crate::releases::{version_to_url, Release};
use crate::routing::{lang_prefix, Lang};

/// Payload of `/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub msg: String,
    #[serde(rename = "rootVersion")]
    pub root_version: String,
    #[serde(rename = "rootVersionURL")]
    pub root_version_url: String,
    #[serde(rename = "releasechannels")]
    pub releases: Vec<Release>,
}

pub async fn status(state: &AppState) -> Response {
    let (status, msg) = match state.manifest.refresh_async().await {
        Ok(_) => ("ok", String::new()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to refresh channels file");
            ("error", e.to_string())
        }
    };

    let releases = state.manifest.snapshot();
    let root_version = state
        .resolver(&releases)
        .root_release_version(&state.config.versions.active_release);

    let payload = StatusResponse {
        status,
        msg,
        root_version_url: version_to_url(&root_version),
        root_version,
        releases: releases.groups.clone(),
    };

    match serde_json::to_vec(&payload) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode status");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn health() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

/// `<loc>/v1/...`: internal redirect to the best version of the group.
pub async fn group(state: &AppState, ctx: &RequestContext, lang: Option<Lang>, group: &str) -> Response {
    let releases = state.manifest.refresh_or_stale_async().await;
    let versions = &state.config.versions;
    let prefix = lang_prefix(lang);

    match state.resolver(&releases).best_version_for(group) {
        Ok(version) => {
            let relative = state.targets.relative_suffix(&ctx.path).unwrap_or_default();
            let target = format!(
                "{prefix}{}/{}/{relative}",
                versions.location,
                version_to_url(version)
            );
            tracing::debug!(request_id = %ctx.request_id, group, target = %target, "Internal redirect");
            metrics::record_redirect("accel");
            accel_redirect(target)
        }
        Err(e) => {
            tracing::debug!(request_id = %ctx.request_id, error = %e, "Falling back to the default group");
            metrics::record_redirect("found");
            redirect(
                StatusCode::FOUND,
                format!("{prefix}{}/{}/", versions.location, versions.default_group),
            )
        }
    }
}

/// `<loc>/v1.2-beta/...`: redirect to the version the channel currently holds.
pub async fn group_channel(
    state: &AppState,
    ctx: &RequestContext,
    lang: Option<Lang>,
    group: &str,
    channel: &str,
) -> Response {
    let releases = state.manifest.refresh_or_stale_async().await;
    let version = match state.resolver(&releases).version_for(group, channel) {
        Ok(version) => version,
        Err(e) => {
            tracing::error!(request_id = %ctx.request_id, error = %e, "Can't resolve channel");
            return not_found(state, ctx).await;
        }
    };

    let relative = state
        .targets
        .relative_suffix(&ctx.request_uri)
        .unwrap_or_default();
    let target = format!(
        "{}{}/{}/{relative}",
        lang_prefix(lang),
        state.config.versions.location,
        version_to_url(version)
    );

    if let Err(e) = state
        .validator
        .validate(&format!("https://{}{}", ctx.host, target))
        .await
    {
        tracing::error!(request_id = %ctx.request_id, error = %e, "Error validating URL");
        return not_found(state, ctx).await;
    }

    tracing::debug!(request_id = %ctx.request_id, group, channel, target = %target, "Redirecting");
    metrics::record_redirect("found");
    redirect(StatusCode::FOUND, target)
}

/// `<loc>/...` without a version: permanent redirect into the default group.
pub fn root_doc(state: &AppState, ctx: &RequestContext, lang: Option<Lang>) -> Response {
    let versions = &state.config.versions;
    let prefix = lang_prefix(lang);

    let rest = if state.targets.is_doc_page(&ctx.request_uri) {
        let items: Vec<&str> = ctx.request_uri.split(&format!("{}/", versions.location)).collect();
        items[1..].join(&format!("{prefix}{}/", versions.location))
    } else {
        String::new()
    };

    metrics::record_redirect("moved");
    redirect(
        StatusCode::MOVED_PERMANENTLY,
        format!("{prefix}{}/{}/{rest}", versions.location, versions.default_group),
    )
}

/// Render a menu template for the page named by `x-original-uri`.
pub async fn template(state: &AppState, ctx: &RequestContext) -> Response {
    let releases = state.manifest.refresh_or_stale_async().await;
    let file_name = Path::new(&ctx.path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let kind = MenuKind::for_template(file_name);

    let data = MenuBuilder::new(
        state.resolver(&releases),
        &state.targets,
        &state.config.versions.active_release,
    )
    .build(kind, &ctx.original_uri);

    tracing::debug!(
        request_id = %ctx.request_id,
        template = %ctx.path,
        original_uri = %ctx.original_uri,
        items = data.version_items.len(),
        "Rendering menu"
    );

    match state.templates.render(&ctx.path, &data).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(request_id = %ctx.request_id, error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error (template error)").into_response()
        }
    }
}

pub async fn not_found(state: &AppState, ctx: &RequestContext) -> Response {
    let lang = state.targets.lang_of_path(&ctx.request_uri).unwrap_or_default();
    not_found_page(&state.config.paths.static_root, lang).await
}

/// Serve a file from the static root, or the not-found page.
pub async fn static_file(state: &AppState, ctx: &RequestContext, request: Request<Body>) -> Response {
    let service = ServeDir::new(&state.config.paths.static_root);
    match service.oneshot(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(state, ctx).await,
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
