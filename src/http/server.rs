//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests to the route table
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestContext, X_REQUEST_ID};
use crate::http::template::TemplateRenderer;
use crate::observability::metrics;
use crate::releases::{ManifestStore, ReleasesStatus, Resolver};
use crate::resilience::{UrlValidationError, UrlValidator};
use crate::routing::{Route, Router as DocRouter, TargetParser};

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Validator(#[from] UrlValidationError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RouterConfig>,
    pub manifest: Arc<ManifestStore>,
    pub routes: Arc<DocRouter>,
    pub targets: Arc<TargetParser>,
    pub templates: Arc<TemplateRenderer>,
    pub validator: UrlValidator,
}

impl AppState {
    /// Resolver over `releases` honouring the `latest` channel setting.
    pub fn resolver<'a>(&self, releases: &'a ReleasesStatus) -> Resolver<'a> {
        Resolver::new(releases).with_latest(self.config.versions.use_latest_channel)
    }
}

/// HTTP server for the documentation router.
pub struct HttpServer {
    router: Router,
    config: Arc<RouterConfig>,
}

impl HttpServer {
    /// Create a new HTTP server serving `manifest`.
    pub fn new(config: RouterConfig, manifest: Arc<ManifestStore>) -> Result<Self, ServerError> {
        let config = Arc::new(config);

        let state = AppState {
            routes: Arc::new(DocRouter::new(&config.versions, &config.paths.templates)?),
            targets: Arc::new(TargetParser::new(&config.versions.location)?),
            templates: Arc::new(TemplateRenderer::new(&config.paths.static_root)),
            validator: UrlValidator::new(&config.validation)?,
            manifest,
            config: config.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The Axum router, for driving the server without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            i18n = %self.config.versions.i18n,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Main handler.
/// Looks up the route and hands the request to its handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let ctx = RequestContext::from_request(&request);
    let route = state.routes.match_path(&ctx.path);

    tracing::debug!(
        request_id = %ctx.request_id,
        route = route.name(),
        path = %ctx.path,
        "Dispatching request"
    );

    let response = match &route {
        Route::Status => handlers::status(&state).await,
        Route::Health => handlers::health(),
        Route::GroupChannel { lang, group, channel } => {
            handlers::group_channel(&state, &ctx, *lang, group, channel).await
        }
        Route::Group { lang, group } => handlers::group(&state, &ctx, *lang, group).await,
        Route::RootDoc { lang } => handlers::root_doc(&state, &ctx, *lang),
        Route::Template { .. } => handlers::template(&state, &ctx).await,
        Route::NotFoundPage => handlers::not_found(&state, &ctx).await,
        Route::Static => handlers::static_file(&state, &ctx, request).await,
    }
    .into_response();

    metrics::record_request(route.name(), response.status().as_u16(), start_time);
    response
}
