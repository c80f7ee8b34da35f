//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, CORS, security
//!   headers, rate limiting, panic recovery)
//! - Bind server to listener
//! - Run until shutdown, then drain

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::info::{get_health, get_info};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::{fallback, panic_response, timeout_as_json};
use crate::proxy::handler::news_handler;
use crate::proxy::{ProviderTable, UpstreamClient};
use crate::security::{apply_security_headers, cors_layer, rate_limit_middleware, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<ProviderTable>,
    pub upstream: UpstreamClient,
    pub started_at: Instant,
}

/// HTTP server for the news proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
    rate_limiter: Option<Arc<RateLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let upstream =
            UpstreamClient::new(&config.timeouts, config.security.max_upstream_body_size)?;
        let providers = Arc::new(ProviderTable::from_config(&config.providers));

        if providers.is_empty() {
            tracing::warn!("No provider is configured; every news endpoint will return 404");
        }

        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiter::new(&config.rate_limit)));

        let state = AppState {
            providers,
            upstream,
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state, rate_limiter.clone());
        Ok(Self {
            router,
            config,
            rate_limiter,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &ProxyConfig,
        state: AppState,
        rate_limiter: Option<Arc<RateLimiter>>,
    ) -> Router {
        let mut api = Router::new().route("/api/{provider}", get(news_handler));
        if let Some(limiter) = rate_limiter {
            api = api.route_layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        let router = Router::new()
            .route("/", get(get_info))
            .route("/health", get(get_health))
            .merge(api)
            .fallback(fallback)
            .method_not_allowed_fallback(fallback)
            .with_state(state);

        Self::with_middleware(router, config)
    }

    /// Wrap `router` in the outer stack shared by every route: security
    /// headers, CORS, request deadline, panic recovery and request IDs.
    #[allow(deprecated)]
    fn with_middleware(mut router: Router, config: &ProxyConfig) -> Router {
        if config.security.enable_headers {
            router = apply_security_headers(router);
        }

        router
            .layer(cors_layer(&config.cors))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(timeout_as_json))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request.request_id(),
                        )
                    }))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let pruner = self.rate_limiter.clone().map(|limiter| {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(limiter.window());
                loop {
                    interval.tick().await;
                    limiter.prune();
                    tracing::debug!(clients = limiter.tracked_clients(), "Pruned rate limit buckets");
                }
            })
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested");
            })
            .await?;

        if let Some(pruner) = pruner {
            pruner.abort();
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
