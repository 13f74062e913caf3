//! HTTP server wiring for ephembin (router, handlers, shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for paste and health endpoints.
pub mod handlers;
/// Background sweep of time-expired pastes.
pub mod reaper;

pub use ephembin_core::{
    config, models, policy, store, AppError, Config, ConsumeOutcome, PasteStore, DEFAULT_PORT,
};

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Extra request-body room for the JSON envelope around paste content, so a
/// maximum-size paste still reaches the handler's own size check.
const BODY_LIMIT_ENVELOPE_BYTES: usize = 4096;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PasteStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `store`: Shared paste store (also handed to the reaper).
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, store: Arc<PasteStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any
///   origin.
///
/// # Returns
/// Configured `axum::Router`.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is
/// disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    // Configure CORS - optionally allow public access
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", cors_port).parse().unwrap(),
                format!("http://127.0.0.1:{}", cors_port).parse().unwrap(),
            ])
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    };

    let body_limit = state
        .config
        .max_paste_size
        .saturating_add(BODY_LIMIT_ENVELOPE_BYTES);

    Router::new()
        // API routes
        .route("/api/pastes", post(handlers::paste::create_paste))
        .route("/api/pastes/:id", get(handlers::paste::consume_paste))
        .route("/api/healthz", get(handlers::health::healthz))
        // Apply state
        .with_state(state)
        // Apply middleware
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any
///   origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::{listener_cors_port, resolve_bind_address};
    use ephembin_core::{Config, DEFAULT_PORT};
    use std::net::SocketAddr;

    fn test_config(port: u16) -> Config {
        Config {
            port,
            max_paste_size: 1024,
            sweep_interval_secs: 30,
            base_url: None,
        }
    }

    #[tokio::test]
    async fn listener_cors_port_uses_bound_listener_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener");
        let expected = listener.local_addr().expect("listener addr").port();
        let resolved = listener_cors_port(&listener, DEFAULT_PORT);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn resolve_bind_address_policy() {
        // No BIND override: loopback on the configured port.
        std::env::remove_var("BIND");
        let loopback = resolve_bind_address(&test_config(4041), false);
        assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));

        // Non-loopback bind without public access is forced back to loopback.
        std::env::set_var("BIND", "0.0.0.0:4040");
        let forced = resolve_bind_address(&test_config(4041), false);
        assert_eq!(forced.ip().to_string(), "127.0.0.1");
        assert_eq!(forced.port(), 4040);

        // Public access keeps the requested address.
        let public = resolve_bind_address(&test_config(4041), true);
        assert_eq!(public, SocketAddr::from(([0, 0, 0, 0], 4040)));

        // Unparsable values fall back to the configured default.
        std::env::set_var("BIND", "bad:host");
        let fallback = resolve_bind_address(&test_config(4041), false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
        std::env::remove_var("BIND");
    }
}
