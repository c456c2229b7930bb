//! Application setup and server configuration.

use anyhow::Result;
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::HttpConfig;
use crate::kernel::ServerDeps;
use crate::server::middleware::{
    extract_client_ip, limit_login_attempts, require_auth, LoginRateLimiter,
};
use crate::server::routes::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    /// Per-IP limiter applied to `/auth/login`
    pub login_limiter: LoginRateLimiter,
}

/// Build the Axum application router
///
/// Reads and the realtime stream are public; every mutation (and registering
/// another user) requires a bearer token.
///
/// Must be called from within a Tokio runtime: it spawns the task that prunes
/// the login limiter.
pub fn build_app(deps: ServerDeps, http: &HttpConfig) -> Result<Router> {
    let login_limiter = LoginRateLimiter::new(&http.login_rate_limit)?;
    login_limiter.spawn_pruning(http.login_rate_limit.window);

    let app_state = AppState {
        deps,
        login_limiter,
    };

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone services for middleware closures
    let jwt_service = app_state.deps.jwt_service.clone();
    let auth_layer = middleware::from_fn(move |req, next| {
        require_auth(jwt_service.clone(), req, next)
    });
    let login_limiter = app_state.login_limiter.clone();
    let login_limit_layer = middleware::from_fn(move |req, next| {
        limit_login_attempts(login_limiter.clone(), req, next)
    });
    let trust_proxy = http.trust_proxy;
    let client_ip_layer =
        middleware::from_fn(move |req, next| extract_client_ip(trust_proxy, req, next));

    let public = Router::new()
        .route("/health", get(health_handler))
        .route("/realtime", get(stream_handler))
        .route(
            "/auth/login",
            post(login_handler).route_layer(login_limit_layer),
        )
        // Events
        .route("/events", get(list_events_handler))
        .route("/events/:codigo", get(get_event_handler))
        // Cubicles (static segments win over :codigo)
        .route("/cubiculos", get(list_cubicles_handler))
        .route("/cubiculos/disponibles", get(available_cubicles_handler))
        .route("/cubiculos/buscar/filtros", get(filter_cubicles_handler))
        .route("/cubiculos/:codigo", get(get_cubicle_handler))
        // Professors
        .route("/profesores", get(list_professors_handler))
        .route(
            "/profesores/sin-cubiculo",
            get(professors_without_cubicle_handler),
        )
        .route("/profesores/buscar/filtros", get(filter_professors_handler))
        .route("/profesores/:codigo", get(get_professor_handler));

    let protected = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/events", post(create_event_handler))
        .route(
            "/events/:codigo",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route("/cubiculos", post(create_cubicle_handler))
        .route(
            "/cubiculos/:codigo",
            put(update_cubicle_handler).delete(delete_cubicle_handler),
        )
        .route("/profesores", post(create_professor_handler))
        .route(
            "/profesores/:codigo",
            put(update_professor_handler).delete(delete_professor_handler),
        )
        .route_layer(auth_layer);

    let app = public
        .merge(protected)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(client_ip_layer)
        .layer(Extension(app_state)) // Add shared state
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
