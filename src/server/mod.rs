//! Tenant administration API served with axum.

pub mod auth;
pub mod handlers;
pub mod state;
pub mod store;
pub mod tenant_context;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use auth::{generate_jwt, issue_token, AuthUser, Claims, JwtError};
pub use state::AppState;
pub use store::{TenantFilter, TenantStore, UserRecord};
pub use tenant_context::RequestTenant;

use crate::client::TENANT_HEADER;
use crate::config::{AppConfig, SecurityConfig};

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/health", get(handlers::health::health))
        // Authenticated, tenant-resolved API
        .merge(api_routes(state.clone()))
        .layer(cors_layer(&config.security));

    // Request tracing wraps everything, CORS included
    let router = if config.server.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    use handlers::{profile, tenants};

    Router::new()
        .route("/api/profile/", get(profile::profile))
        .route("/api/profile/tenant/", get(profile::profile_tenant))
        .route("/api/users/:id/tenants/", get(profile::user_tenants))
        .route(
            "/api/tenants/",
            get(tenants::tenant_list).post(tenants::tenant_create),
        )
        .route(
            "/api/tenants/:id/",
            get(tenants::tenant_show)
                .patch(tenants::tenant_update)
                .delete(tenants::tenant_delete),
        )
        .route("/api/tenants/:id/activate/", post(tenants::tenant_activate))
        .route("/api/tenants/:id/deactivate/", post(tenants::tenant_deactivate))
        .route("/api/tenants/:id/hard-delete/", post(tenants::tenant_hard_delete))
        // Layers run outermost-last: JWT first, then tenant resolution
        .layer(from_fn_with_state(
            state.clone(),
            tenant_context::resolve_tenant_middleware,
        ))
        .layer(from_fn_with_state(state, auth::jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(TENANT_HEADER),
        ])
}

/// Serve the API on an already-bound listener until the process stops.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
    config: &AppConfig,
) -> std::io::Result<()> {
    axum::serve(listener, app(state, config)).await
}
