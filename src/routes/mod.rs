//! Router de la aplicación
//!
//! Rutas públicas de sesión más un router por rol. Cada router de rol
//! lleva su guard como `route_layer`; el conjunto protegido pasa antes
//! por el middleware de sesión.

pub mod admin_routes;
pub mod auth_routes;
pub mod dispatcher_routes;
pub mod driver_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::session_middleware;
use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(driver_routes::create_driver_router())
        .merge(dispatcher_routes::create_dispatcher_router())
        .merge(admin_routes::create_admin_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes::create_auth_router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
