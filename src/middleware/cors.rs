//! Middleware de CORS

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::environment::EnvironmentConfig;

/// CORS permisivo para desarrollo
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// CORS con orígenes específicos; la cookie de sesión exige credenciales
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Elegir la capa según la configuración.
///
/// En producción sin `CORS_ORIGINS` no se acepta ningún origen cruzado.
pub fn cors_layer(config: &EnvironmentConfig) -> CorsLayer {
    if !config.cors_origins.is_empty() {
        cors_middleware_with_origins(&config.cors_origins)
    } else if config.is_production() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: solo mismo origen");
        CorsLayer::new()
    } else {
        cors_middleware()
    }
}
