//! Middleware de sesión
//!
//! Resuelve la identidad a partir del JWT (cookie `session` o header
//! `Authorization: Bearer`), comprueba que la cuenta siga existiendo con
//! el mismo rol y la inyecta en las extensions. Los guards por rol van
//! como `route_layer` sobre cada router.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::{
    models::Role,
    services::Actor,
    state::AppState,
    utils::{
        errors::{no_autorizado, AppError, AppResult},
        jwt::{token_from_authorization, verify_token, SESSION_COOKIE},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.account_id,
            role: self.role,
        }
    }
}

/// Token de la cookie o, si no hay, del header Authorization
fn extract_token<'a>(jar: &'a CookieJar, headers: &'a HeaderMap) -> Option<&'a str> {
    let from_cookie = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(token_from_authorization)
    })
}

/// Validar la sesión contra el store
pub async fn resolve_session(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> AppResult<AuthenticatedUser> {
    let token = extract_token(jar, headers)
        .ok_or_else(|| AppError::Unauthorized("Sesión requerida".to_string()))?;

    let claims = verify_token(token, &state.jwt)?;
    let role = claims.role()?;
    let account_id = claims.account_id()?;

    let account = state
        .store
        .find_account(account_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Cuenta no encontrada".to_string()))?;

    if account.role != role {
        return Err(AppError::Unauthorized("Sesión desactualizada".to_string()));
    }

    Ok(AuthenticatedUser {
        account_id: account.id,
        username: account.username,
        role: account.role,
    })
}

/// Middleware de sesión obligatoria
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_session(&state, &jar, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn require_role(user: &AuthenticatedUser, role: Role) -> AppResult<()> {
    if user.role != role {
        warn!(
            "🚫 '{}' ({}) intentó acceder a un recurso de {}",
            user.username, user.role, role
        );
        return Err(no_autorizado());
    }
    Ok(())
}

/// Middleware para rutas del chofer
pub async fn driver_only(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&user, Role::Driver)?;
    Ok(next.run(request).await)
}

/// Middleware para rutas del despachador
pub async fn dispatcher_only(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&user, Role::Dispatcher)?;
    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(&user, Role::Admin)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_wins_over_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(extract_token(&jar, &headers), Some("from-header"));

        headers.insert(header::COOKIE, HeaderValue::from_static("lang=es; session=from-cookie"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(extract_token(&jar, &headers), Some("from-cookie"));
    }

    #[test]
    fn test_empty_session_cookie_falls_back_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(extract_token(&jar, &headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(extract_token(&jar, &headers), Some("from-header"));
    }

    #[test]
    fn test_no_credentials() {
        let headers = HeaderMap::new();
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(extract_token(&jar, &headers), None);
    }
}
