use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginForm, LoginRequest};
use crate::middleware::auth::resolve_session;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::SESSION_COOKIE;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// Con sesión válida redirige al dashboard; sin ella describe el formulario
async fn login_form(State(state): State<AppState>, jar: CookieJar, headers: HeaderMap) -> Response {
    match resolve_session(&state, &jar, &headers).await {
        Ok(user) => Redirect::to(user.role.dashboard_path()).into_response(),
        Err(_) => Json(LoginForm::default()).into_response(),
    }
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let controller = AuthController::new(state.store.clone(), state.jwt.clone());
    let response = controller.login(request).await?;

    let max_age = i64::try_from(state.jwt.expiration).unwrap_or(i64::MAX);
    let cookie = Cookie::build((SESSION_COOKIE, response.token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age));

    Ok((jar.add(cookie), Json(response)).into_response())
}

async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/login")).into_response()
}
