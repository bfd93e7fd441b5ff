use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DriverDashboard;
use crate::dto::map_dto::MapMarker;
use crate::dto::ApiResponse;
use crate::middleware::auth::{driver_only, AuthenticatedUser};
use crate::models::Route;
use crate::services::map_service::build_markers;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard_chofer", get(dashboard))
        .route("/asignar_ruta/:route_id", post(claim_route))
        .route("/update_route_status/:route_id/:status", post(update_route_status))
        .route("/mapa_data", get(map_data))
        .route_layer(middleware::from_fn(driver_only))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DriverDashboard>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    Ok(Json(controller.driver(&user).await?))
}

async fn claim_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = AssignmentController::new(state.store.clone());
    let route = controller.claim(&user.actor(), route_id).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Ruta asignada")))
}

async fn update_route_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((route_id, status)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = AssignmentController::new(state.store.clone());
    let route = controller.update_status(&user.actor(), route_id, &status).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Estado actualizado")))
}

async fn map_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<MapMarker>>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    let (routes, trucks) = controller.driver_map_scope(&user).await?;
    let markers = build_markers(
        &routes,
        &trucks,
        state.config.map_jitter_degrees,
        &mut rand::thread_rng(),
    );
    Ok(Json(markers))
}
