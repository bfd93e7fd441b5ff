use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::{AssignmentForm, DispatcherDashboard};
use crate::dto::map_dto::MapMarker;
use crate::dto::ApiResponse;
use crate::middleware::auth::{dispatcher_only, AuthenticatedUser};
use crate::models::Route;
use crate::services::map_service::build_markers;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dispatcher_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard_despachador", get(dashboard))
        .route("/asignar_chofer/:route_id", get(assignment_form))
        .route(
            "/asignar_chofer_confirm/:route_id/:truck_id",
            post(confirm_assignment),
        )
        .route("/mapa_despachador_data", get(map_data))
        .route_layer(middleware::from_fn(dispatcher_only))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DispatcherDashboard>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    Ok(Json(controller.dispatcher(&user).await?))
}

async fn assignment_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<AssignmentForm>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    Ok(Json(controller.assignment_form(&user, route_id).await?))
}

async fn confirm_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((route_id, truck_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = AssignmentController::new(state.store.clone());
    let route = controller.assign(&user.actor(), route_id, truck_id).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Camión asignado")))
}

async fn map_data(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<MapMarker>>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    let (routes, trucks) = controller.dispatcher_map_scope(&user).await?;
    let markers = build_markers(
        &routes,
        &trucks,
        state.config.map_jitter_degrees,
        &mut rand::thread_rng(),
    );
    Ok(Json(markers))
}
