use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::admin_controller::AdminController;
use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::account_dto::{AccountResponse, CreateAccountRequest};
use crate::dto::dashboard_dto::{AdminDashboard, RouteForm, RouteHistory, TruckForm};
use crate::dto::map_dto::MapMarker;
use crate::dto::route_dto::RouteRequest;
use crate::dto::truck_dto::TruckRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::admin_only;
use crate::models::{Route, Truck};
use crate::services::map_service::build_markers;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard_admin", get(dashboard))
        .route("/mapa_admin_data", get(map_data))
        .route("/admin/trucks", get(list_trucks).post(create_truck))
        .route("/admin/trucks/new", get(new_truck_form))
        .route("/admin/trucks/:id/edit", get(edit_truck_form).post(update_truck))
        .route("/admin/trucks/:id/delete", post(delete_truck))
        .route("/admin/routes", get(list_routes).post(create_route))
        .route("/admin/routes/new", get(new_route_form))
        .route("/admin/routes/:id/edit", get(edit_route_form).post(update_route))
        .route("/admin/routes/:id/delete", post(delete_route))
        .route("/admin/routes/:id/tracking", get(route_tracking))
        .route("/admin/users", get(list_accounts).post(create_account))
        .route_layer(middleware::from_fn(admin_only))
}

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

async fn dashboard(State(state): State<AppState>) -> Result<Json<AdminDashboard>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    Ok(Json(controller.admin().await?))
}

async fn map_data(State(state): State<AppState>) -> Result<Json<Vec<MapMarker>>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    let (routes, trucks) = controller.admin_map_scope().await?;
    let markers = build_markers(
        &routes,
        &trucks,
        state.config.map_jitter_degrees,
        &mut rand::thread_rng(),
    );
    Ok(Json(markers))
}

// ---- Trucks ----

async fn list_trucks(State(state): State<AppState>) -> Result<Json<Vec<Truck>>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.list_trucks().await?))
}

async fn new_truck_form(State(state): State<AppState>) -> Result<Json<TruckForm>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.truck_form(None).await?))
}

async fn edit_truck_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TruckForm>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.truck_form(Some(id)).await?))
}

async fn create_truck(
    State(state): State<AppState>,
    Json(request): Json<TruckRequest>,
) -> Result<Created<Truck>, AppError> {
    let controller = AdminController::new(state.store.clone());
    let truck = controller.create_truck(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(truck, "Camión creado exitosamente")),
    ))
}

async fn update_truck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let controller = AdminController::new(state.store.clone());
    let truck = controller.update_truck(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        truck,
        "Camión actualizado exitosamente",
    )))
}

async fn delete_truck(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = AdminController::new(state.store.clone());
    controller.delete_truck(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Camión eliminado exitosamente"
    })))
}

// ---- Routes ----

async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.list_routes().await?))
}

async fn new_route_form(State(state): State<AppState>) -> Result<Json<RouteForm>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.route_form(None).await?))
}

async fn edit_route_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteForm>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.route_form(Some(id)).await?))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Created<Route>, AppError> {
    let controller = AdminController::new(state.store.clone());
    let route = controller.create_route(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(route, "Ruta creada exitosamente")),
    ))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let controller = AdminController::new(state.store.clone());
    let route = controller.update_route(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        route,
        "Ruta actualizada exitosamente",
    )))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = AdminController::new(state.store.clone());
    controller.delete_route(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Ruta eliminada exitosamente"
    })))
}

async fn route_tracking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteHistory>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.route_history(id).await?))
}

// ---- Accounts ----

async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let controller = AdminController::new(state.store.clone());
    Ok(Json(controller.list_accounts().await?))
}

async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Created<AccountResponse>, AppError> {
    let controller = AdminController::new(state.store.clone());
    let account = controller
        .create_account(request, state.config.bcrypt_cost)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(account, "Cuenta creada exitosamente")),
    ))
}
