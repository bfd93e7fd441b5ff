//! Controlador de dashboards y datos de mapa

use std::sync::Arc;

use uuid::Uuid;

use crate::dto::account_dto::AccountResponse;
use crate::dto::dashboard_dto::{AdminDashboard, AssignmentForm, DispatcherDashboard, DriverDashboard};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Route, Truck};
use crate::repositories::FleetStore;
use crate::services::stats_service;
use crate::utils::errors::{not_found_error, ruta_no_disponible, AppError, AppResult};

pub struct DashboardController {
    store: Arc<dyn FleetStore>,
}

impl DashboardController {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    async fn account(&self, user: &AuthenticatedUser) -> AppResult<AccountResponse> {
        self.store
            .find_account(user.account_id)
            .await?
            .map(AccountResponse::from)
            .ok_or_else(|| AppError::Unauthorized("Cuenta no encontrada".to_string()))
    }

    async fn routes_of(&self, trucks: &[Truck]) -> AppResult<Vec<Route>> {
        let ids: Vec<Uuid> = trucks.iter().map(|t| t.id).collect();
        self.store.routes_for_trucks(&ids).await
    }

    pub async fn driver(&self, user: &AuthenticatedUser) -> AppResult<DriverDashboard> {
        let account = self.account(user).await?;
        let trucks = self.store.trucks_by_driver(user.account_id).await?;
        let assigned_routes = self.routes_of(&trucks).await?;
        let available_routes = self.store.open_routes().await?;

        Ok(DriverDashboard {
            account,
            truck: trucks.into_iter().next(),
            assigned_routes,
            available_routes,
        })
    }

    pub async fn dispatcher(&self, user: &AuthenticatedUser) -> AppResult<DispatcherDashboard> {
        let account = self.account(user).await?;
        let fleet = self.store.trucks_by_dispatcher(user.account_id).await?;
        let fleet_routes = self.routes_of(&fleet).await?;
        let pending_routes = self.store.open_routes().await?;

        Ok(DispatcherDashboard {
            account,
            fleet,
            pending_routes,
            fleet_routes,
        })
    }

    /// Ruta libre más los camiones propios del despachador
    pub async fn assignment_form(
        &self,
        user: &AuthenticatedUser,
        route_id: Uuid,
    ) -> AppResult<AssignmentForm> {
        let route = self
            .store
            .find_route(route_id)
            .await?
            .ok_or_else(|| not_found_error("Ruta", &route_id.to_string()))?;
        if !route.is_open() {
            return Err(ruta_no_disponible());
        }
        let candidate_trucks = self.store.trucks_by_dispatcher(user.account_id).await?;

        Ok(AssignmentForm {
            route,
            candidate_trucks,
        })
    }

    pub async fn admin(&self) -> AppResult<AdminDashboard> {
        let accounts = self.store.list_accounts().await?;
        let trucks = self.store.list_trucks().await?;
        let routes = self.store.list_routes().await?;
        Ok(stats_service::admin_dashboard(&accounts, &trucks, &routes))
    }

    /// Rutas y camiones visibles para el mapa del chofer
    pub async fn driver_map_scope(&self, user: &AuthenticatedUser) -> AppResult<(Vec<Route>, Vec<Truck>)> {
        let trucks = self.store.trucks_by_driver(user.account_id).await?;
        let routes = self.routes_of(&trucks).await?;
        Ok((routes, trucks))
    }

    pub async fn dispatcher_map_scope(
        &self,
        user: &AuthenticatedUser,
    ) -> AppResult<(Vec<Route>, Vec<Truck>)> {
        let trucks = self.store.trucks_by_dispatcher(user.account_id).await?;
        let routes = self.routes_of(&trucks).await?;
        Ok((routes, trucks))
    }

    pub async fn admin_map_scope(&self) -> AppResult<(Vec<Route>, Vec<Truck>)> {
        let trucks = self.store.list_trucks().await?;
        let routes = self.store.list_routes().await?;
        Ok((routes, trucks))
    }
}
