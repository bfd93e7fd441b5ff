//! Controlador del panel de administración
//!
//! CRUD de camiones y rutas, alta de cuentas y opciones de formularios.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::account_dto::{AccountResponse, CreateAccountRequest};
use crate::dto::dashboard_dto::{RouteForm, RouteHistory, TruckForm};
use crate::dto::route_dto::RouteRequest;
use crate::dto::truck_dto::TruckRequest;
use crate::models::{
    Account, NewAccount, Role, Route, RouteFields, RouteStatus, Truck, TruckFields, TruckStatus,
};
use crate::repositories::FleetStore;
use crate::services::auth_service::hash_password;
use crate::services::map_service::CITY_COORDINATES;
use crate::utils::errors::{
    conflict_error, estado_no_soportado, not_found_error, AppError, AppResult, ROL_NO_RECONOCIDO,
};
use crate::utils::validation::{normalize_city, normalize_plate};

pub struct AdminController {
    store: Arc<dyn FleetStore>,
}

impl AdminController {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    // ---- Trucks ----

    pub async fn list_trucks(&self) -> AppResult<Vec<Truck>> {
        self.store.list_trucks().await
    }

    /// Opciones del formulario; con `id`, el camión a editar
    pub async fn truck_form(&self, id: Option<Uuid>) -> AppResult<TruckForm> {
        let truck = match id {
            Some(id) => Some(self.find_truck(id).await?),
            None => None,
        };
        let accounts = self.store.list_accounts().await?;
        let with_role = |role: Role| -> Vec<AccountResponse> {
            accounts
                .iter()
                .filter(|a| a.role == role)
                .map(AccountResponse::from)
                .collect()
        };

        Ok(TruckForm {
            truck,
            statuses: TruckStatus::ALL.iter().map(TruckStatus::as_str).collect(),
            drivers: with_role(Role::Driver),
            dispatchers: with_role(Role::Dispatcher),
        })
    }

    pub async fn create_truck(&self, request: TruckRequest) -> AppResult<Truck> {
        let fields = self.truck_fields(request, None).await?;
        let truck = self.store.insert_truck(&Truck::from_fields(fields)).await?;
        info!("🚛 Camión {} creado ({})", truck.plate, truck.id);
        Ok(truck)
    }

    pub async fn update_truck(&self, id: Uuid, request: TruckRequest) -> AppResult<Truck> {
        self.find_truck(id).await?;
        let fields = self.truck_fields(request, Some(id)).await?;
        let truck = self
            .store
            .update_truck(id, fields)
            .await?
            .ok_or_else(|| not_found_error("Camión", &id.to_string()))?;
        info!("🚛 Camión {} actualizado", truck.plate);
        Ok(truck)
    }

    pub async fn delete_truck(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_truck(id).await? {
            return Err(not_found_error("Camión", &id.to_string()));
        }
        info!("🗑️ Camión {} eliminado", id);
        Ok(())
    }

    async fn find_truck(&self, id: Uuid) -> AppResult<Truck> {
        self.store
            .find_truck(id)
            .await?
            .ok_or_else(|| not_found_error("Camión", &id.to_string()))
    }

    /// Verifica que la referencia apunte a una cuenta con el rol esperado
    async fn check_reference(&self, id: Option<Uuid>, role: Role, field: &str) -> AppResult<()> {
        let Some(id) = id else { return Ok(()) };
        match self.store.find_account(id).await? {
            Some(account) if account.role == role => Ok(()),
            _ => Err(AppError::BadRequest(format!(
                "{} debe referenciar una cuenta con rol {}",
                field, role
            ))),
        }
    }

    async fn truck_fields(&self, request: TruckRequest, exclude: Option<Uuid>) -> AppResult<TruckFields> {
        request.validate()?;

        let plate = normalize_plate(&request.plate);
        let status = match request.status.as_deref() {
            None => TruckStatus::Disponible,
            Some(raw) => raw
                .parse::<TruckStatus>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        };
        let cargo = request
            .cargo
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        self.check_reference(request.driver_id, Role::Driver, "driver_id").await?;
        self.check_reference(request.dispatcher_id, Role::Dispatcher, "dispatcher_id")
            .await?;

        if self.store.plate_exists(&plate, exclude).await? {
            return Err(conflict_error("Camión", "patente", &plate));
        }
        if let Some(driver_id) = request.driver_id {
            let owned = self.store.trucks_by_driver(driver_id).await?;
            if owned.iter().any(|t| Some(t.id) != exclude) {
                return Err(AppError::Conflict(
                    "El chofer ya tiene un camión asignado".to_string(),
                ));
            }
        }

        Ok(TruckFields {
            plate,
            status,
            cargo,
            driver_id: request.driver_id,
            dispatcher_id: request.dispatcher_id,
        })
    }

    // ---- Routes ----

    pub async fn list_routes(&self) -> AppResult<Vec<Route>> {
        self.store.list_routes().await
    }

    pub async fn route_form(&self, id: Option<Uuid>) -> AppResult<RouteForm> {
        let route = match id {
            Some(id) => Some(self.find_route(id).await?),
            None => None,
        };

        Ok(RouteForm {
            route,
            statuses: RouteStatus::ALL.iter().map(RouteStatus::as_str).collect(),
            trucks: self.store.list_trucks().await?,
            cities: CITY_COORDINATES.iter().map(|(city, _, _)| *city).collect(),
        })
    }

    pub async fn create_route(&self, request: RouteRequest) -> AppResult<Route> {
        let fields = self.route_fields(request).await?;
        let route = self.store.insert_route(&Route::from_fields(fields)).await?;
        info!("🛣️ Ruta {} creada: {} → {}", route.id, route.origin, route.destination);
        Ok(route)
    }

    pub async fn update_route(&self, id: Uuid, request: RouteRequest) -> AppResult<Route> {
        self.find_route(id).await?;
        let fields = self.route_fields(request).await?;
        let route = self
            .store
            .update_route(id, fields)
            .await?
            .ok_or_else(|| not_found_error("Ruta", &id.to_string()))?;
        info!("🛣️ Ruta {} actualizada ({})", route.id, route.status);
        Ok(route)
    }

    pub async fn delete_route(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_route(id).await? {
            return Err(not_found_error("Ruta", &id.to_string()));
        }
        info!("🗑️ Ruta {} eliminada", id);
        Ok(())
    }

    pub async fn route_history(&self, id: Uuid) -> AppResult<RouteHistory> {
        let route = self.find_route(id).await?;
        let tracking = self.store.tracking_for_route(id).await?;
        Ok(RouteHistory { route, tracking })
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Route> {
        self.store
            .find_route(id)
            .await?
            .ok_or_else(|| not_found_error("Ruta", &id.to_string()))
    }

    async fn route_fields(&self, request: RouteRequest) -> AppResult<RouteFields> {
        request.validate()?;

        let status = match request.status.as_deref() {
            None => RouteStatus::Pending,
            Some(raw) => raw.parse().map_err(|_| estado_no_soportado())?,
        };
        if let Some(truck_id) = request.truck_id {
            if self.store.find_truck(truck_id).await?.is_none() {
                return Err(AppError::BadRequest(format!(
                    "El camión '{}' no existe",
                    truck_id
                )));
            }
        }

        Ok(RouteFields {
            origin: normalize_city(&request.origin),
            destination: normalize_city(&request.destination),
            status,
            truck_id: request.truck_id,
        })
    }

    // ---- Accounts ----

    pub async fn list_accounts(&self) -> AppResult<Vec<AccountResponse>> {
        let accounts = self.store.list_accounts().await?;
        Ok(accounts.into_iter().map(AccountResponse::from).collect())
    }

    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
        bcrypt_cost: u32,
    ) -> AppResult<AccountResponse> {
        request.validate()?;

        let role: Role = request
            .role
            .parse()
            .map_err(|_| AppError::BadRequest(ROL_NO_RECONOCIDO.to_string()))?;
        if self.store.username_exists(&request.username).await? {
            return Err(conflict_error("Cuenta", "usuario", &request.username));
        }

        let password_hash = hash_password(request.password, bcrypt_cost).await?;
        let account = self
            .store
            .insert_account(&Account::from_new(NewAccount {
                username: request.username,
                role,
                password_hash,
            }))
            .await?;
        info!("👤 Cuenta '{}' creada con rol {}", account.username, account.role);
        Ok(AccountResponse::from(account))
    }
}
