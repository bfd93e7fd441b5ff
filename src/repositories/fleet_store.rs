//! Contrato de persistencia
//!
//! Un único trait cubre las tres tablas del dominio más el historial.
//! Las transiciones de ruta se exponen como operaciones atómicas de
//! tipo compare-and-swap: devuelven `None` cuando la condición esperada
//! ya no se cumple.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Account, Route, RouteFields, RouteStatus, Tracking, Truck, TruckFields, TruckStatus,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait FleetStore: Send + Sync {
    // ---- Accounts ----
    async fn insert_account(&self, account: &Account) -> AppResult<Account>;
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>>;
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>>;
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;
    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    // ---- Trucks ----
    async fn insert_truck(&self, truck: &Truck) -> AppResult<Truck>;
    async fn update_truck(&self, id: Uuid, fields: TruckFields) -> AppResult<Option<Truck>>;
    /// Borra el camión y desvincula sus rutas; las que estaban en curso
    /// vuelven a `pendiente` sin `started_at`
    async fn delete_truck(&self, id: Uuid) -> AppResult<bool>;
    async fn find_truck(&self, id: Uuid) -> AppResult<Option<Truck>>;
    async fn list_trucks(&self) -> AppResult<Vec<Truck>>;
    async fn trucks_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Truck>>;
    async fn trucks_by_dispatcher(&self, dispatcher_id: Uuid) -> AppResult<Vec<Truck>>;
    async fn plate_exists(&self, plate: &str, exclude: Option<Uuid>) -> AppResult<bool>;
    async fn set_truck_status(&self, id: Uuid, status: TruckStatus) -> AppResult<()>;

    // ---- Routes ----
    async fn insert_route(&self, route: &Route) -> AppResult<Route>;
    async fn update_route(&self, id: Uuid, fields: RouteFields) -> AppResult<Option<Route>>;
    /// Borra la ruta junto con su historial
    async fn delete_route(&self, id: Uuid) -> AppResult<bool>;
    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>>;
    async fn list_routes(&self) -> AppResult<Vec<Route>>;
    async fn routes_for_trucks(&self, truck_ids: &[Uuid]) -> AppResult<Vec<Route>>;
    /// Rutas pendientes sin camión
    async fn open_routes(&self) -> AppResult<Vec<Route>>;

    // ---- Transiciones atómicas ----

    /// Vincula `truck_id` a la ruta solo si sigue pendiente y sin camión.
    /// Deja la ruta en progreso y el camión "en ruta".
    async fn bind_open_route(
        &self,
        route_id: Uuid,
        truck_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Route>>;

    /// Cambia el estado de una ruta no terminada cuyo camión sigue siendo
    /// `expected_truck`. Ajusta el estado del camión en la misma operación.
    async fn advance_route(
        &self,
        route_id: Uuid,
        expected_truck: Uuid,
        status: RouteStatus,
        started_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Route>>;

    // ---- Tracking ----
    async fn insert_tracking(&self, entry: &Tracking) -> AppResult<()>;
    async fn tracking_for_route(&self, route_id: Uuid) -> AppResult<Vec<Tracking>>;
}
