//! Implementación en memoria del FleetStore
//!
//! Todas las tablas viven detrás de un único `RwLock`, de modo que cada
//! operación (incluidas las transiciones compare-and-swap) se ejecuta
//! con el lock de escritura tomado de principio a fin.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Account, Route, RouteFields, RouteStatus, Tracking, Truck, TruckFields, TruckStatus,
};
use crate::repositories::fleet_store::FleetStore;
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    trucks: HashMap<Uuid, Truck>,
    routes: HashMap<Uuid, Route>,
    tracking: Vec<Tracking>,
}

impl Tables {
    fn check_truck_uniques(&self, fields: &TruckFields, exclude: Option<Uuid>) -> AppResult<()> {
        let others = self.trucks.values().filter(|t| Some(t.id) != exclude);
        for other in others {
            if other.plate == fields.plate {
                return Err(AppError::Conflict(
                    "La patente o el chofer ya están asignados a otro camión".to_string(),
                ));
            }
            if fields.driver_id.is_some() && other.driver_id == fields.driver_id {
                return Err(AppError::Conflict(
                    "La patente o el chofer ya están asignados a otro camión".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Ordena por fecha de creación y luego por id, igual que el ORDER BY del store SQL
fn sorted<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[derive(Default)]
pub struct MemoryFleetStore {
    tables: RwLock<Tables>,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn insert_account(&self, account: &Account) -> AppResult<Account> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.username == account.username) {
            return Err(AppError::Conflict(
                "El nombre de usuario ya está registrado".to_string(),
            ));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(account.clone())
    }

    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.accounts.values().cloned(), |a| (a.created_at, a.id)))
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().any(|a| a.username == username))
    }

    async fn insert_truck(&self, truck: &Truck) -> AppResult<Truck> {
        let mut tables = self.tables.write().await;
        let fields = TruckFields {
            plate: truck.plate.clone(),
            status: truck.status,
            cargo: truck.cargo.clone(),
            driver_id: truck.driver_id,
            dispatcher_id: truck.dispatcher_id,
        };
        tables.check_truck_uniques(&fields, None)?;
        tables.trucks.insert(truck.id, truck.clone());
        Ok(truck.clone())
    }

    async fn update_truck(&self, id: Uuid, fields: TruckFields) -> AppResult<Option<Truck>> {
        let mut tables = self.tables.write().await;
        if !tables.trucks.contains_key(&id) {
            return Ok(None);
        }
        tables.check_truck_uniques(&fields, Some(id))?;
        Ok(tables.trucks.get_mut(&id).map(|truck| {
            truck.apply(fields);
            truck.clone()
        }))
    }

    async fn delete_truck(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.trucks.remove(&id).is_some();
        if removed {
            for route in tables.routes.values_mut().filter(|r| r.truck_id == Some(id)) {
                route.truck_id = None;
                if route.status == RouteStatus::InProgress {
                    route.status = RouteStatus::Pending;
                    route.started_at = None;
                }
            }
        }
        Ok(removed)
    }

    async fn find_truck(&self, id: Uuid) -> AppResult<Option<Truck>> {
        Ok(self.tables.read().await.trucks.get(&id).cloned())
    }

    async fn list_trucks(&self) -> AppResult<Vec<Truck>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.trucks.values().cloned(), |t| (t.created_at, t.id)))
    }

    async fn trucks_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Truck>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables.trucks.values().filter(|t| t.is_driven_by(driver_id)).cloned(),
            |t| (t.created_at, t.id),
        ))
    }

    async fn trucks_by_dispatcher(&self, dispatcher_id: Uuid) -> AppResult<Vec<Truck>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables.trucks.values().filter(|t| t.is_dispatched_by(dispatcher_id)).cloned(),
            |t| (t.created_at, t.id),
        ))
    }

    async fn plate_exists(&self, plate: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .trucks
            .values()
            .any(|t| t.plate == plate && Some(t.id) != exclude))
    }

    async fn set_truck_status(&self, id: Uuid, status: TruckStatus) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(truck) = tables.trucks.get_mut(&id) {
            truck.status = status;
        }
        Ok(())
    }

    async fn insert_route(&self, route: &Route) -> AppResult<Route> {
        let mut tables = self.tables.write().await;
        tables.routes.insert(route.id, route.clone());
        Ok(route.clone())
    }

    async fn update_route(&self, id: Uuid, fields: RouteFields) -> AppResult<Option<Route>> {
        let mut tables = self.tables.write().await;
        Ok(tables.routes.get_mut(&id).map(|route| {
            route.apply(fields);
            route.clone()
        }))
    }

    async fn delete_route(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.routes.remove(&id).is_some();
        tables.tracking.retain(|entry| entry.route_id != id);
        Ok(removed)
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        Ok(self.tables.read().await.routes.get(&id).cloned())
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.routes.values().cloned(), |r| (r.created_at, r.id)))
    }

    async fn routes_for_trucks(&self, truck_ids: &[Uuid]) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .routes
                .values()
                .filter(|r| r.truck_id.map_or(false, |id| truck_ids.contains(&id)))
                .cloned(),
            |r| (r.created_at, r.id),
        ))
    }

    async fn open_routes(&self) -> AppResult<Vec<Route>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables.routes.values().filter(|r| r.is_open()).cloned(),
            |r| (r.created_at, r.id),
        ))
    }

    async fn bind_open_route(
        &self,
        route_id: Uuid,
        truck_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Route>> {
        let mut tables = self.tables.write().await;

        let bound = match tables.routes.get_mut(&route_id) {
            Some(route) if route.is_open() => {
                route.truck_id = Some(truck_id);
                route.status = RouteStatus::InProgress;
                route.started_at = Some(at);
                Some(route.clone())
            }
            _ => None,
        };

        if bound.is_some() {
            if let Some(truck) = tables.trucks.get_mut(&truck_id) {
                truck.status = TruckStatus::EnRuta;
            }
        }
        Ok(bound)
    }

    async fn advance_route(
        &self,
        route_id: Uuid,
        expected_truck: Uuid,
        status: RouteStatus,
        started_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Route>> {
        let mut tables = self.tables.write().await;

        let advanced = match tables.routes.get_mut(&route_id) {
            Some(route)
                if route.truck_id == Some(expected_truck) && !route.status.is_terminal() =>
            {
                route.status = status;
                route.started_at = started_at;
                Some(route.clone())
            }
            _ => None,
        };

        if advanced.is_some() {
            let still_active = tables.routes.values().any(|r| {
                r.truck_id == Some(expected_truck) && r.status == RouteStatus::InProgress
            });
            if let Some(truck) = tables.trucks.get_mut(&expected_truck) {
                match status {
                    RouteStatus::InProgress => truck.status = TruckStatus::EnRuta,
                    RouteStatus::Completed
                        if truck.status == TruckStatus::EnRuta && !still_active =>
                    {
                        truck.status = TruckStatus::Disponible
                    }
                    _ => {}
                }
            }
        }
        Ok(advanced)
    }

    async fn insert_tracking(&self, entry: &Tracking) -> AppResult<()> {
        self.tables.write().await.tracking.push(entry.clone());
        Ok(())
    }

    async fn tracking_for_route(&self, route_id: Uuid) -> AppResult<Vec<Tracking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tracking
            .iter()
            .filter(|entry| entry.route_id == route_id)
            .cloned()
            .collect())
    }
}
