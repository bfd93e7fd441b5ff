//! Controlador de asignaciones
//!
//! Carga la foto actual, pide la decisión a `assignment_service` y la
//! aplica con las operaciones atómicas del store.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Route, Tracking};
use crate::repositories::FleetStore;
use crate::services::assignment_service::{
    plan_assign, plan_claim, plan_status_change, Actor, Transition,
};
use crate::utils::errors::{not_found_error, ruta_no_disponible, AppResult};

pub struct AssignmentController {
    store: Arc<dyn FleetStore>,
}

impl AssignmentController {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    async fn load_route(&self, route_id: Uuid) -> AppResult<Route> {
        self.store
            .find_route(route_id)
            .await?
            .ok_or_else(|| not_found_error("Ruta", &route_id.to_string()))
    }

    /// Chofer toma una ruta libre
    pub async fn claim(&self, actor: &Actor, route_id: Uuid) -> AppResult<Route> {
        let route = self.load_route(route_id).await?;
        let trucks = self.store.trucks_by_driver(actor.id).await?;
        let transition = plan_claim(actor, &route, &trucks)?;
        self.execute(actor, &route, transition).await
    }

    /// Despachador asigna uno de sus camiones
    pub async fn assign(&self, actor: &Actor, route_id: Uuid, truck_id: Uuid) -> AppResult<Route> {
        let route = self.load_route(route_id).await?;
        let truck = self
            .store
            .find_truck(truck_id)
            .await?
            .ok_or_else(|| not_found_error("Camión", &truck_id.to_string()))?;
        let transition = plan_assign(actor, &route, &truck)?;
        self.execute(actor, &route, transition).await
    }

    /// Chofer reanuda o completa una ruta de su camión
    pub async fn update_status(
        &self,
        actor: &Actor,
        route_id: Uuid,
        requested: &str,
    ) -> AppResult<Route> {
        let route = self.load_route(route_id).await?;
        let route_truck = match route.truck_id {
            Some(truck_id) => self.store.find_truck(truck_id).await?,
            None => None,
        };
        let transition = plan_status_change(actor, &route, route_truck.as_ref(), requested)?;
        self.execute(actor, &route, transition).await
    }

    async fn execute(&self, actor: &Actor, route: &Route, transition: Transition) -> AppResult<Route> {
        let now = Utc::now();
        let applied = if transition.binds_truck() {
            self.store
                .bind_open_route(route.id, transition.truck_id(), now)
                .await?
        } else {
            self.store
                .advance_route(
                    route.id,
                    transition.truck_id(),
                    transition.target_status(),
                    transition.started_at(now),
                )
                .await?
        };

        // Otra request cambió la ruta entre la lectura y la escritura
        let updated = applied.ok_or_else(|| {
            warn!("⚔️ Ruta {} cambió antes de aplicar {:?}", route.id, transition);
            ruta_no_disponible()
        })?;

        info!(
            "🚚 Ruta {} {} → {} (camión {}, cuenta {})",
            updated.id,
            route.status,
            updated.status,
            transition.truck_id(),
            actor.id
        );

        let entry = Tracking::new(updated.id, transition.location(&updated), transition.event());
        if let Err(e) = self.store.insert_tracking(&entry).await {
            warn!("⚠️ No se pudo registrar tracking de la ruta {}: {}", updated.id, e);
        }

        Ok(updated)
    }
}
