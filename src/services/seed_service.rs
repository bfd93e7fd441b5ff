//! Datos de demostración
//!
//! Solo se cargan sobre un store sin cuentas.

use tracing::info;

use crate::models::{
    Account, NewAccount, Role, Route, RouteFields, RouteStatus, Truck, TruckFields, TruckStatus,
};
use crate::repositories::FleetStore;
use crate::services::auth_service::hash_password;
use crate::utils::errors::AppResult;

pub const DEMO_PASSWORD: &str = "1234";

/// Devuelve `false` si el store ya tenía cuentas
pub async fn seed_demo_data(store: &dyn FleetStore, bcrypt_cost: u32) -> AppResult<bool> {
    if !store.list_accounts().await?.is_empty() {
        info!("🌱 Store con datos, se omite la carga de demostración");
        return Ok(false);
    }

    let password_hash = hash_password(DEMO_PASSWORD.to_string(), bcrypt_cost).await?;
    let account = |username: &str, role: Role| {
        Account::from_new(NewAccount {
            username: username.to_string(),
            role,
            password_hash: password_hash.clone(),
        })
    };

    store.insert_account(&account("admin", Role::Admin)).await?;
    let dispatcher = store.insert_account(&account("despachador", Role::Dispatcher)).await?;

    let mut trucks = Vec::new();
    for (index, (plate, cargo)) in [("ABCD11", "Frutas"), ("EFGH22", "Madera"), ("IJKL33", "Salmón")]
        .into_iter()
        .enumerate()
    {
        let driver = store
            .insert_account(&account(&format!("chofer{}", index + 1), Role::Driver))
            .await?;
        let truck = store
            .insert_truck(&Truck::from_fields(TruckFields {
                plate: plate.to_string(),
                status: TruckStatus::Disponible,
                cargo: Some(cargo.to_string()),
                driver_id: Some(driver.id),
                dispatcher_id: Some(dispatcher.id),
            }))
            .await?;
        trucks.push(truck);
    }

    let routes = [
        ("Santiago", "Temuco", RouteStatus::Pending, None),
        ("Temuco", "Valdivia", RouteStatus::Pending, None),
        ("Valdivia", "Santiago", RouteStatus::Pending, None),
        ("Santiago", "Valdivia", RouteStatus::Pending, None),
        ("Temuco", "Santiago", RouteStatus::InProgress, Some(trucks[1].id)),
        ("Valdivia", "Temuco", RouteStatus::Completed, Some(trucks[2].id)),
    ];
    for (origin, destination, status, truck_id) in routes {
        store
            .insert_route(&Route::from_fields(RouteFields {
                origin: origin.to_string(),
                destination: destination.to_string(),
                status,
                truck_id,
            }))
            .await?;
    }
    store.set_truck_status(trucks[1].id, TruckStatus::EnRuta).await?;

    info!("🌱 Datos de demostración cargados: 5 cuentas, 3 camiones, 6 rutas");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryFleetStore;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store = MemoryFleetStore::new();
        assert!(seed_demo_data(&store, 4).await.unwrap());
        assert!(!seed_demo_data(&store, 4).await.unwrap());

        assert_eq!(store.list_accounts().await.unwrap().len(), 5);
        assert_eq!(store.list_trucks().await.unwrap().len(), 3);
        let routes = store.list_routes().await.unwrap();
        assert_eq!(routes.len(), 6);
        assert_eq!(routes.iter().filter(|r| r.is_open()).count(), 4);
    }
}
