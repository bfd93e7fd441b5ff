//! Implementación PostgreSQL del FleetStore
//!
//! Las transiciones usan `UPDATE ... WHERE <condición> RETURNING *`
//! dentro de una transacción: si otra request ganó la carrera, el
//! UPDATE no afecta filas y se devuelve `None`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Account, Route, RouteFields, RouteStatus, Tracking, Truck, TruckFields, TruckStatus,
};
use crate::repositories::fleet_store::FleetStore;
use crate::utils::errors::{rol_no_reconocido, AppError, AppResult};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgFleetStore {
    pool: PgPool,
}

impl PgFleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Una fila con un rol fuera del conjunto conocido no es un fallo de la base
fn map_account_read_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::ColumnDecode { index, .. } if index.contains("role") => rol_no_reconocido(),
        _ => AppError::Database(e),
    }
}

/// Traduce violaciones de unicidad a 409 y el resto a error de base de datos
fn map_write_error(e: sqlx::Error, conflict_message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(conflict_message.to_string())
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn insert_account(&self, account: &Account) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, username, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(account.role.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "El nombre de usuario ya está registrado"))
    }

    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_account_read_error)?;
        Ok(account)
    }

    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_account_read_error)?;
        Ok(account)
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let accounts =
            sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(accounts)
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(result.0)
    }

    async fn insert_truck(&self, truck: &Truck) -> AppResult<Truck> {
        sqlx::query_as::<_, Truck>(
            r#"
            INSERT INTO trucks (id, plate, status, cargo, driver_id, dispatcher_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(truck.id)
        .bind(&truck.plate)
        .bind(truck.status.as_str())
        .bind(&truck.cargo)
        .bind(truck.driver_id)
        .bind(truck.dispatcher_id)
        .bind(truck.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "La patente o el chofer ya están asignados a otro camión"))
    }

    async fn update_truck(&self, id: Uuid, fields: TruckFields) -> AppResult<Option<Truck>> {
        sqlx::query_as::<_, Truck>(
            r#"
            UPDATE trucks
            SET plate = $2, status = $3, cargo = $4, driver_id = $5, dispatcher_id = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.plate)
        .bind(fields.status.as_str())
        .bind(&fields.cargo)
        .bind(fields.driver_id)
        .bind(fields.dispatcher_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "La patente o el chofer ya están asignados a otro camión"))
    }

    async fn delete_truck(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Las rutas en curso vuelven a pendiente para que otro chofer las tome
        sqlx::query(
            r#"
            UPDATE routes
            SET truck_id = NULL,
                status = CASE WHEN status = 'en_progreso' THEN 'pendiente' ELSE status END,
                started_at = CASE WHEN status = 'en_progreso' THEN NULL ELSE started_at END
            WHERE truck_id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM trucks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_truck(&self, id: Uuid) -> AppResult<Option<Truck>> {
        let truck = sqlx::query_as::<_, Truck>("SELECT * FROM trucks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(truck)
    }

    async fn list_trucks(&self) -> AppResult<Vec<Truck>> {
        let trucks = sqlx::query_as::<_, Truck>("SELECT * FROM trucks ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(trucks)
    }

    async fn trucks_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Truck>> {
        let trucks = sqlx::query_as::<_, Truck>(
            "SELECT * FROM trucks WHERE driver_id = $1 ORDER BY created_at, id",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(trucks)
    }

    async fn trucks_by_dispatcher(&self, dispatcher_id: Uuid) -> AppResult<Vec<Truck>> {
        let trucks = sqlx::query_as::<_, Truck>(
            "SELECT * FROM trucks WHERE dispatcher_id = $1 ORDER BY created_at, id",
        )
        .bind(dispatcher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(trucks)
    }

    async fn plate_exists(&self, plate: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trucks WHERE plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(plate)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    async fn set_truck_status(&self, id: Uuid, status: TruckStatus) -> AppResult<()> {
        sqlx::query("UPDATE trucks SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_route(&self, route: &Route) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, origin, destination, status, truck_id, started_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(route.id)
        .bind(&route.origin)
        .bind(&route.destination)
        .bind(route.status.as_str())
        .bind(route.truck_id)
        .bind(route.started_at)
        .bind(route.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(route)
    }

    async fn update_route(&self, id: Uuid, fields: RouteFields) -> AppResult<Option<Route>> {
        // started_at solo se toca cuando cambia el estado
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET origin = $2,
                destination = $3,
                truck_id = $5,
                started_at = CASE
                    WHEN status = $4 THEN started_at
                    WHEN $4 = 'en_progreso' THEN NOW()
                    ELSE NULL
                END,
                status = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.origin)
        .bind(&fields.destination)
        .bind(fields.status.as_str())
        .bind(fields.truck_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(route)
    }

    async fn delete_route(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tracking WHERE route_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_route(&self, id: Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(route)
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(routes)
    }

    async fn routes_for_trucks(&self, truck_ids: &[Uuid]) -> AppResult<Vec<Route>> {
        if truck_ids.is_empty() {
            return Ok(Vec::new());
        }
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE truck_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(truck_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(routes)
    }

    async fn open_routes(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE status = 'pendiente' AND truck_id IS NULL ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(routes)
    }

    async fn bind_open_route(
        &self,
        route_id: Uuid,
        truck_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Route>> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET truck_id = $2, status = 'en_progreso', started_at = $3
            WHERE id = $1 AND status = 'pendiente' AND truck_id IS NULL
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(truck_id)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await?;

        if route.is_some() {
            sqlx::query("UPDATE trucks SET status = $2 WHERE id = $1")
                .bind(truck_id)
                .bind(TruckStatus::EnRuta.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(route)
    }

    async fn advance_route(
        &self,
        route_id: Uuid,
        expected_truck: Uuid,
        status: RouteStatus,
        started_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Route>> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET status = $3, started_at = $4
            WHERE id = $1 AND truck_id = $2 AND status <> 'completada'
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(expected_truck)
        .bind(status.as_str())
        .bind(started_at)
        .fetch_optional(&mut *tx)
        .await?;

        if route.is_some() {
            match status {
                RouteStatus::InProgress => {
                    sqlx::query("UPDATE trucks SET status = $2 WHERE id = $1")
                        .bind(expected_truck)
                        .bind(TruckStatus::EnRuta.as_str())
                        .execute(&mut *tx)
                        .await?;
                }
                RouteStatus::Completed => {
                    // Libera el camión si ya no le quedan rutas activas
                    sqlx::query(
                        r#"
                        UPDATE trucks SET status = $2
                        WHERE id = $1 AND status = $3
                        AND NOT EXISTS (
                            SELECT 1 FROM routes WHERE truck_id = $1 AND status = 'en_progreso'
                        )
                        "#,
                    )
                    .bind(expected_truck)
                    .bind(TruckStatus::Disponible.as_str())
                    .bind(TruckStatus::EnRuta.as_str())
                    .execute(&mut *tx)
                    .await?;
                }
                RouteStatus::Pending => {}
            }
        }

        tx.commit().await?;
        Ok(route)
    }

    async fn insert_tracking(&self, entry: &Tracking) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tracking (id, route_id, location, event, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(entry.route_id)
        .bind(&entry.location)
        .bind(&entry.event)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn tracking_for_route(&self, route_id: Uuid) -> AppResult<Vec<Tracking>> {
        let entries = sqlx::query_as::<_, Tracking>(
            "SELECT * FROM tracking WHERE route_id = $1 ORDER BY timestamp, id",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
