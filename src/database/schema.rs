//! DDL de arranque
//!
//! Crea las tablas si no existen. No es un sistema de migraciones: solo
//! se ejecuta con BOOTSTRAP_SCHEMA=true sobre una base vacía o ya al día.

use sqlx::PgPool;
use tracing::info;

pub const SCHEMA: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trucks (
        id UUID PRIMARY KEY,
        plate TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL DEFAULT 'disponible',
        cargo TEXT,
        driver_id UUID REFERENCES accounts (id),
        dispatcher_id UUID REFERENCES accounts (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS trucks_one_per_driver
        ON trucks (driver_id) WHERE driver_id IS NOT NULL
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS routes (
        id UUID PRIMARY KEY,
        origin TEXT NOT NULL,
        destination TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pendiente',
        truck_id UUID REFERENCES trucks (id) ON DELETE SET NULL,
        started_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tracking (
        id UUID PRIMARY KEY,
        route_id UUID NOT NULL REFERENCES routes (id) ON DELETE CASCADE,
        location TEXT NOT NULL,
        event TEXT NOT NULL,
        timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS routes_truck_idx ON routes (truck_id)
    "#,
];

/// Aplica el DDL de arranque en orden
pub async fn bootstrap_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("🗄️ Esquema verificado ({} sentencias)", SCHEMA.len());
    Ok(())
}
