//! Conexión a PostgreSQL

use sqlx::PgPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

/// Abre el pool y, si se pide, aplica el DDL de arranque
pub async fn connect(database_url: &str, bootstrap: bool) -> Result<PgPool, sqlx::Error> {
    info!("🔌 Conectando a {}", mask_database_url(database_url));

    let pool = DatabaseConfig::new(database_url).create_pool().await?;
    sqlx::query("SELECT 1").execute(&pool).await?;

    if bootstrap {
        super::schema::bootstrap_schema(&pool).await?;
    }

    info!("✅ Base de datos conectada");
    Ok(pool)
}
