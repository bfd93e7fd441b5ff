use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn, Level};

use fleet_dispatch::config::environment::{EnvironmentConfig, StorageBackend};
use fleet_dispatch::database;
use fleet_dispatch::repositories::{FleetStore, MemoryFleetStore, PgFleetStore};
use fleet_dispatch::services::seed_service::seed_demo_data;
use fleet_dispatch::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| Level::from_str(&level).ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let config = EnvironmentConfig::from_env()?;

    info!("🚚 Fleet Dispatch - Despacho de camiones y rutas");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    let store: Arc<dyn FleetStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL requerido para STORAGE_BACKEND=postgres")?;
            let pool = database::connect(url, config.bootstrap_schema).await?;
            Arc::new(PgFleetStore::new(pool))
        }
        StorageBackend::Memory => {
            warn!("🧠 Store en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryFleetStore::new())
        }
    };

    if config.seed_demo_data {
        seed_demo_data(store.as_ref(), config.bcrypt_cost).await?;
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    let app = create_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔐 Sesión:      GET|POST /login, GET /logout");
    info!("🚛 Chofer:      /dashboard_chofer, /asignar_ruta/:id, /update_route_status/:id/:estado, /mapa_data");
    info!("📋 Despachador: /dashboard_despachador, /asignar_chofer/:id, /asignar_chofer_confirm/:id/:camion, /mapa_despachador_data");
    info!("🛠️ Admin:       /dashboard_admin, /admin/trucks, /admin/routes, /admin/users, /mapa_admin_data");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor detenido");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
