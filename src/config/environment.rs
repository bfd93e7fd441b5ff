//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-only-secret-change-me";

/// Tope del jitter del mapa, en grados
pub const MAX_MAP_JITTER_DEGREES: f64 = 1.0;

/// Tope de vida de la sesión: 30 días
pub const MAX_JWT_EXPIRATION_SECS: u64 = 30 * 24 * 3600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}

/// Backend de almacenamiento seleccionado con STORAGE_BACKEND
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "memoria" => Ok(StorageBackend::Memory),
            other => Err(format!("backend desconocido '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub bcrypt_cost: u32,
    pub seed_demo_data: bool,
    pub bootstrap_schema: bool,
    pub map_jitter_degrees: f64,
}

impl Default for EnvironmentConfig {
    /// Valores de desarrollo; los tests parten de aquí
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 8 * 3600,
            cors_origins: Vec::new(),
            storage_backend: StorageBackend::Memory,
            database_url: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_demo_data: false,
            bootstrap_schema: false,
            map_jitter_degrees: 0.05,
        }
    }
}

fn parse_var<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn check_map_jitter(degrees: f64) -> Result<f64, ConfigError> {
    if degrees.is_finite() && (0.0..=MAX_MAP_JITTER_DEGREES).contains(&degrees) {
        Ok(degrees)
    } else {
        Err(ConfigError::InvalidEnvValue {
            var: "MAP_JITTER_DEGREES".into(),
            reason: format!("debe estar entre 0 y {}", MAX_MAP_JITTER_DEGREES),
        })
    }
}

fn check_jwt_expiration(secs: u64) -> Result<u64, ConfigError> {
    if (1..=MAX_JWT_EXPIRATION_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(ConfigError::InvalidEnvValue {
            var: "JWT_EXPIRATION".into(),
            reason: format!("debe estar entre 1 y {} segundos", MAX_JWT_EXPIRATION_SECS),
        })
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde el entorno (tras `dotenvy`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let is_production = environment == "production";

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if is_production => return Err(ConfigError::MissingEnvVar("JWT_SECRET".into())),
            _ => {
                warn!("⚠️ JWT_SECRET no definido, usando secreto de desarrollo");
                defaults.jwt_secret
            }
        };

        let storage_backend = parse_var("STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar("DATABASE_URL".into()));
        }

        let bcrypt_cost = parse_var("BCRYPT_COST", defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidEnvValue {
                var: "BCRYPT_COST".into(),
                reason: "debe estar entre 4 y 31".into(),
            });
        }

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: check_jwt_expiration(parse_var(
                "JWT_EXPIRATION",
                defaults.jwt_expiration,
            )?)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            storage_backend,
            database_url,
            bcrypt_cost,
            seed_demo_data: parse_var("SEED_DEMO_DATA", defaults.seed_demo_data)?,
            bootstrap_schema: parse_var("BOOTSTRAP_SCHEMA", defaults.bootstrap_schema)?,
            map_jitter_degrees: check_map_jitter(parse_var(
                "MAP_JITTER_DEGREES",
                defaults.map_jitter_degrees,
            )?)?,
            environment,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
