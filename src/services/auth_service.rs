//! Servicio de autenticación
//!
//! Hash y verificación de contraseñas con bcrypt, fuera del runtime async.

use bcrypt::{hash, verify};
use tracing::{info, warn};

use crate::models::Account;
use crate::repositories::FleetStore;
use crate::utils::errors::{AppError, AppResult};

const CREDENCIALES_INVALIDAS: &str = "Credenciales inválidas";

/// Hashear una contraseña con el costo configurado
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de hash abortada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Tarea de verificación abortada: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

/// Validar usuario y contraseña contra el store
pub async fn authenticate(
    store: &dyn FleetStore,
    username: &str,
    password: &str,
) -> AppResult<Account> {
    let Some(account) = store.find_account_by_username(username).await? else {
        warn!("🔐 Login fallido: usuario '{}' no existe", username);
        return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
    };

    if !verify_password(password.to_string(), account.password_hash.clone()).await? {
        warn!("🔐 Login fallido: contraseña incorrecta para '{}'", username);
        return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
    }

    info!("🔓 Login de '{}' ({})", account.username, account.role);
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAccount, Role};
    use crate::repositories::MemoryFleetStore;

    #[tokio::test]
    async fn test_authenticate_checks_password() {
        let store = MemoryFleetStore::new();
        let password_hash = hash_password("1234".to_string(), 4).await.unwrap();
        store
            .insert_account(&Account::from_new(NewAccount {
                username: "admin".into(),
                role: Role::Admin,
                password_hash,
            }))
            .await
            .unwrap();

        let account = authenticate(&store, "admin", "1234").await.unwrap();
        assert_eq!(account.role, Role::Admin);

        let err = authenticate(&store, "admin", "4321").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = authenticate(&store, "nadie", "1234").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
