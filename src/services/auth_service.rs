// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginResponse, User, UserSummary},
    services::{
        token_service::{Identity, TokenService},
        user_service,
    },
};
use sqlx::SqlitePool;

/// Verifica se a senha fornecida corresponde ao hash guardado.
/// O bcrypt corre no pool de threads bloqueantes.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt com o custo configurado.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt (custo {})...", cost);
        bcrypt::hash(&password, cost)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Valida as credenciais e emite um token.
/// Login inexistente e senha errada devolvem o mesmo erro.
pub async fn login(
    db_pool: &SqlitePool,
    tokens: &TokenService,
    login: &str,
    password: &str,
) -> AppResult<LoginResponse> {
    let user: User = match user_service::find_user_by_login(db_pool, login).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login recusado: utilizador '{}' não existe", login);
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash).await? {
        tracing::warn!("Login recusado: senha incorreta para '{}'", login);
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens.issue(&Identity {
        id: user.id,
        login: user.login.clone(),
        role: user.role,
    })?;

    tracing::info!("✅ Login bem-sucedido para: {}", user.login);
    Ok(LoginResponse {
        token,
        user: UserSummary::from(&user),
    })
}
