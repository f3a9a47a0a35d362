// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User},
    services::{auth_service, user_service},
    state::AppState,
    web::extractors::AppJson,
};
use axum::{extract::State, http::StatusCode, Json};

/// Campo presente e não vazio.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let (Some(name), Some(login), Some(password), Some(role)) = (
        present(&body.name),
        present(&body.login),
        present(&body.password),
        present(&body.role),
    ) else {
        return Err(AppError::Validation("Todos os campos são obrigatórios"));
    };

    let role = Role::parse(role).ok_or(AppError::Validation("Role deve ser PROFESSOR ou ALUNO"))?;

    tracing::info!("Registo de novo utilizador: {} ({})", login, role);
    let user = user_service::create_user(
        &state.db_pool,
        &NewUser {
            name,
            login,
            password,
            role,
        },
        state.bcrypt_cost,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (Some(login), Some(password)) = (present(&body.login), present(&body.password)) else {
        return Err(AppError::Validation("Login e senha são obrigatórios"));
    };

    tracing::info!("Tentativa de login para: {}", login);
    let response = auth_service::login(&state.db_pool, &state.tokens, login, password).await?;
    Ok(Json(response))
}
