// src/web/user_handlers.rs
// Todas as rotas daqui passam por require_auth + require_professor.
use crate::{
    error::{AppError, AppResult},
    models::user::{Role, UpdateUserRequest, User, UserChanges},
    services::user_service,
    state::AppState,
    web::{
        auth_handlers::present,
        extractors::{AppJson, CurrentUser, EntityId},
    },
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

// GET /users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = user_service::find_all_users(&state.db_pool).await?;
    Ok(Json(users))
}

// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<User>> {
    let user = user_service::find_user_by_id(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound(user_service::USER_NOT_FOUND))?;
    Ok(Json(user))
}

// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    EntityId(id): EntityId,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let role = match present(&body.role) {
        Some(raw) => Some(
            Role::parse(raw).ok_or(AppError::Validation("Role deve ser PROFESSOR ou ALUNO"))?,
        ),
        None => None,
    };

    let changes = UserChanges {
        name: present(&body.name),
        login: present(&body.login),
        password: present(&body.password),
        role,
    };

    tracing::info!("'{}' atualiza utilizador {}", actor.login, id);
    let user = user_service::update_user(&state.db_pool, id, &changes, state.bcrypt_cost).await?;
    Ok(Json(user))
}

// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    EntityId(id): EntityId,
) -> AppResult<Json<Value>> {
    tracing::info!("'{}' remove utilizador {}", actor.login, id);
    user_service::delete_user(&state.db_pool, id).await?;
    Ok(Json(json!({ "message": "Usuário deletado com sucesso" })))
}
