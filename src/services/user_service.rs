// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserChanges},
    services::auth_service,
};
use chrono::Utc;
use sqlx::SqlitePool;

pub const LOGIN_TAKEN: &str = "Login já está em uso";
pub const USER_NOT_FOUND: &str = "Usuário não encontrado";
pub const USER_HAS_POSTS: &str = "Usuário possui posts e não pode ser excluído";

/// Converte violações de UNIQUE em `Conflict`; o resto segue como erro de base de dados.
fn map_login_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(LOGIN_TAKEN);
        }
    }
    AppError::from(e)
}

pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: i64) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, login, password_hash, role, created_at, updated_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_login(db_pool: &SqlitePool, login: &str) -> AppResult<Option<User>> {
    tracing::debug!("Buscando utilizador por login: {}", login);
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, login, password_hash, role, created_at, updated_at
        FROM users
        WHERE login = ?1
        "#,
    )
    .bind(login)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, login, password_hash, role, created_at, updated_at
        FROM users
        ORDER BY id ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

/// Cria o utilizador. A unicidade do login é garantida pela constraint UNIQUE,
/// por isso dois registos concorrentes com o mesmo login resultam num único sucesso.
pub async fn create_user(
    db_pool: &SqlitePool,
    new_user: &NewUser<'_>,
    bcrypt_cost: u32,
) -> AppResult<User> {
    tracing::info!("Tentando criar utilizador: {}", new_user.login);
    let password_hash = auth_service::hash_password(new_user.password, bcrypt_cost).await?;
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, login, password_hash, role, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        RETURNING id, name, login, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(new_user.name)
    .bind(new_user.login)
    .bind(&password_hash)
    .bind(new_user.role.as_str())
    .bind(now)
    .fetch_one(db_pool)
    .await
    .map_err(|e| {
        let err = map_login_conflict(e);
        if matches!(err, AppError::Conflict(_)) {
            tracing::warn!("Falha ao criar user: login '{}' já existe.", new_user.login);
        }
        err
    })?;

    tracing::info!("✅ Utilizador '{}' criado com id {}.", user.login, user.id);
    Ok(user)
}

/// Aplica as alterações presentes; campos ausentes mantêm o valor atual.
pub async fn update_user(
    db_pool: &SqlitePool,
    user_id: i64,
    changes: &UserChanges<'_>,
    bcrypt_cost: u32,
) -> AppResult<User> {
    tracing::info!("Atualizando dados para user: {}", user_id);

    if find_user_by_id(db_pool, user_id).await?.is_none() {
        tracing::warn!("Falha ao atualizar: utilizador '{}' não encontrado.", user_id);
        return Err(AppError::NotFound(USER_NOT_FOUND));
    }

    let password_hash = match changes.password {
        Some(raw) => Some(auth_service::hash_password(raw, bcrypt_cost).await?),
        None => None,
    };

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET
            name = COALESCE(?1, name),
            login = COALESCE(?2, login),
            password_hash = COALESCE(?3, password_hash),
            role = COALESCE(?4, role),
            updated_at = ?5
        WHERE id = ?6
        RETURNING id, name, login, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(changes.name)
    .bind(changes.login)
    .bind(password_hash.as_deref())
    .bind(changes.role.map(|r| r.as_str()))
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(db_pool)
    .await
    .map_err(map_login_conflict)?
    // Apagado entre a verificação e o UPDATE
    .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    tracing::info!("✅ Dados atualizados com sucesso para user: {}", user_id);
    Ok(user)
}

/// Quantos posts têm este utilizador como autor.
pub async fn count_authored_posts(db_pool: &SqlitePool, user_id: i64) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ?1")
        .bind(user_id)
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

/// Remove o utilizador. Autores com posts não podem ser removidos (`Conflict`);
/// a FK de `posts.author_id` cobre o caso de um post criado entre a verificação e o DELETE.
pub async fn delete_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    tracing::info!("Removendo utilizador: {}", user_id);

    if count_authored_posts(db_pool, user_id).await? > 0 {
        tracing::warn!("Utilizador '{}' ainda é autor de posts.", user_id);
        return Err(AppError::Conflict(USER_HAS_POSTS));
    }

    let rows_affected = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(db_pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    tracing::warn!("Utilizador '{}' ainda é autor de posts.", user_id);
                    return AppError::Conflict(USER_HAS_POSTS);
                }
            }
            AppError::from(e)
        })?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao remover: utilizador '{}' não encontrado.", user_id);
        return Err(AppError::NotFound(USER_NOT_FOUND));
    }

    tracing::info!("✅ Utilizador '{}' removido.", user_id);
    Ok(())
}
