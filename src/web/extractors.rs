// src/web/extractors.rs
use crate::{
    error::{AppError, AuthFailure},
    services::token_service::Identity,
};
use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

/// JSON cuja rejeição vira `{"error": ...}` com 400 em vez da resposta padrão do axum.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Corpo JSON rejeitado: {}", e);
            AppError::Validation("Corpo da requisição inválido")
        })?;
        Ok(AppJson(value))
    }
}

/// `{id}` numérico do path.
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("ID inválido"))?;
        raw.parse::<i64>()
            .map(EntityId)
            .map_err(|_| AppError::Validation("ID inválido"))
    }
}

/// Identidade colocada por `require_auth`.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated(AuthFailure::MissingIdentity))
    }
}
