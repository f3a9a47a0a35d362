// src/web/mw_role.rs
use crate::{
    error::{AppError, AppResult, AuthFailure},
    models::user::Role,
    services::token_service::Identity,
};
use axum::{extract::Request, middleware::Next, response::Response};

/// Confere a role da identidade autenticada.
/// Sem identidade -> 401; role diferente -> 403.
pub fn check_role(identity: Option<&Identity>, required: Role) -> AppResult<()> {
    let identity = identity.ok_or(AppError::Unauthenticated(AuthFailure::MissingIdentity))?;

    if identity.role != required {
        tracing::warn!(
            "Role MW: acesso negado para '{}' ({} != {}).",
            identity.login,
            identity.role,
            required
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Middleware para rotas exclusivas de professores.
/// Deve ser executado *depois* de `require_auth`.
pub async fn require_professor(request: Request, next: Next) -> Result<Response, AppError> {
    check_role(request.extensions().get::<Identity>(), Role::Professor)?;
    Ok(next.run(request).await)
}
