// src/web/mw_auth.rs
use crate::{
    error::{AppError, AuthFailure},
    services::token_service::{Identity, TokenService},
};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Extrai a credencial de um header `Authorization: Bearer <token>`.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthFailure> {
    let header = header.ok_or(AuthFailure::MissingToken)?;

    let parts: Vec<&str> = header.split_whitespace().collect();
    let [scheme, credential] = parts.as_slice() else {
        return Err(AuthFailure::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthFailure::UnsupportedScheme);
    }

    Ok(*credential)
}

/// Header bruto -> identidade verificada.
pub fn authenticate(header: Option<&str>, tokens: &TokenService) -> Result<Identity, AuthFailure> {
    let credential = parse_bearer(header)?;
    tokens.verify(credential).map_err(|e| {
        tracing::debug!("Autenticação MW: token recusado ({})", e);
        AuthFailure::InvalidOrExpiredToken
    })
}

/// Middleware que exige um token válido e coloca a `Identity` nas extensões da requisição.
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Header com bytes não-ASCII conta como mal formado
    let header = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::Unauthenticated(AuthFailure::MalformedHeader))?,
        ),
    };

    match authenticate(header, &tokens) {
        Ok(identity) => {
            tracing::debug!(
                "Autenticação MW: '{}' ({}) autenticado.",
                identity.login,
                identity.role
            );
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Err(failure) => {
            tracing::debug!("Autenticação MW: rejeitado ({:?})", failure);
            Err(AppError::Unauthenticated(failure))
        }
    }
}
