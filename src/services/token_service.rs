// src/services/token_service.rs
//! Emissão e verificação dos tokens de sessão (JWT HS256).
//!
//! Os tokens não são guardados no servidor: a expiração é o único fim de um token.

use crate::{
    error::{AppError, AppResult},
    models::user::Role,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Validade de um token a partir da emissão.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Identidade autenticada, derivada de um token válido. Vive apenas durante uma requisição.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub login: String,
    pub role: Role,
}

/// Payload do token. Mantém os nomes `id`, `login`, `role` que os clientes já leem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub login: String,
    pub role: Role,
    /// Obrigatório por ser um campo não opcional na desserialização.
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("token mal formado")]
    Malformed,
    #[error("assinatura inválida")]
    BadSignature,
    #[error("token expirado")]
    Expired,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    ttl: Duration,
}

impl TokenService {
    /// Recusa segredos vazios: sem chave, não há como assinar.
    pub fn new(secret: &str) -> AppResult<Self> {
        if secret.trim().is_empty() {
            return Err(AppError::ConfigError("segredo de assinatura vazio".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        })
    }

    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Emite um token como se "agora" fosse `issued_at`.
    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            id: identity.id,
            login: identity.login.clone(),
            role: identity.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, VerificationError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => VerificationError::Expired,
                ErrorKind::InvalidSignature => VerificationError::BadSignature,
                _ => VerificationError::Malformed,
            }
        })?;

        let Claims { id, login, role, .. } = data.claims;
        Ok(Identity { id, login, role })
    }
}
