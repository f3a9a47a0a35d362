// src/config.rs
use crate::error::{AppError, AppResult};
use std::env;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://nexedu.db";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const MIN_SECRET_LEN: usize = 32;
/// Custos aceites pelo bcrypt.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Configuração do processo, lida das variáveis de ambiente (e de `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub port: u16,
    pub database_url: String,
    pub cors_origin: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key))
    }

    /// Monta a configuração a partir de uma função de leitura.
    /// Permite testar sem tocar no ambiente.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        // Sem segredo não há servidor
        let jwt_secret = lookup("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::ConfigError("JWT_SECRET está vazio".into()));
        }
        if jwt_secret.len() < MIN_SECRET_LEN {
            tracing::warn!("⚠️ JWT_SECRET é curta, considere uma chave mais longa e aleatória!");
        }

        let port = match lookup("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::ConfigError(format!("PORT inválida: {}", raw)))?,
            Err(_) => {
                tracing::warn!(
                    "PORT não definida, usando {} (apenas desenvolvimento)",
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }
        };

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "DATABASE_URL não definida, usando {} (apenas desenvolvimento)",
                DEFAULT_DATABASE_URL
            );
            DEFAULT_DATABASE_URL.to_string()
        });

        let cors_origin = lookup("CORS_ORIGIN")
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());
        // O CORS envia credenciais, o que não é compatível com uma origem curinga
        if cors_origin == "*" {
            return Err(AppError::ConfigError(
                "CORS_ORIGIN não pode ser \"*\" com credenciais ativas".into(),
            ));
        }
        if axum::http::HeaderValue::from_str(&cors_origin).is_err() {
            return Err(AppError::ConfigError(format!("CORS_ORIGIN inválida: {}", cors_origin)));
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::ConfigError(format!("BCRYPT_COST inválido: {}", raw)))?,
            Err(_) => bcrypt::DEFAULT_COST,
        };
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(AppError::ConfigError(format!(
                "BCRYPT_COST deve estar entre {} e {}: {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end(),
                bcrypt_cost
            )));
        }

        Ok(Self {
            jwt_secret,
            port,
            database_url,
            cors_origin,
            bcrypt_cost,
        })
    }
}
