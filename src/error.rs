// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Mensagem única para qualquer falha de autenticação.
/// Não revela qual verificação falhou (header, esquema, assinatura, expiração).
pub const UNAUTHENTICATED_MESSAGE: &str = "Não autenticado";
pub const FORBIDDEN_MESSAGE: &str = "Acesso negado. Apenas professores podem realizar esta ação";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Login ou senha inválidos";
const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

/// Motivo pelo qual o middleware de autenticação rejeitou a requisição.
/// Só aparece nos logs, nunca na resposta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingToken,
    MalformedHeader,
    UnsupportedScheme,
    InvalidOrExpiredToken,
    /// Role Gate executado sem identidade no contexto.
    MissingIdentity,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuração inválida: {0}")]
    ConfigError(String),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    #[error("Erro ao emitir token: {0}")]
    TokenIssueError(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Não autenticado ({0:?})")]
    Unauthenticated(AuthFailure),

    #[error("Acesso negado")]
    Forbidden,

    #[error("Erro interno inesperado")]
    InternalServerError,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem que o cliente recebe em `{"error": ...}`.
    fn client_message(&self) -> &'static str {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => *msg,
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            AppError::Unauthenticated(_) => UNAUTHENTICATED_MESSAGE,
            AppError::Forbidden => FORBIDDEN_MESSAGE,
            _ => INTERNAL_MESSAGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Detalhes ficam no servidor
        if status.is_server_error() {
            tracing::error!("Erro processado: {:?}", self);
        } else {
            tracing::debug!("Requisição rejeitada ({}): {}", status.as_u16(), self);
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

pub type AppResult<T = ()> = Result<T, AppError>;
