// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

/// Papel do utilizador na plataforma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Professor,
    Aluno,
}

#[derive(Debug, Error)]
#[error("Role desconhecida: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Aceita apenas a forma exata usada na API ("PROFESSOR" / "ALUNO").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PROFESSOR" => Some(Role::Professor),
            "ALUNO" => Some(Role::Aluno),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Professor => "PROFESSOR",
            Role::Aluno => "ALUNO",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or(UnknownRole(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Utilizador lido da tabela 'users'. O hash nunca é serializado.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subconjunto devolvido no login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            login: user.login.clone(),
            role: user.role,
        }
    }
}

// Os campos são opcionais para que a validação devolva 400 com mensagem própria
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Dados já validados para inserir um utilizador.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub login: &'a str,
    pub password: &'a str,
    pub role: Role,
}

/// Alterações já validadas; `None` mantém o valor atual.
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub name: Option<&'a str>,
    pub login: Option<&'a str>,
    pub password: Option<&'a str>,
    pub role: Option<Role>,
}
