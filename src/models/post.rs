// src/models/post.rs
use super::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Linha de `posts` com os dados do autor (LEFT JOIN em `users`).
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_user_name: Option<String>,
    pub author_login: Option<String>,
    pub author_role: Option<String>,
}

/// Autor embutido na resposta de um post.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostAuthor {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub role: Role,
}

/// Post no formato de resposta da API.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Author")]
    pub author_name: String,
    #[serde(rename = "authorId")]
    pub author_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub author: Option<PostAuthor>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let author = match (
            row.author_id,
            row.author_user_name,
            row.author_login,
            row.author_role,
        ) {
            (Some(id), Some(name), Some(login), Some(role)) => {
                Role::parse(&role).map(|role| PostAuthor {
                    id,
                    name,
                    login,
                    role,
                })
            }
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_name: row.author_name,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author,
        }
    }
}

/// Corpo de POST /posts. Um `authorId` enviado pelo cliente é ignorado.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Content")]
    pub content: Option<String>,
    #[serde(rename = "Author")]
    pub author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Content")]
    pub content: Option<String>,
    #[serde(rename = "Author")]
    pub author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}
