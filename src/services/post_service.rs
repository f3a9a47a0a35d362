// src/services/post_service.rs
use crate::{
    error::{AppError, AppResult},
    models::post::{Post, PostRow},
};
use chrono::Utc;
use sqlx::SqlitePool;

pub const POST_NOT_FOUND: &str = "Post não encontrado";

const SELECT_POSTS: &str = r#"
    SELECT
        p.id, p.title, p.content, p.author_name, p.author_id, p.created_at, p.updated_at,
        u.name AS author_user_name, u.login AS author_login, u.role AS author_role
    FROM posts p
    LEFT JOIN users u ON u.id = p.author_id
"#;

/// O termo (já em minúsculas) aparece no título ou no conteúdo, ignorando maiúsculas.
/// Ambos os lados passam pelo `to_lowercase` Unicode: "EDUCAÇÃO" casa com "educação".
fn matches_term(post: &Post, lowered_term: &str) -> bool {
    post.title.to_lowercase().contains(lowered_term)
        || post.content.to_lowercase().contains(lowered_term)
}

pub async fn find_all_posts(db_pool: &SqlitePool) -> AppResult<Vec<Post>> {
    let rows = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POSTS} ORDER BY p.id ASC"))
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("Encontrados {} posts.", rows.len());
    Ok(rows.into_iter().map(Post::from).collect())
}

/// Busca no título e no conteúdo, sem distinguir maiúsculas.
pub async fn search_posts(db_pool: &SqlitePool, term: &str) -> AppResult<Vec<Post>> {
    tracing::debug!("Buscando posts por '{}'", term);
    // lower() do SQLite só conhece ASCII; a comparação é feita aqui
    let lowered_term = term.to_lowercase();

    let posts: Vec<Post> = find_all_posts(db_pool)
        .await?
        .into_iter()
        .filter(|post| matches_term(post, &lowered_term))
        .collect();

    tracing::debug!("Busca por '{}' devolveu {} posts.", term, posts.len());
    Ok(posts)
}

pub async fn find_post_by_id(db_pool: &SqlitePool, post_id: i64) -> AppResult<Option<Post>> {
    let row = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POSTS} WHERE p.id = ?1"))
        .bind(post_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(row.map(Post::from))
}

/// `author_id` vem sempre da identidade autenticada, nunca do corpo da requisição.
pub async fn create_post(
    db_pool: &SqlitePool,
    title: &str,
    content: &str,
    author_name: &str,
    author_id: i64,
) -> AppResult<Post> {
    tracing::info!("Criando post '{}' para autor {}", title, author_id);
    let now = Utc::now();

    let post_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO posts (title, content, author_name, author_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author_name)
    .bind(author_id)
    .bind(now)
    .fetch_one(db_pool)
    .await?;

    find_post_by_id(db_pool, post_id)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn update_post(
    db_pool: &SqlitePool,
    post_id: i64,
    title: Option<&str>,
    content: Option<&str>,
    author_name: Option<&str>,
) -> AppResult<Post> {
    tracing::info!("Atualizando post {}", post_id);

    let rows_affected = sqlx::query(
        r#"
        UPDATE posts
        SET
            title = COALESCE(?1, title),
            content = COALESCE(?2, content),
            author_name = COALESCE(?3, author_name),
            updated_at = ?4
        WHERE id = ?5
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author_name)
    .bind(Utc::now())
    .bind(post_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao atualizar: post {} não encontrado.", post_id);
        return Err(AppError::NotFound(POST_NOT_FOUND));
    }

    find_post_by_id(db_pool, post_id)
        .await?
        .ok_or(AppError::NotFound(POST_NOT_FOUND))
}

pub async fn delete_post(db_pool: &SqlitePool, post_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM posts WHERE id = ?1")
        .bind(post_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao remover: post {} não encontrado.", post_id);
        return Err(AppError::NotFound(POST_NOT_FOUND));
    }

    tracing::info!("✅ Post {} removido.", post_id);
    Ok(())
}
