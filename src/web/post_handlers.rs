// src/web/post_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::post::{CreatePostRequest, Post, SearchParams, UpdatePostRequest},
    services::post_service,
    state::AppState,
    web::{
        auth_handlers::present,
        extractors::{AppJson, CurrentUser, EntityId},
    },
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

// GET /posts
pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    Ok(Json(post_service::find_all_posts(&state.db_pool).await?))
}

// GET /posts/search?q=
pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Post>>> {
    let term = params.q.unwrap_or_default();
    Ok(Json(post_service::search_posts(&state.db_pool, &term).await?))
}

// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<Post>> {
    let post = post_service::find_post_by_id(&state.db_pool, id)
        .await?
        .ok_or(AppError::NotFound(post_service::POST_NOT_FOUND))?;
    Ok(Json(post))
}

// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    AppJson(body): AppJson<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let (Some(title), Some(content), Some(author)) =
        (present(&body.title), present(&body.content), present(&body.author))
    else {
        return Err(AppError::Validation("Título, conteúdo e autor são obrigatórios"));
    };

    // O autor do registo é sempre quem está autenticado
    let post =
        post_service::create_post(&state.db_pool, title, content, author, identity.id).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

// PUT /posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    AppJson(body): AppJson<UpdatePostRequest>,
) -> AppResult<Json<Post>> {
    let post = post_service::update_post(
        &state.db_pool,
        id,
        present(&body.title),
        present(&body.content),
        present(&body.author),
    )
    .await?;
    Ok(Json(post))
}

// DELETE /posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> AppResult<Json<Value>> {
    post_service::delete_post(&state.db_pool, id).await?;
    Ok(Json(json!({ "message": "Post deletado com sucesso" })))
}
