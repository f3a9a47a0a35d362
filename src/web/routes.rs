// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, mw_auth, mw_role, post_handlers, user_handlers},
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/", get(|| async { "NexEdu API em execução" }))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login));

    // --- Leitura de posts: qualquer utilizador autenticado ---
    let read_routes = Router::new()
        .route("/posts", get(post_handlers::list_posts))
        .route("/posts/search", get(post_handlers::search_posts))
        .route("/posts/{id}", get(post_handlers::get_post));

    // --- Rotas de Professor ---
    // mw_auth é aplicado no router pai
    let professor_routes = Router::new()
        .route("/posts", post(post_handlers::create_post))
        .route(
            "/posts/{id}",
            put(post_handlers::update_post).delete(post_handlers::delete_post),
        )
        .route("/users", get(user_handlers::list_users))
        .route(
            "/users/{id}",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        .route_layer(middleware::from_fn(mw_role::require_professor));

    // --- Rotas Autenticadas ---
    // Os method routers de /posts e /posts/{id} são fundidos, cada método mantém as suas camadas
    let authenticated_routes = Router::new()
        .merge(read_routes)
        .merge(professor_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
