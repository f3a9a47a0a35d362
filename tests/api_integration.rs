//! Testes de integração da API HTTP
//!
//! Exercitam o router completo: mw_auth -> mw_role -> handlers -> SQLite em memória

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use nexedu_api::{
    db,
    error::UNAUTHENTICATED_MESSAGE,
    models::user::Role,
    services::token_service::{Identity, TokenService},
    state::AppState,
    web::routes::create_router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-secret-key-minimum-32-characters";

async fn setup() -> (Router, TokenService) {
    let tokens = TokenService::new(SECRET).unwrap();
    let state = AppState {
        db_pool: db::create_memory_pool().await.unwrap(),
        tokens: tokens.clone(),
        bcrypt_cost: 4,
    };
    (create_router(state), tokens)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(
    app: &Router,
    name: &str,
    login: &str,
    password: &str,
    role: &str,
) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": name, "login": login, "password": password, "role": role })),
    )
    .await
}

/// Regista e faz login; devolve (id do utilizador, "Bearer <token>").
async fn register_and_login(app: &Router, name: &str, login: &str, role: &str) -> (i64, String) {
    let (status, user) = register(app, name, login, "secret123", role).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "login": login, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        user["id"].as_i64().unwrap(),
        format!("Bearer {}", body["token"].as_str().unwrap()),
    )
}

#[tokio::test]
async fn test_register_login_create_post_binds_author() {
    let (app, _) = setup().await;

    let (status, ana) = register(&app, "Ana", "ana1", "secret123", "PROFESSOR").await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(ana.get("password").is_none());
    assert!(ana.get("passwordHash").is_none());
    assert_eq!(ana["role"], "PROFESSOR");
    let ana_id = ana["id"].as_i64().unwrap();

    let (status, login) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "login": "ana1", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        login["user"],
        json!({ "id": ana_id, "name": "Ana", "login": "ana1", "role": "PROFESSOR" })
    );
    let auth = format!("Bearer {}", login["token"].as_str().unwrap());

    let (status, post) = send(
        &app,
        Method::POST,
        "/posts",
        Some(&auth),
        Some(json!({ "Title": "T", "Content": "C", "Author": "Ana", "authorId": ana_id + 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["authorId"], ana_id);
    assert_eq!(post["Title"], "T");
    assert_eq!(post["Author"], "Ana");
    assert_eq!(post["author"]["login"], "ana1");
}

#[tokio::test]
async fn test_login_failures_share_message() {
    let (app, _) = setup().await;
    register(&app, "Ana", "ana1", "secret123", "PROFESSOR").await;

    let (wrong_status, wrong_password) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "login": "ana1", "password": "wrong" })),
    )
    .await;
    let (unknown_status, unknown_login) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "login": "nobody", "password": "secret123" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_login);
}

#[tokio::test]
async fn test_login_requires_fields() {
    let (app, _) = setup().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "login": "ana1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_concurrent_registration_same_login() {
    let (app, _) = setup().await;

    let (first, second) = tokio::join!(
        register(&app, "Ana", "dup", "secret123", "PROFESSOR"),
        register(&app, "Outra Ana", "dup", "secret456", "ALUNO"),
    );

    let mut statuses = vec![first.0.as_u16(), second.0.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 409]);
}

#[tokio::test]
async fn test_register_validation() {
    let (app, _) = setup().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Ana", "login": "ana1", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "Ana", "ana1", "", "PROFESSOR").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&app, "Ana", "ana1", "secret123", "ADMIN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/auth/register", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = register(&app, "Ana", "ana1", "secret123", "PROFESSOR").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = register(&app, "Ana 2", "ana1", "other", "ALUNO").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_aluno_gets_403_on_professor_routes() {
    let (app, _) = setup().await;
    let (_, aluno) = register_and_login(&app, "Bruno", "bruno", "ALUNO").await;

    for (method, uri, body) in [
        (Method::POST, "/posts", Some(json!({ "Title": "T", "Content": "C", "Author": "B" }))),
        (Method::PUT, "/posts/1", Some(json!({ "Title": "T" }))),
        (Method::DELETE, "/posts/1", None),
        (Method::GET, "/users", None),
        (Method::GET, "/users/1", None),
        (Method::PUT, "/users/1", Some(json!({ "name": "x" }))),
        (Method::DELETE, "/users/1", None),
    ] {
        let (status, _) = send(&app, method.clone(), uri, Some(&aluno), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }

    // Leitura continua permitida
    let (status, posts) = send(&app, Method::GET, "/posts", Some(&aluno), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts, json!([]));
}

#[tokio::test]
async fn test_auth_failures_are_indistinguishable() {
    let (app, tokens) = setup().await;

    let other = TokenService::new("some-other-secret-key-minimum-32-characters").unwrap();
    let identity = Identity {
        id: 1,
        login: "ana1".into(),
        role: Role::Professor,
    };
    let foreign = format!("Bearer {}", other.issue(&identity).unwrap());
    let expired = format!(
        "Bearer {}",
        tokens.issue_at(&identity, Utc::now() - Duration::hours(25)).unwrap()
    );

    let expected = json!({ "error": UNAUTHENTICATED_MESSAGE });
    for auth in [
        None,
        Some("Bearer"),
        Some("Bearer a b"),
        Some("Basic dXNlcjpwYXNz"),
        Some("Bearer not-a-token"),
        Some(foreign.as_str()),
        Some(expired.as_str()),
    ] {
        let (status, body) = send(&app, Method::GET, "/posts", auth, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{:?}", auth);
        assert_eq!(body, expected, "{:?}", auth);
    }
}

#[tokio::test]
async fn test_non_ascii_authorization_header_is_generic_401() {
    let (app, _) = setup().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/posts")
        .header(header::AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff").unwrap())
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": UNAUTHENTICATED_MESSAGE }));
}

#[tokio::test]
async fn test_search_folds_accented_uppercase() {
    let (app, _) = setup().await;
    let (_, auth) = register_and_login(&app, "Ana", "ana1", "PROFESSOR").await;

    let (status, post) = send(
        &app,
        Method::POST,
        "/posts",
        Some(&auth),
        Some(json!({ "Title": "EDUCAÇÃO FÍSICA", "Content": "Aula prática", "Author": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // "educação", "EDUCAÇÃO" e "física" codificados em percent-encoding
    for query in ["educa%C3%A7%C3%A3o", "EDUCA%C3%87%C3%83O", "f%C3%ADsica"] {
        let uri = format!("/posts/search?q={}", query);
        let (status, found) = send(&app, Method::GET, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1, "{}", query);
        assert_eq!(found[0]["id"], post["id"]);
    }
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let (app, _) = setup().await;
    let (_, auth) = register_and_login(&app, "Ana", "ana1", "PROFESSOR").await;
    let lower = auth.replacen("Bearer", "bearer", 1);

    let (status, _) = send(&app, Method::GET, "/posts", Some(&lower), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_post_crud_and_search() {
    let (app, _) = setup().await;
    let (_, auth) = register_and_login(&app, "Ana", "ana1", "PROFESSOR").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/posts",
        Some(&auth),
        Some(json!({ "Title": "T" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, rust) = send(
        &app,
        Method::POST,
        "/posts",
        Some(&auth),
        Some(json!({
            "Title": "Aprendendo Rust",
            "Content": "Ownership e borrowing",
            "Author": "Ana"
        })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/posts",
        Some(&auth),
        Some(json!({ "Title": "Frações", "Content": "Matemática básica", "Author": "Ana" })),
    )
    .await;
    let rust_id = rust["id"].as_i64().unwrap();

    let (status, found) =
        send(&app, Method::GET, "/posts/search?q=RUST", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], rust_id);

    let (_, all) = send(&app, Method::GET, "/posts/search", Some(&auth), None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/posts/{}", rust_id),
        Some(&auth),
        Some(json!({ "Content": "Lifetimes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["Title"], "Aprendendo Rust");
    assert_eq!(updated["Content"], "Lifetimes");

    let (status, _) = send(&app, Method::GET, "/posts/abc", Some(&auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let rust_uri = format!("/posts/{}", rust_id);
    let (status, _) = send(&app, Method::DELETE, &rust_uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &rust_uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::DELETE, &rust_uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_administration() {
    let (app, _) = setup().await;
    let (ana_id, auth) = register_and_login(&app, "Ana", "ana1", "PROFESSOR").await;
    let (bruno_id, _) = register_and_login(&app, "Bruno", "bruno", "ALUNO").await;

    let (status, users) = send(&app, Method::GET, "/users", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("passwordHash").is_none());

    let (status, _) = send(&app, Method::GET, "/users/999", Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/users/{}", bruno_id);
    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&auth),
        Some(json!({ "login": "ana1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&auth),
        Some(json!({ "role": "DIRETOR" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, bruno) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&auth),
        Some(json!({ "role": "PROFESSOR", "password": "nova-senha" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bruno["role"], "PROFESSOR");
    assert_eq!(bruno["login"], "bruno");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "login": "bruno", "password": "nova-senha" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Autor com posts não pode ser removido
    send(
        &app,
        Method::POST,
        "/posts",
        Some(&auth),
        Some(json!({ "Title": "T", "Content": "C", "Author": "Ana" })),
    )
    .await;
    let ana_uri = format!("/users/{}", ana_id);
    let (status, body) = send(&app, Method::DELETE, &ana_uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
    let (status, _) = send(&app, Method::GET, &ana_uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &uri, Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
