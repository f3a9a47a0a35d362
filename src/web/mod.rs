// src/web/mod.rs
pub mod auth_handlers;
pub mod extractors;
pub mod mw_auth;
pub mod mw_role;
pub mod post_handlers;
pub mod routes;
pub mod user_handlers;
