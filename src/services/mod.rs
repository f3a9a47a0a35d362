// src/services/mod.rs
pub mod auth_service;
pub mod post_service;
pub mod token_service;
pub mod user_service;
