// src/state.rs
use crate::services::token_service::TokenService;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub tokens: TokenService,
    /// Custo do bcrypt; fixo por configuração, nunca derivado dos dados.
    pub bcrypt_cost: u32,
}

// mw_auth extrai apenas o serviço de tokens
impl axum::extract::FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> TokenService {
        state.tokens.clone()
    }
}
