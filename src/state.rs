use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::services::event::EventService;
use crate::services::user::UserService;

/// Everything handlers depend on, built once at startup. `FromRef` lets each
/// handler extract only the piece it uses.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub events: EventService,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            events: EventService::new(pool),
            tokens: TokenIssuer::new(&config.jwt_secret),
        }
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for EventService {
    fn from_ref(state: &AppState) -> Self {
        state.events.clone()
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
