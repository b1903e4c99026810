use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{auth, events, health_check, users};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let gate = from_fn_with_state(state.tokens.clone(), require_auth);

    let protected = Router::new()
        .route("/users", get(users::list))
        .route(
            "/users/:id",
            get(users::get).put(users::update).delete(users::remove),
        )
        .route("/events", post(events::create).get(events::list))
        .route(
            "/events/:id",
            get(events::get).put(events::update).delete(events::remove),
        )
        .route_layer(gate);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer());

    apply_security_headers(router).with_state(state)
}
