use crate::server::AppState;
use crate::server::handlers;
use axum::Router;
use axum::routing::{get, post, put};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/verify", post(handlers::verify))
        .route(
            "/api/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route("/api/records/time", get(handlers::current_time))
        .route(
            "/api/records/{username}/{index}",
            put(handlers::update_record).delete(handlers::delete_record),
        )
        .route("/api/stats", get(handlers::statistics))
        .fallback(handlers::not_found)
        .with_state(state)
}
