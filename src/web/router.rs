use super::handlers;
use super::state::AppState;
use axum::Router;
use axum::routing::{get, patch, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route(
            "/api/v1/dignitaries",
            get(handlers::list_dignitaries).post(handlers::create_dignitary),
        )
        .route(
            "/api/v1/dignitaries/:id",
            get(handlers::get_dignitary)
                .put(handlers::replace_dignitary)
                .patch(handlers::patch_dignitary)
                .delete(handlers::delete_dignitary),
        )
        .route(
            "/api/v1/dignitaries/:id/inline",
            patch(handlers::inline_edit_dignitary),
        )
        .route(
            "/api/v1/dignitaries/:id/portrait",
            put(handlers::upload_portrait).get(handlers::get_portrait),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
