//! Route table and middleware.

use super::handlers::{
    analyze_image::analyze_image, generate_recipes::generate_recipes,
    get_ingredients::get_ingredients, get_job::get_job,
};
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tracing::info_span;

const MAX_UPLOAD_SIZE: usize = 20 * 1024 * 1024; // 20MB

///  Returns the [`Router`] of this application.
pub fn router(state: AppState) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request| {
            let uri: String = request.uri().to_string();
            info_span!("http_request", method = ?request.method(), uri)
        },
    );

    Router::new()
        .route("/analyze-image", post(analyze_image))
        .route("/ingredients", get(get_ingredients))
        .route("/generate-recipes", post(generate_recipes))
        .route("/jobs/{job_id}", get(get_job))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(trace_layer)
        .with_state(state)
}
