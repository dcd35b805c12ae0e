use crate::modules::results::controller::{
    create_result, get_result, get_results, publish_results, review_results, update_result,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_results_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_result).get(get_results))
        .route("/publish", post(publish_results))
        .route("/approve", post(review_results))
        .route("/{id}", get(get_result).put(update_result))
}
