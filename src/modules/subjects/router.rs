use crate::modules::subjects::controller::{create_subject, get_subject, get_subjects};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject).get(get_subjects))
        .route("/{id}", get(get_subject))
}
