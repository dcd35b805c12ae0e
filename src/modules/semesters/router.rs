use crate::modules::semesters::controller::{
    create_semester, delete_semester, get_current_semester, get_semester, get_semesters,
    update_semester,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_semesters_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_semester).get(get_semesters))
        .route("/current", get(get_current_semester))
        .route(
            "/{id}",
            get(get_semester).put(update_semester).delete(delete_semester),
        )
}
