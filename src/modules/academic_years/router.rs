use crate::modules::academic_years::controller::{
    create_academic_year, delete_academic_year, get_academic_year, get_academic_years,
    get_current_academic_year, update_academic_year,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_academic_years_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_academic_year).get(get_academic_years))
        .route("/current", get(get_current_academic_year))
        .route(
            "/{id}",
            get(get_academic_year)
                .put(update_academic_year)
                .delete(delete_academic_year),
        )
}
