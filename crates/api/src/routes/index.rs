use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(handlers::index::index_page))
}
