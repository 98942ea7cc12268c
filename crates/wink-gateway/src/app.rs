use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, delete_url_handler, health_handler, redirect_handler,
    resolve_path_handler, resolve_query_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the router.
    ///
    /// Static routes win over `/{code}`, so the codes `health` and `wink`
    /// can only be resolved under `/wink`.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/wink",
                post(create_url_handler).get(resolve_query_handler),
            )
            .route(
                "/wink/{code}",
                get(resolve_path_handler).delete(delete_url_handler),
            )
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
