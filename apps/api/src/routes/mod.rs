pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers::handle_upload;
use crate::generation::handlers::{handle_analyze, handle_debug_echo};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/upload",
            post(handle_upload).layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/analyze", post(handle_analyze));

    if state.config.enable_debug_routes {
        router = router.route("/test", post(handle_debug_echo));
    }

    router.with_state(state)
}
