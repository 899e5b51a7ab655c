//! Router configuration for the kiosk web front end.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::StatusCode,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    AppState, endpoints,
    scan_page::{get_kiosk_page, scan_endpoint, undo_endpoint},
};

/// Return a router with all the kiosk's routes.
pub fn build_router(state: AppState) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Failed sales and undos are logged by the engine.
        .on_failure(());

    Router::new()
        .route(endpoints::ROOT, get(get_kiosk_page))
        .route(endpoints::SCAN, post(scan_endpoint))
        .route(endpoints::UNDO, post(undo_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(tracing_layer)
        .with_state(state)
}

async fn get_404_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
