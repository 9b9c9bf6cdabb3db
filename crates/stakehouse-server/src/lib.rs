//! # Stakehouse Server
//!
//! HTTP transport over `stakehouse-core`: routes, response envelope,
//! settings and telemetry.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod state;
pub mod telemetry;


use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::state::AppState;

fn or_wrong_method(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(handlers::wrong_method)
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/session/{user_id}",
            or_wrong_method(get(handlers::session::issue_session)),
        )
        .route(
            "/stake/{offer_id}",
            or_wrong_method(post(handlers::stake::submit_stake)),
        )
        .route(
            "/highstakes/{offer_id}",
            or_wrong_method(get(handlers::highstakes::high_stakes)),
        );

    // Empty path segment, with and without the trailing slash
    let missing: [(&str, MethodRouter<AppState>); 3] = [
        ("/session", get(handlers::missing_user_id)),
        ("/stake", post(handlers::missing_offer_id)),
        ("/highstakes", get(handlers::missing_offer_id)),
    ];
    for (path, route) in missing {
        let route = or_wrong_method(route);
        router = router
            .route(path, route.clone())
            .route(&format!("{path}/"), route);
    }

    router
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
}
