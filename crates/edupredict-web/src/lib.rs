//! HTTP form front end: server-rendered pages, flash messages across redirects.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use edupredict_core::SubmissionHandler;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod flash;
pub mod form;
pub mod page;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<dyn SubmissionHandler>,
}

pub fn construct_router(handler: Arc<dyn SubmissionHandler>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route(
            routes::FORM_PATH,
            get(routes::form_page).post(routes::predict),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { handler })
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, handler: Arc<dyn SubmissionHandler>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, construct_router(handler)).await
}
