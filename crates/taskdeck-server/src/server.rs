use std::path::PathBuf;

use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use taskdeck_store::{Database, TaskRepo};

use crate::config::ServerConfig;
use crate::handlers;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: TaskRepo,
}

/// Build the Axum router with all routes. When a static dir is given, any
/// path not matched by the API falls through to the client assets.
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Create and start the server. Returns a handle carrying the bound port.
pub async fn start(config: ServerConfig, db: Database) -> Result<ServerHandle, std::io::Error> {
    let state = AppState {
        repo: TaskRepo::new(db),
    };
    let router = build_router(state, config.static_dir.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "taskdeck server started");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}
