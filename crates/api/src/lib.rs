//! `api` crate — HTTP layer over the `db` repositories.
//!
//! Exposes the benchmark CRUD surface:
//!   GET    /plaintext
//!   GET    /json
//!   GET    /read-one?id=
//!   GET    /read-many?limit=&offset=
//!   POST   /create-one
//!   POST   /create-many
//!   PATCH  /update-one/:id
//!   PUT    /update-many
//!   DELETE /delete-one/:id
//!   DELETE /delete-many
//!   GET    /write-many?limit=&offset=&r=
//!
//! Handlers parse and validate input, call repository functions, and map
//! the db error taxonomy to status codes.  No SQL lives here, and no
//! internal error text ever reaches a response body.

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use db::DbPool;

pub mod handlers;

#[cfg(test)]
mod handler_tests;

/// Shared per-request state; the pool is the only process-wide handle and is
/// injected here rather than reached through a global.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

/// Build the application router around an already-constructed pool.
pub fn router(pool: DbPool) -> Router {
    Router::new()
        .route("/plaintext", get(handlers::bench::plaintext))
        .route("/json", get(handlers::bench::json))
        .route("/read-one", get(handlers::worlds::read_one))
        .route("/read-many", get(handlers::worlds::read_many))
        .route("/create-one", post(handlers::worlds::create_one))
        .route("/create-many", post(handlers::worlds::create_many))
        .route("/update-one/:id", patch(handlers::worlds::update_one))
        .route("/update-many", put(handlers::worlds::update_many))
        .route("/delete-one/:id", delete(handlers::worlds::delete_one))
        .route("/delete-many", delete(handlers::worlds::delete_many))
        .route("/write-many", get(handlers::worlds::write_many))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(AppState { pool })
}

/// Bind `addr` and serve the router until the process is stopped.
pub async fn serve(addr: &str, pool: DbPool) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(pool)).await
}
