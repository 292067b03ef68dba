//! HTTP surface over [`OpeningRepository`].
//!
//! | Route           | Response                             |
//! |-----------------|--------------------------------------|
//! | `/`             | every opening, in page order         |
//! | `/next/{*path}` | next move for `CODE/m1/m2/…`         |
//! | `/next/`        | always `""` (empty move path)        |
//! | `/{code}`       | one opening, or `null` if unknown    |

mod error;
mod handlers;

use std::future::Future;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::repository::OpeningRepository;

/// Build the router with the repository as shared state.
pub fn build_router(repo: OpeningRepository) -> Router {
    Router::new()
        .route("/", get(handlers::list_all))
        .route("/next/", get(handlers::next_move_empty))
        .route("/next/{*path}", get(handlers::next_move))
        .route("/{code}", get(handlers::get_by_code))
        .with_state(repo)
}

/// Serve on `listener` until `shutdown` resolves and in-flight requests drain.
pub async fn serve<F>(listener: TcpListener, repo: OpeningRepository, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        log::info!("Listening on {addr}");
    }
    axum::serve(listener, build_router(repo))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
