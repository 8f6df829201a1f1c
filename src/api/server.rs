//! TCP listener and server loop.

use super::{router, AppState};
use crate::app::App;
use crate::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn serve(app: Arc<App>, host: &str, port: u16) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(AppState::new(app))).await?;
    Ok(())
}
