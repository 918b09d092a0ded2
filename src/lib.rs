//! ScopeLink acquisition host
//!
//! TCP remote-control daemon for a microscope acquisition system: stage
//! motion, objective and mosaic queries, parameter-set switching and movie
//! acquisition, with a dry-run test mode on every command.

pub mod command;
pub mod config;
pub mod error;
pub mod instrument;
pub mod parameters;
pub mod session;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use command::CommandExecutor;
use session::ClientSession;

/// Accept remote-control connections until the listener fails
///
/// Each connection gets its own task; commands within a connection run
/// strictly sequentially.
pub async fn serve(listener: TcpListener, executor: Arc<CommandExecutor>) -> Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Connection from {}", addr);

        let executor = executor.clone();
        tokio::spawn(async move {
            ClientSession::new(stream, addr, executor).run().await;
        });
    }
}
