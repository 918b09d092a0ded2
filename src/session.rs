//! Per-connection session handling
//!
//! Each accepted connection is one session. Requests are processed strictly
//! sequentially: every response is written before the next request is read,
//! so responses always correspond to the preceding request.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use scopelink_shared::codec::{read_envelope, write_envelope};
use scopelink_shared::{envelope, request, Request};

use crate::command::CommandExecutor;

/// One remote-control client connection
pub struct ClientSession {
    stream: TcpStream,
    addr: SocketAddr,
    executor: Arc<CommandExecutor>,
}

impl ClientSession {
    pub fn new(stream: TcpStream, addr: SocketAddr, executor: Arc<CommandExecutor>) -> Self {
        Self {
            stream,
            addr,
            executor,
        }
    }

    /// Serve requests until the peer disconnects or framing breaks
    ///
    /// Command failures answer with an error response and keep the session
    /// alive; only transport-level problems end it.
    pub async fn run(mut self) {
        loop {
            let envelope = match read_envelope(&mut self.stream).await {
                Ok(Some(envelope)) => envelope,
                Ok(None) => {
                    info!("Client disconnected: {}", self.addr);
                    return;
                }
                Err(e) => {
                    warn!("Framing error from {}: {}", self.addr, e);
                    return;
                }
            };

            let header = match envelope.header {
                Some(header) => header,
                None => {
                    warn!("Envelope without header from {}", self.addr);
                    continue;
                }
            };

            let reply = match envelope.payload {
                Some(envelope::Payload::Request(request)) => {
                    debug!(
                        "[{}] seq={} {}",
                        header.client_id,
                        header.sequence_id,
                        command_name(&request)
                    );
                    self.executor.execute(&request, &header).await
                }
                _ => self.executor.reject(&header),
            };

            if let Err(e) = write_envelope(&mut self.stream, &reply).await {
                warn!("Write error to {}: {}", self.addr, e);
                return;
            }
        }
    }
}

fn command_name(request: &Request) -> &'static str {
    match &request.command {
        Some(request::Command::GetMosaicSettings(_)) => "GetMosaicSettings",
        Some(request::Command::GetObjective(_)) => "GetObjective",
        Some(request::Command::GetStagePosition(_)) => "GetStagePosition",
        Some(request::Command::MoveStage(_)) => "MoveStage",
        Some(request::Command::SetParameters(_)) => "SetParameters",
        Some(request::Command::TakeMovie(_)) => "TakeMovie",
        None => "<empty>",
    }
}
