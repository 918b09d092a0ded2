//! ScopeLink remote-control client
//!
//! Thin request/response wrapper over the shared codec: one command per
//! round trip, each response matched to the request that preceded it.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{anyhow, bail, Result};
use tokio::net::TcpStream;
use tracing::debug;

use scopelink_shared::codec::{read_envelope, write_envelope};
use scopelink_shared::{envelope, Envelope, Header, MessageType, Request, Response};

/// Connection to an acquisition host
pub struct RemoteClient {
    stream: TcpStream,
    client_id: String,
    sequence_id: AtomicU64,
}

impl RemoteClient {
    /// Connect to a host at `addr`
    pub async fn connect(addr: &str, client_id: impl Into<String>) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            client_id: client_id.into(),
            sequence_id: AtomicU64::new(0),
        })
    }

    /// Send one request and wait for its response
    pub async fn send(&mut self, request: Request) -> Result<Response> {
        let seq = self.sequence_id.fetch_add(1, Ordering::SeqCst) + 1;
        let envelope = Envelope {
            header: Some(Header::new(
                self.client_id.as_str(),
                MessageType::MsgRequest,
                seq,
            )),
            payload: Some(envelope::Payload::Request(request)),
        };
        write_envelope(&mut self.stream, &envelope).await?;

        let reply = read_envelope(&mut self.stream)
            .await?
            .ok_or_else(|| anyhow!("connection closed before response"))?;

        match reply.payload {
            Some(envelope::Payload::Response(response)) => {
                debug!("seq={} error={}", seq, response.error);
                if response.request_sequence_id != seq {
                    bail!(
                        "response out of order: expected seq {}, got {}",
                        seq,
                        response.request_sequence_id
                    );
                }
                Ok(response)
            }
            _ => bail!("unexpected payload in reply"),
        }
    }
}
