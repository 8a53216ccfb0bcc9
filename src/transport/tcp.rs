//! TCP Transport
//!
//! RESP2 client over a single connection. Requests on one transport are
//! serialized: a caller holds the connection for its whole round trip.

use std::future::Future;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use super::Transport;
use crate::config::ConnectionConfig;
use crate::error::{ObjectError, Result};
use crate::protocol::{decode_reply, encode_command_into, Command, Reply};

/// Transport speaking RESP2 to a Redis-compatible server
pub struct TcpTransport {
    /// Connection state (buffered reads)
    connection: Mutex<Connection>,

    config: ConnectionConfig,

    /// Peer address for logging
    peer_addr: String,
}

struct Connection {
    stream: TcpStream,

    /// Bytes read but not yet decoded
    buffer: BytesMut,

    /// Set while a round trip is in flight and left set if it never
    /// finished; replies may be out of step
    broken: bool,
}

impl TcpTransport {
    /// Connect to `config.addr`
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        let stream = with_timeout(
            config.connect_timeout_ms,
            TcpStream::connect(config.addr.as_str()),
        )
        .await??;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(config.nodelay)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            connection: Mutex::new(Connection {
                stream,
                buffer: BytesMut::with_capacity(4096),
                broken: false,
            }),
            config,
            peer_addr,
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Write every command, then read one reply per command
    async fn round_trip(&self, commands: &[Command]) -> Result<Vec<Reply>> {
        let mut connection = self.connection.lock().await;
        if connection.broken {
            tracing::debug!("Refusing round trip on out-of-step connection to {}", self.peer_addr);
            return Err(ObjectError::ConnectionClosed);
        }

        let mut out = BytesMut::new();
        for command in commands {
            tracing::trace!("{} <- {}", self.peer_addr, command);
            encode_command_into(command, &mut out);
        }

        // Cleared only once every reply is read; a caller dropped
        // mid-exchange leaves it set.
        connection.broken = true;
        let result = self.exchange(&mut connection, &out, commands.len()).await;
        match &result {
            Ok(_) => connection.broken = false,
            Err(e) => tracing::warn!("Round trip to {} failed: {}", self.peer_addr, e),
        }
        result
    }

    async fn exchange(
        &self,
        connection: &mut Connection,
        request: &[u8],
        expected: usize,
    ) -> Result<Vec<Reply>> {
        with_timeout(
            self.config.write_timeout_ms,
            connection.stream.write_all(request),
        )
        .await??;

        let mut replies = Vec::with_capacity(expected);
        for _ in 0..expected {
            replies.push(self.read_reply(connection).await?);
        }
        Ok(replies)
    }

    async fn read_reply(&self, connection: &mut Connection) -> Result<Reply> {
        loop {
            if let Some((reply, consumed)) = decode_reply(&connection.buffer)? {
                connection.buffer.advance(consumed);
                return Ok(reply);
            }

            let Connection { stream, buffer, .. } = &mut *connection;
            let read = with_timeout(self.config.read_timeout_ms, stream.read_buf(buffer)).await??;
            if read == 0 {
                tracing::debug!("Connection closed by {}", self.peer_addr);
                return Err(ObjectError::ConnectionClosed);
            }
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn call(&self, command: Command) -> Result<Reply> {
        let mut replies = self.round_trip(std::slice::from_ref(&command)).await?;
        replies
            .pop()
            .ok_or_else(|| ObjectError::Protocol("missing reply".to_string()))?
            .into_result()
    }

    async fn pipeline(&self, commands: Vec<Command>) -> Result<Vec<Reply>> {
        if commands.is_empty() {
            return Ok(Vec::new());
        }
        self.round_trip(&commands)
            .await?
            .into_iter()
            .map(Reply::into_result)
            .collect()
    }
}

/// Run `future` under a millisecond timeout (0 waits forever)
async fn with_timeout<F: Future>(ms: u64, future: F) -> Result<F::Output> {
    match ConnectionConfig::timeout(ms) {
        Some(limit) => tokio::time::timeout(limit, future)
            .await
            .map_err(|_| ObjectError::Timeout(ms)),
        None => Ok(future.await),
    }
}
