//! Framed IRC transport over plain TCP or client-side TLS.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_util::codec::Framed;
use tracing::warn;

use crate::error::ProtocolError;
use crate::irc::IrcCodec;
use crate::Message;

/// Longest line accepted from the server: 8191 bytes of tags plus the
/// classic 512-byte message.
pub const MAX_IRC_LINE_LEN: usize = 8191 + 512;

/// Errors that can occur when reading from a transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportReadError {
    /// An I/O error occurred.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A framing or protocol error occurred.
    #[error("transport protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// A connection to an IRC server.
#[allow(clippy::large_enum_variant)]
#[non_exhaustive]
pub enum Transport {
    /// Plain TCP.
    Tcp {
        /// The framed codec for TCP.
        framed: Framed<TcpStream, IrcCodec>,
    },
    /// TLS on top of TCP, client side.
    ClientTls {
        /// The framed codec for TLS.
        framed: Framed<TlsStream<TcpStream>, IrcCodec>,
    },
}

impl Transport {
    /// Wrap a connected TCP stream.
    pub fn tcp(stream: TcpStream) -> Self {
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Self::Tcp {
            framed: Framed::new(stream, IrcCodec::default()),
        }
    }

    /// Wrap an established client TLS stream.
    pub fn client_tls(stream: TlsStream<TcpStream>) -> Self {
        if let Err(e) = Self::enable_keepalive(stream.get_ref().0) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Self::ClientTls {
            framed: Framed::new(stream, IrcCodec::default()),
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }

    /// Whether the connection is encrypted.
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::ClientTls { .. })
    }

    /// Read the next message. `Ok(None)` means the server closed the
    /// connection.
    pub async fn read_message(&mut self) -> Result<Option<Message>, TransportReadError> {
        let next = match self {
            Transport::Tcp { framed } => framed.next().await,
            Transport::ClientTls { framed } => framed.next().await,
        };
        match next {
            Some(Ok(msg)) => Ok(Some(msg)),
            Some(Err(e)) => Err(TransportReadError::from(e)),
            None => Ok(None),
        }
    }

    /// Write one message and flush it.
    pub async fn write_message(&mut self, message: &Message) -> Result<(), ProtocolError> {
        match self {
            Transport::Tcp { framed } => framed.send(message.clone()).await,
            Transport::ClientTls { framed } => framed.send(message.clone()).await,
        }
    }
}
