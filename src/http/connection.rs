use std::fmt;
use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::net::{TcpListener, TcpStream};

/// Address of the client at the other end of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub host: String,
    pub port: String,
}

impl Peer {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }
}

impl From<SocketAddr> for Peer {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port().to_string())
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One accepted client: its address and a buffered duplex stream used both
/// to read the request and to write the response.
///
/// The stream is closed when the connection is dropped.
pub struct Connection<S = TcpStream> {
    pub peer: Peer,
    stream: BufStream<S>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: Peer) -> Self {
        Self {
            peer,
            stream: BufStream::new(stream),
        }
    }

    pub fn stream(&mut self) -> &mut BufStream<S> {
        &mut self.stream
    }

    /// Flushes anything still buffered and shuts down the write side.
    pub async fn close(&mut self) -> std::io::Result<()> {
        self.stream.flush().await?;
        self.stream.shutdown().await
    }
}

/// Blocks until a client connects.
///
/// Nothing is returned on failure; the accepted socket, if any, is closed.
pub async fn accept(listener: &TcpListener) -> anyhow::Result<Connection<TcpStream>> {
    let (socket, addr) = listener.accept().await.context("accept failed")?;
    let peer = Peer::from(addr);
    tracing::info!(peer = %peer, "Accepted connection");
    Ok(Connection::new(socket, peer))
}
