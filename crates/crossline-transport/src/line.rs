//! Newline-delimited text transport over TCP using `tokio-util`'s `LinesCodec`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Default upper bound on an inbound line, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A TCP [`Transport`] that frames each accepted stream as text lines.
pub struct LineTransport {
    listener: TcpListener,
    max_line_len: usize,
}

impl LineTransport {
    /// Binds a new line transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "line transport listening");
        Ok(Self {
            listener,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        })
    }

    /// Sets the maximum accepted inbound line length for new connections.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for LineTransport {
    type Connection = LineConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let conn = LineConnection::from_stream(stream, addr, self.max_line_len);
        tracing::debug!(id = %conn.id, %addr, "accepted line connection");
        Ok(conn)
    }
}

/// A single line-framed TCP connection.
///
/// The read and write halves sit behind separate locks so a task can wait
/// on the next inbound line while another send completes.
pub struct LineConnection {
    id: ConnectionId,
    peer: SocketAddr,
    max_line_len: usize,
    reader: Mutex<FramedRead<OwnedReadHalf, LinesCodec>>,
    writer: Mutex<FramedWrite<OwnedWriteHalf, LinesCodec>>,
}

impl LineConnection {
    /// Opens an outbound connection, used by the terminal client.
    pub async fn connect(
        addr: impl ToSocketAddrs,
        max_line_len: usize,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        let peer = stream.peer_addr().map_err(TransportError::AcceptFailed)?;
        Ok(Self::from_stream(stream, peer, max_line_len))
    }

    fn from_stream(
        stream: TcpStream,
        peer: SocketAddr,
        max_line_len: usize,
    ) -> Self {
        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        let (read_half, write_half) = stream.into_split();
        Self {
            id,
            peer,
            max_line_len,
            reader: Mutex::new(FramedRead::new(
                read_half,
                LinesCodec::new_with_max_length(max_line_len),
            )),
            writer: Mutex::new(FramedWrite::new(write_half, LinesCodec::new())),
        }
    }

    /// Returns the remote peer's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Connection for LineConnection {
    type Error = TransportError;

    async fn send(&self, line: &str) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .send(line)
            .await
            .map_err(|e| match e {
                LinesCodecError::Io(io) => TransportError::SendFailed(io),
                LinesCodecError::MaxLineLengthExceeded => {
                    TransportError::LineTooLong(self.max_line_len)
                }
            })
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        match self.reader.lock().await.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                Err(TransportError::LineTooLong(self.max_line_len))
            }
            Some(Err(LinesCodecError::Io(e))) => {
                Err(TransportError::ReceiveFailed(e))
            }
            None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        SinkExt::<&str>::close(&mut *self.writer.lock().await)
            .await
            .map_err(|e| match e {
                LinesCodecError::Io(io) => TransportError::SendFailed(io),
                LinesCodecError::MaxLineLengthExceeded => {
                    TransportError::ConnectionClosed("close failed".into())
                }
            })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
