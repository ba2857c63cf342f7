//! TCP Connection
//!
//! Newline-delimited text frames over a TCP stream. The server must echo the
//! `ID <id>` prefix on each reply; bare payloads are dropped as malformed.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::Transport;
use crate::config::Config;
use crate::error::{DocmuxError, Result};
use crate::mux::Multiplexer;

/// Writing half of a TCP connection, one frame per line
pub struct TcpTransport {
    /// Buffered writer, locked per frame so lines never interleave
    writer: Mutex<BufWriter<TcpStream>>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    pub fn new(stream: TcpStream, peer_addr: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(stream)),
            peer_addr: peer_addr.into(),
        }
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn send(&self, frame: &str) -> Result<()> {
        if frame.contains(['\n', '\r']) {
            return Err(DocmuxError::Protocol(
                "frame contains a line break and cannot be sent".to_string(),
            ));
        }

        let mut writer = self.writer.lock();
        writer.write_all(frame.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// A client connection: TCP stream, multiplexer and reader thread
///
/// The reader thread runs until the server closes the stream or
/// `shutdown` is called, then closes the multiplexer.
pub struct Connection {
    /// Request multiplexer shared with the reader thread
    mux: Arc<Multiplexer<TcpTransport>>,

    /// Handle used to unblock the reader on shutdown
    stream: TcpStream,

    reader: Option<JoinHandle<()>>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `config.server_addr`
    pub fn open(config: &Config) -> Result<Self> {
        let stream = connect(&config.server_addr, config.connect_timeout())?;
        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Requests are small and latency-bound
        stream.set_nodelay(true)?;
        stream.set_write_timeout(config.write_timeout())?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream.try_clone()?;

        let mux = Arc::new(Multiplexer::with_config(
            TcpTransport::new(write_stream, peer_addr.clone()),
            config,
        ));

        let reader = thread::Builder::new()
            .name("docmux-reader".to_string())
            .spawn({
                let mux = Arc::clone(&mux);
                let peer_addr = peer_addr.clone();
                move || read_loop(BufReader::new(read_stream), &mux, &peer_addr)
            })?;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            mux,
            stream,
            reader: Some(reader),
            peer_addr,
        })
    }

    /// The multiplexer serving this connection
    pub fn multiplexer(&self) -> &Arc<Multiplexer<TcpTransport>> {
        &self.mux
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Close the stream and wait for the reader thread to finish
    ///
    /// Pending requests are rejected according to the disconnect policy.
    pub fn shutdown(&mut self) {
        let Some(reader) = self.reader.take() else {
            return;
        };

        self.mux.close("connection shut down");

        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            if e.kind() != std::io::ErrorKind::NotConnected {
                tracing::warn!("Error shutting down connection to {}: {}", self.peer_addr, e);
            }
        }

        if reader.join().is_err() {
            tracing::warn!("Reader thread for {} panicked", self.peer_addr);
        }

        tracing::debug!("Connection to {} shut down", self.peer_addr);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Resolve `addr` and connect, trying each address in turn
fn connect(addr: &str, timeout: Option<Duration>) -> Result<TcpStream> {
    let Some(timeout) = timeout else {
        return Ok(TcpStream::connect(addr)?);
    };

    let mut last_error = None;
    for socket_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(e) => DocmuxError::Io(e),
        None => DocmuxError::Config(format!("address '{}' resolved to nothing", addr)),
    })
}

/// Feed every inbound line to the multiplexer until the stream ends
fn read_loop<R: BufRead>(mut reader: R, mux: &Multiplexer<TcpTransport>, peer_addr: &str) {
    let mut buf = Vec::new();

    let reason = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break "server closed the connection".to_string(),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => break e.to_string(),
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(['\n', '\r']),
            Err(e) => {
                tracing::warn!("Dropping non UTF-8 frame from {}: {}", peer_addr, e);
                continue;
            }
        };

        if line.is_empty() {
            continue;
        }

        tracing::trace!("Received frame from {}: {}", peer_addr, line);
        mux.on_frame_received(line);
    };

    tracing::debug!("Reader for {} stopped: {}", peer_addr, reason);
    mux.close(&reason);
}
