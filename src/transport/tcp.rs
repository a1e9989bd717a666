//! TCP control channel
//!
//! Opens the connection to the proxy server over which negotiation and,
//! in CONNECT mode, application data flow.

use super::SocketOpts;
use std::io;
use std::net::SocketAddrV4;
use std::time::Duration;
use tokio::net::TcpStream;

/// Connect to the proxy within `timeout` and apply socket options.
///
/// Timeout expiry surfaces as `io::ErrorKind::TimedOut` so callers can
/// classify it the same way as a refused connection.
pub async fn open_control_channel(
    proxy: SocketAddrV4,
    opts: &SocketOpts,
    timeout: Duration,
) -> io::Result<TcpStream> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(proxy))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "proxy connect timed out"))??;

    opts.apply(&stream)?;
    tracing::debug!(%proxy, "control channel established");
    Ok(stream)
}
