//! SOCKS5 client session
//!
//! [`ProxyClient`] owns the session state and orchestrates the protocol
//! components: it opens the control channel, runs method negotiation and
//! the command exchange, then dispatches send/read either to the raw
//! control channel (CONNECT mode) or through the datagram codec to the
//! relay channel (UDP ASSOCIATE mode).
//!
//! The facade never propagates errors across its boundary: operations
//! report success as byte counts or `true`, failure as `-1` or `false`,
//! and the classified cause stays queryable through
//! [`ProxyClient::last_error`]. No panics, no internal retries.

use crate::error::ProxyError;
use crate::socks::{self, Credentials, SocksCommand, WaitMode, UDP_HEADER_LEN};
use crate::transport::{open_control_channel, RelayChannel, SocketOpts};
use std::net::SocketAddrV4;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default bound on the whole connect sequence (TCP connect, negotiation,
/// command exchange). A stalled proxy can otherwise hang the caller
/// indefinitely; the handshake is always cancellable.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// A SOCKS5 client session.
///
/// Exclusively owned and not thread-safe by design: use one session per
/// task, or synchronize externally. A session is created unconnected,
/// becomes established by a successful [`connect`](Self::connect), and
/// returns to unconnected on any failure, [`close`](Self::close) or drop.
///
/// ```rust,ignore
/// use sockstream::{ProxyClient, SocksCommand};
///
/// let mut client = ProxyClient::new();
/// if client
///     .connect(proxy_addr, None, SocksCommand::UdpAssociate, None)
///     .await
/// {
///     client.send(b"TEST_PACKET\0", Some(dest_addr)).await;
/// } else {
///     eprintln!("proxy connection error: {}", client.last_error());
/// }
/// ```
#[derive(Debug)]
pub struct ProxyClient {
    mode: SocksCommand,
    control: Option<TcpStream>,
    relay: Option<RelayChannel>,
    connected: bool,
    last_error: ProxyError,
    handshake_timeout: Duration,
    force_main_address: bool,
    socket_opts: SocketOpts,
}

impl ProxyClient {
    /// Create an unconnected session with default options.
    pub fn new() -> Self {
        ProxyClient {
            mode: SocksCommand::Connect,
            control: None,
            relay: None,
            connected: false,
            last_error: ProxyError::Success,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            force_main_address: false,
            socket_opts: SocketOpts::default(),
        }
    }

    /// Bound the whole connect sequence by `timeout`.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Aim relay datagrams at the proxy host itself instead of the bound
    /// address from the UDP ASSOCIATE reply.
    ///
    /// Some proxy servers do not adhere to the RFC and report an unusable
    /// bound address such as 0.0.0.0; this substitutes the originally
    /// connected proxy IPv4 while keeping the reply's port.
    pub fn with_force_main_address(mut self, force: bool) -> Self {
        self.force_main_address = force;
        self
    }

    /// Override control-channel socket options.
    pub fn with_socket_opts(mut self, opts: SocketOpts) -> Self {
        self.socket_opts = opts;
        self
    }

    /// Connect to the proxy and establish the requested mode.
    ///
    /// For CONNECT (and BIND, which is validated but never executed) a
    /// concrete destination is required; a missing destination, an
    /// unspecified address or a zero port records
    /// [`ProxyError::DstHost`]. Empty credentials negotiate as no-auth.
    ///
    /// Returns `true` on success. On failure every channel opened during
    /// the attempt is closed, exactly one error is recorded, and `false`
    /// is returned.
    pub async fn connect(
        &mut self,
        proxy: SocketAddrV4,
        credentials: Option<Credentials>,
        mode: SocksCommand,
        dest: Option<SocketAddrV4>,
    ) -> bool {
        self.close();
        self.mode = mode;
        self.last_error = ProxyError::Success;

        if mode.requires_destination() && !destination_is_usable(dest) {
            self.last_error = ProxyError::DstHost;
            return false;
        }

        let attempt = establish(
            proxy,
            credentials,
            mode,
            dest,
            self.force_main_address,
            &self.socket_opts,
            self.handshake_timeout,
        );
        match tokio::time::timeout(self.handshake_timeout, attempt).await {
            Ok(Ok((control, relay))) => {
                self.control = Some(control);
                self.relay = relay;
                self.connected = true;
                true
            }
            Ok(Err(error)) => {
                self.last_error = error;
                false
            }
            Err(_elapsed) => {
                tracing::debug!(%proxy, "handshake timed out");
                self.last_error = ProxyError::Network;
                false
            }
        }
    }

    /// Send application data through the proxy.
    ///
    /// CONNECT mode writes the raw payload to the control channel in a
    /// single write and returns the byte count (short writes surface as
    /// the raw count). UDP ASSOCIATE mode requires a usable destination,
    /// encapsulates the payload and returns the payload length actually
    /// carried. Returns -1 when unconnected, on a missing destination or
    /// on any I/O failure.
    pub async fn send(&mut self, payload: &[u8], dest: Option<SocketAddrV4>) -> i32 {
        if !self.connected {
            return -1;
        }

        match self.mode {
            SocksCommand::Connect => match self.control.as_mut() {
                Some(stream) => match stream.write(payload).await {
                    Ok(sent) => sent as i32,
                    Err(_) => -1,
                },
                None => -1,
            },
            SocksCommand::UdpAssociate => {
                let dest = match dest {
                    Some(dest) if destination_is_usable(Some(dest)) => dest,
                    _ => return -1,
                };
                let relay = match self.relay.as_ref() {
                    Some(relay) => relay,
                    None => return -1,
                };

                let frame = socks::encode_datagram(payload, dest);
                match relay.send(&frame).await {
                    Ok(sent) if sent > UDP_HEADER_LEN => (sent - UDP_HEADER_LEN) as i32,
                    Ok(sent) => sent as i32,
                    Err(_) => -1,
                }
            }
            SocksCommand::Bind => -1,
        }
    }

    /// Read application data from the proxy.
    ///
    /// CONNECT mode blocks until the control channel yields data (0 on a
    /// clean remote close). UDP ASSOCIATE mode performs a single
    /// non-blocking receive; when a datagram is queued it is decoded,
    /// its payload copied into `buf` and its header source written to
    /// `source` when supplied. Datagrams not longer than the relay header
    /// are discarded with -1 and `buf` untouched; -1 also reports an
    /// empty queue, an unconnected session or an I/O failure.
    pub async fn read(&mut self, buf: &mut [u8], source: Option<&mut SocketAddrV4>) -> i32 {
        if !self.connected {
            return -1;
        }

        match self.mode {
            SocksCommand::Connect => match self.control.as_mut() {
                Some(stream) => match stream.read(buf).await {
                    Ok(received) => received as i32,
                    Err(_) => -1,
                },
                None => -1,
            },
            SocksCommand::UdpAssociate => {
                let relay = match self.relay.as_ref() {
                    Some(relay) => relay,
                    None => return -1,
                };

                let mut frame = vec![0u8; buf.len() + UDP_HEADER_LEN];
                let received = match relay.try_recv(&mut frame) {
                    Ok(received) => received,
                    Err(_) => return -1,
                };

                match socks::decode_datagram(&frame[..received]) {
                    Some(datagram) => {
                        buf[..datagram.payload.len()].copy_from_slice(&datagram.payload);
                        if let Some(source) = source {
                            *source = datagram.addr;
                        }
                        datagram.payload.len() as i32
                    }
                    None => -1,
                }
            }
            SocksCommand::Bind => -1,
        }
    }

    /// Wait for relay-channel readiness.
    ///
    /// Only the UDP relay channel supports readiness polling; the control
    /// channel has no polling primitive. On return the mask is rewritten
    /// to the ready subset of the requested interests, cleared on
    /// timeout. Returns 0 on completion (including timeout), -1 when no
    /// relay channel exists or multiplexing fails.
    pub async fn wait(&mut self, mask: &mut WaitMode, timeout_ms: u64) -> i32 {
        let relay = match self.relay.as_ref() {
            Some(relay) => relay,
            None => return -1,
        };

        match relay.wait(*mask, Duration::from_millis(timeout_ms)).await {
            Ok(ready) => {
                *mask = ready;
                0
            }
            Err(_) => -1,
        }
    }

    /// Tear down both channels. Idempotent; the last error is preserved.
    pub fn close(&mut self) {
        if self.connected {
            tracing::debug!(mode = %self.mode, "closing proxy session");
        }
        self.control = None;
        self.relay = None;
        self.connected = false;
    }

    /// Whether the session is currently established.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Relay endpoint datagrams are sent to, when a UDP session is open.
    pub fn relay_target(&self) -> Option<SocketAddrV4> {
        self.relay.as_ref().map(|relay| relay.target())
    }

    /// Classification of the most recent failure.
    pub fn last_error(&self) -> ProxyError {
        self.last_error
    }
}

impl Default for ProxyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the handshake sequence, returning the channels on success.
///
/// Channels opened here are owned locally until the caller commits them,
/// so every error path tears them down by dropping.
async fn establish(
    proxy: SocketAddrV4,
    credentials: Option<Credentials>,
    mode: SocksCommand,
    dest: Option<SocketAddrV4>,
    force_main_address: bool,
    socket_opts: &SocketOpts,
    connect_timeout: Duration,
) -> Result<(TcpStream, Option<RelayChannel>), ProxyError> {
    let mut control = open_control_channel(proxy, socket_opts, connect_timeout)
        .await
        .map_err(|_| ProxyError::Connection)?;

    socks::negotiate(&mut control, credentials.as_ref()).await?;

    match mode {
        SocksCommand::Connect => {
            socks::execute(&mut control, SocksCommand::Connect, dest).await?;
            Ok((control, None))
        }
        SocksCommand::UdpAssociate => {
            let bound = socks::execute(&mut control, SocksCommand::UdpAssociate, dest).await?;
            let target = if force_main_address {
                SocketAddrV4::new(*proxy.ip(), bound.port())
            } else {
                bound
            };
            let relay = RelayChannel::bind(target)
                .await
                .map_err(|_| ProxyError::UdpBind)?;
            Ok((control, Some(relay)))
        }
        SocksCommand::Bind => Err(ProxyError::CommandNotSupported),
    }
}

/// A destination is usable when present, addressed and on a non-zero port.
fn destination_is_usable(dest: Option<SocketAddrV4>) -> bool {
    match dest {
        Some(dest) => !dest.ip().is_unspecified() && dest.port() != 0,
        None => false,
    }
}
