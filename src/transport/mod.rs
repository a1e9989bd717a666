//! Transport channels
//!
//! Raw socket resources underneath the SOCKS5 session: the TCP control
//! channel carrying negotiation (and, in CONNECT mode, application data)
//! and the UDP relay channel carrying encapsulated datagrams.

mod tcp;
mod udp;

pub use tcp::open_control_channel;
pub use udp::RelayChannel;

use std::time::Duration;
use tokio::net::TcpStream;

/// Socket options applied to the control channel.
#[derive(Debug, Clone)]
pub struct SocketOpts {
    /// Enable TCP_NODELAY
    pub nodelay: bool,
    /// TCP keepalive timeout
    pub keepalive_secs: Option<u64>,
    /// TCP keepalive interval
    pub keepalive_interval: Option<u64>,
}

impl Default for SocketOpts {
    fn default() -> Self {
        SocketOpts {
            nodelay: true,
            keepalive_secs: Some(30),
            keepalive_interval: Some(10),
        }
    }
}

impl SocketOpts {
    /// Apply these options to a connected TCP stream
    pub fn apply(&self, stream: &TcpStream) -> std::io::Result<()> {
        stream.set_nodelay(self.nodelay)?;

        if let (Some(timeout), Some(interval)) = (self.keepalive_secs, self.keepalive_interval) {
            let socket = socket2::SockRef::from(stream);
            let keepalive = socket2::TcpKeepalive::new()
                .with_time(Duration::from_secs(timeout))
                .with_interval(Duration::from_secs(interval));
            socket.set_tcp_keepalive(&keepalive)?;
        }

        Ok(())
    }
}
