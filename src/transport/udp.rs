//! UDP relay channel
//!
//! The datagram socket used in UDP ASSOCIATE mode. Bound to an ephemeral
//! local port and aimed at the relay endpoint the proxy reported; all I/O
//! on it is non-blocking, so callers poll readiness through
//! [`RelayChannel::wait`] instead of blocking on a receive.

use crate::socks::WaitMode;
use std::io;
use std::net::SocketAddrV4;
use std::time::Duration;
use tokio::io::Interest;
use tokio::net::UdpSocket;

/// UDP socket paired with the proxy's relay endpoint.
#[derive(Debug)]
pub struct RelayChannel {
    socket: UdpSocket,
    target: SocketAddrV4,
}

impl RelayChannel {
    /// Bind an ephemeral local socket aimed at the relay endpoint.
    pub async fn bind(target: SocketAddrV4) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        tracing::debug!(local = %socket.local_addr()?, %target, "relay channel bound");
        Ok(RelayChannel { socket, target })
    }

    /// Relay endpoint datagrams are sent to
    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }

    /// Send one encoded frame to the relay endpoint.
    pub async fn send(&self, frame: &[u8]) -> io::Result<usize> {
        self.socket.send_to(frame, self.target).await
    }

    /// Attempt to receive one frame without waiting.
    ///
    /// Returns `WouldBlock` when nothing is queued.
    pub fn try_recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let (len, _source) = self.socket.try_recv_from(buf)?;
        Ok(len)
    }

    /// Wait until any of the requested interests is ready or the timeout
    /// elapses.
    ///
    /// Returns the ready subset of `interest`, or `WaitMode::NONE` on
    /// timeout. An empty interest simply sleeps out the timeout, matching
    /// select() with no descriptors set.
    pub async fn wait(&self, interest: WaitMode, timeout: Duration) -> io::Result<WaitMode> {
        if interest.is_empty() {
            tokio::time::sleep(timeout).await;
            return Ok(WaitMode::NONE);
        }

        let wants_send = interest.contains(WaitMode::SEND);
        let wants_receive = interest.contains(WaitMode::RECEIVE);
        let tokio_interest = if wants_send && wants_receive {
            Interest::WRITABLE | Interest::READABLE
        } else if wants_send {
            Interest::WRITABLE
        } else {
            Interest::READABLE
        };

        match tokio::time::timeout(timeout, self.socket.ready(tokio_interest)).await {
            Err(_elapsed) => Ok(WaitMode::NONE),
            Ok(Err(error)) => Err(error),
            Ok(Ok(ready)) => {
                let mut result = WaitMode::NONE;
                if ready.is_writable() && interest.contains(WaitMode::SEND) {
                    result |= WaitMode::SEND;
                }
                if ready.is_readable() && interest.contains(WaitMode::RECEIVE) {
                    result |= WaitMode::RECEIVE;
                }
                Ok(result)
            }
        }
    }
}
