//! Test utilities for Sockstream integration tests
//!
//! Provides a scriptable mock SOCKS5 proxy: a TCP accept loop speaking
//! the server side of the negotiation and command exchange, an optional
//! UDP relay that echoes every frame back to its sender, and a TCP echo
//! path for established CONNECT sessions.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};

/// Behavior knobs for the mock proxy.
#[derive(Debug, Clone)]
pub struct MockProxyConfig {
    /// Expected credentials; when set the proxy selects username/password
    pub credentials: Option<(String, String)>,
    /// Result code for the command reply (0 = success)
    pub reply_code: u8,
    /// Version byte sent in the method-selection reply
    pub greeting_version: u8,
    /// Bound address reported in the command reply, overriding the real
    /// relay address (used to simulate proxies reporting 0.0.0.0)
    pub bound_override: Option<SocketAddrV4>,
}

impl Default for MockProxyConfig {
    fn default() -> Self {
        MockProxyConfig {
            credentials: None,
            reply_code: 0,
            greeting_version: 5,
            bound_override: None,
        }
    }
}

/// Install the test log subscriber, honoring `RUST_LOG`.
///
/// `try_init` so repeated calls across tests in one binary are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Spawn a mock proxy and return its listening address.
///
/// Each accepted connection is served on its own task; the listener keeps
/// accepting until the test drops the runtime.
pub async fn spawn_mock_proxy(config: MockProxyConfig) -> SocketAddrV4 {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = v4(listener.local_addr().unwrap());

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => return,
            };
            let config = config.clone();
            tokio::spawn(async move {
                let _ = serve_connection(stream, config).await;
            });
        }
    });

    addr
}

async fn serve_connection(mut stream: TcpStream, config: MockProxyConfig) -> std::io::Result<()> {
    // Method selection
    let mut header = [0u8; 2];
    stream.read_exact(&mut header).await?;
    assert_eq!(header[0], 5, "client must send SOCKS5 version");
    let mut methods = vec![0u8; header[1] as usize];
    stream.read_exact(&mut methods).await?;

    match &config.credentials {
        Some((user, pass)) => {
            stream.write_all(&[config.greeting_version, 2]).await?;
            if !authenticate(&mut stream, user, pass).await? {
                return Ok(());
            }
        }
        None => {
            stream.write_all(&[config.greeting_version, 0]).await?;
        }
    }

    // Command exchange
    let mut request = [0u8; 10];
    stream.read_exact(&mut request).await?;
    let command = request[1];

    if config.reply_code != 0 {
        stream
            .write_all(&reply(config.reply_code, SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)))
            .await?;
        return Ok(());
    }

    match command {
        1 => {
            let bound = config
                .bound_override
                .unwrap_or_else(|| SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 0));
            stream.write_all(&reply(0, bound)).await?;
            echo_tcp(stream).await
        }
        3 => {
            let relay = UdpSocket::bind("127.0.0.1:0").await?;
            let relay_addr = v4(relay.local_addr()?);
            let bound = config.bound_override.map_or(relay_addr, |over| {
                // Keep the real relay port so force-main-address tests can
                // still reach the relay through the proxy host address.
                SocketAddrV4::new(*over.ip(), relay_addr.port())
            });
            stream.write_all(&reply(0, bound)).await?;
            tokio::spawn(echo_udp(relay));
            // Hold the control channel open for the session lifetime.
            let mut sink = [0u8; 64];
            while stream.read(&mut sink).await.unwrap_or(0) > 0 {}
            Ok(())
        }
        _ => {
            stream
                .write_all(&reply(7, SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)))
                .await
        }
    }
}

/// Server side of the RFC 1929 sub-negotiation.
async fn authenticate(
    stream: &mut TcpStream,
    expected_user: &str,
    expected_pass: &str,
) -> std::io::Result<bool> {
    let mut header = [0u8; 2];
    stream.read_exact(&mut header).await?;
    assert_eq!(header[0], 1, "client must send auth sub-negotiation v1");

    let mut user = vec![0u8; header[1] as usize];
    stream.read_exact(&mut user).await?;

    let mut pass_len = [0u8; 1];
    stream.read_exact(&mut pass_len).await?;
    let mut pass = vec![0u8; pass_len[0] as usize];
    stream.read_exact(&mut pass).await?;

    let ok = user == expected_user.as_bytes() && pass == expected_pass.as_bytes();
    stream.write_all(&[1, if ok { 0 } else { 1 }]).await?;
    Ok(ok)
}

/// Build a command reply with the given result code and bound address.
fn reply(code: u8, bound: SocketAddrV4) -> [u8; 10] {
    let mut reply = [0u8; 10];
    reply[0] = 5;
    reply[1] = code;
    reply[3] = 1;
    reply[4..8].copy_from_slice(&bound.ip().octets());
    reply[8..].copy_from_slice(&bound.port().to_be_bytes());
    reply
}

/// Echo every byte back on an established CONNECT stream.
async fn echo_tcp(mut stream: TcpStream) -> std::io::Result<()> {
    let mut buf = [0u8; 2048];
    loop {
        let received = stream.read(&mut buf).await?;
        if received == 0 {
            return Ok(());
        }
        stream.write_all(&buf[..received]).await?;
    }
}

/// Echo every relay frame back to its sender unchanged.
async fn echo_udp(relay: UdpSocket) {
    let mut buf = [0u8; 2048];
    while let Ok((received, source)) = relay.recv_from(&mut buf).await {
        let _ = relay.send_to(&buf[..received], source).await;
    }
}

fn v4(addr: SocketAddr) -> SocketAddrV4 {
    match addr {
        SocketAddr::V4(addr) => addr,
        SocketAddr::V6(_) => panic!("mock proxy binds IPv4 only"),
    }
}
