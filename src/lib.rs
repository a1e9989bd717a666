//! # Sockstream - SOCKS5 Client Library
//!
//! Sockstream is a client-side implementation of the SOCKS5 proxy
//! protocol (RFC 1928) supporting the CONNECT and UDP ASSOCIATE commands
//! over IPv4, with optional username/password authentication (RFC 1929).
//!
//! ## Features
//!
//! - **CONNECT**: relay a TCP byte stream through the proxy
//! - **UDP ASSOCIATE**: relay UDP datagrams through the proxy's relay
//!   endpoint, with non-blocking receive and readiness polling
//! - **Username/password authentication**: negotiated per session
//! - **Bounded handshake**: the whole connect sequence runs under a
//!   cancellable timeout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sockstream::{ProxyClient, SocksCommand};
//! use std::net::{Ipv4Addr, SocketAddrV4};
//!
//! #[tokio::main]
//! async fn main() {
//!     let proxy = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 1080);
//!     let dest = SocketAddrV4::new(Ipv4Addr::new(28, 28, 28, 28), 2727);
//!
//!     let mut client = ProxyClient::new();
//!     if client
//!         .connect(proxy, None, SocksCommand::UdpAssociate, None)
//!         .await
//!     {
//!         client.send(b"TEST_PACKET\0", Some(dest)).await;
//!     } else {
//!         eprintln!("proxy connection error: {}", client.last_error());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ProxyClient -> negotiate -> execute -> Established
//!                (auth)       (command)
//!
//! CONNECT:        send/read on the TCP control channel
//! UDP ASSOCIATE:  send/read via datagram codec + UDP relay channel
//! ```
//!
//! Errors never propagate as panics or results across the facade:
//! operations return `false` or `-1` and the classified cause stays
//! queryable through [`ProxyClient::last_error`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod error;
pub mod socks;
pub mod transport;

// Re-export commonly used items
pub use client::ProxyClient;
pub use error::{ProxyError, ERROR_TABLE, ERROR_TABLE_LEN};
pub use socks::{AuthMethod, Credentials, SocksCommand, WaitMode};

/// Version of the Sockstream library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the library
pub const NAME: &str = env!("CARGO_PKG_NAME");
