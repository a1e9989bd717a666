//! SOCKS5 protocol implementation
//!
//! The client side of RFC 1928: method negotiation with optional RFC 1929
//! username/password authentication, the CONNECT / UDP ASSOCIATE command
//! exchange, and the UDP relay datagram codec. Everything here is pure
//! protocol; socket ownership lives in [`crate::transport`] and session
//! orchestration in [`crate::client`].

mod command;
mod consts;
mod datagram;
mod handshake;
mod types;

pub use command::{decode_reply, encode_request, execute};
pub use consts::*;
pub use datagram::{decode_datagram, encode_datagram, Datagram};
pub use handshake::negotiate;
pub use types::{AuthMethod, Credentials, SocksCommand, WaitMode};
