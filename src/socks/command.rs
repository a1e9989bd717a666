//! SOCKS5 command request/reply exchange
//!
//! Builds and sends the fixed-size IPv4 command request and parses the
//! reply, mapping failure codes through the error table.
//!
//! # Request / reply format
//!
//! ```text
//! +----+-----+-------+------+----------+----------+
//! |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
//! +----+-----+-------+------+----------+----------+
//! | 1  |  1  | X'00' |  1   |    4     |    2     |
//! +----+-----+-------+------+----------+----------+
//! ```
//!
//! The reply carries a result code in place of CMD and the bound
//! address/port the proxy allocated. Only ATYP = IPv4 is spoken; both
//! messages are exactly [`COMMAND_MESSAGE_LEN`] bytes.

use crate::error::ProxyError;
use crate::socks::consts::*;
use crate::socks::types::SocksCommand;
use std::net::{Ipv4Addr, SocketAddrV4};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// Field offsets shared by request and reply.
const OFFSET_VERSION: usize = 0;
const OFFSET_COMMAND: usize = 1;
const OFFSET_RESERVED: usize = 2;
const OFFSET_ADDR_TYPE: usize = 3;
const OFFSET_ADDR: usize = 4;
const OFFSET_PORT: usize = 8;

/// Send a command request and parse the proxy's reply.
///
/// `dest` defaults to 0.0.0.0:0 when absent, which is only meaningful for
/// UDP ASSOCIATE (the proxy then accepts datagrams from the client's
/// source address). Returns the bound address/port from the reply.
pub async fn execute<S>(
    stream: &mut S,
    command: SocksCommand,
    dest: Option<SocketAddrV4>,
) -> Result<SocketAddrV4, ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let dest = dest.unwrap_or_else(|| SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    let request = encode_request(command, dest);

    stream
        .write_all(&request)
        .await
        .map_err(|_| ProxyError::Network)?;

    let mut reply = [0u8; COMMAND_MESSAGE_LEN];
    stream
        .read_exact(&mut reply)
        .await
        .map_err(|_| ProxyError::Network)?;

    let bound = decode_reply(&reply)?;
    tracing::debug!(%command, %bound, "command accepted by proxy");
    Ok(bound)
}

/// Serialize a command request into its fixed 10-byte wire form.
pub fn encode_request(command: SocksCommand, dest: SocketAddrV4) -> [u8; COMMAND_MESSAGE_LEN] {
    let mut request = [0u8; COMMAND_MESSAGE_LEN];
    request[OFFSET_VERSION] = SOCKS5_VERSION;
    request[OFFSET_COMMAND] = command.to_byte();
    request[OFFSET_RESERVED] = SOCKS5_RESERVED;
    request[OFFSET_ADDR_TYPE] = SOCKS5_ADDR_TYPE_IPV4;
    request[OFFSET_ADDR..OFFSET_PORT].copy_from_slice(&dest.ip().octets());
    request[OFFSET_PORT..].copy_from_slice(&dest.port().to_be_bytes());
    request
}

/// Parse a command reply, mapping the result byte through the error table.
///
/// The version byte is checked before the result code, so a malformed
/// reply surfaces as [`ProxyError::Protocol`] even when its result byte
/// happens to be zero.
pub fn decode_reply(reply: &[u8; COMMAND_MESSAGE_LEN]) -> Result<SocketAddrV4, ProxyError> {
    if reply[OFFSET_VERSION] != SOCKS5_VERSION {
        return Err(ProxyError::Protocol);
    }

    match ProxyError::from_reply_code(reply[OFFSET_COMMAND]) {
        ProxyError::Success => {}
        error => return Err(error),
    }

    let ip = Ipv4Addr::new(
        reply[OFFSET_ADDR],
        reply[OFFSET_ADDR + 1],
        reply[OFFSET_ADDR + 2],
        reply[OFFSET_ADDR + 3],
    );
    let port = u16::from_be_bytes([reply[OFFSET_PORT], reply[OFFSET_PORT + 1]]);
    Ok(SocketAddrV4::new(ip, port))
}
