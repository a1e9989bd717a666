//! UDP relay datagram encoding and decoding
//!
//! Every datagram exchanged with the proxy's relay endpoint carries a
//! fixed IPv4 header in front of the payload:
//!
//! ```text
//! +----+------+------+----------+----------+----------+
//! |RSV | FRAG | ATYP | DST.ADDR | DST.PORT |   DATA   |
//! +----+------+------+----------+----------+----------+
//! | 2  |  1   |  1   |    4     |    2     | Variable |
//! +----+------+------+----------+----------+----------+
//! ```
//!
//! Outgoing frames always carry FRAG = 0. Incoming frames with a non-zero
//! fragment number are handed to the caller unmodified; this client never
//! reassembles fragments. Header fields are read and written with explicit
//! big-endian accessors, never through in-memory struct layout.

use crate::socks::consts::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::net::{Ipv4Addr, SocketAddrV4};

/// A decoded relay datagram: header fields plus the trailing payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    /// Fragment number from the header; non-zero frames are passed through
    pub frag: u8,
    /// Source (incoming) or destination (outgoing) address carried in the
    /// header, parsed big-endian from the wire fields
    pub addr: SocketAddrV4,
    /// Application payload
    pub payload: Bytes,
}

/// Prepend the relay header to an outgoing payload.
///
/// The result is addressed to the proxy's relay endpoint; the destination
/// in the header tells the proxy where to deliver the payload.
pub fn encode_datagram(payload: &[u8], dest: SocketAddrV4) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(UDP_HEADER_LEN + payload.len());
    buf.put_u16(0); // RSV
    buf.put_u8(0); // FRAG
    buf.put_u8(SOCKS5_ADDR_TYPE_IPV4);
    buf.put_slice(&dest.ip().octets());
    buf.put_u16(dest.port());
    buf.put_slice(payload);
    buf.to_vec()
}

/// Strip the relay header from an incoming datagram.
///
/// Returns `None` when the datagram is not strictly longer than the
/// header, which callers treat as no data. Header fields are returned
/// verbatim; nothing is validated, matching the pass-through contract for
/// fragmented or oddly-typed frames.
pub fn decode_datagram(data: &[u8]) -> Option<Datagram> {
    if data.len() <= UDP_HEADER_LEN {
        return None;
    }

    let mut buf = data;
    let _rsv = buf.get_u16();
    let frag = buf.get_u8();
    let _atyp = buf.get_u8();
    let ip = Ipv4Addr::from(buf.get_u32());
    let port = buf.get_u16();

    Some(Datagram {
        frag,
        addr: SocketAddrV4::new(ip, port),
        payload: Bytes::copy_from_slice(buf),
    })
}
