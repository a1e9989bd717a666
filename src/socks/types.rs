//! SOCKS5 type definitions
//!
//! Core types shared by the negotiator, command executor and client
//! session: command kinds, authentication methods, credentials and the
//! relay readiness mask.

use super::consts::*;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// SOCKS5 command kinds with their wire-defined values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksCommand {
    /// TCP CONNECT - relay a byte stream to the destination
    Connect,
    /// TCP BIND - enumerated for completeness, never executed
    Bind,
    /// UDP ASSOCIATE - establish a UDP relay endpoint
    UdpAssociate,
}

impl SocksCommand {
    /// Convert SocksCommand to its wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            SocksCommand::Connect => SOCKS5_CMD_TCP_CONNECT,
            SocksCommand::Bind => SOCKS5_CMD_TCP_BIND,
            SocksCommand::UdpAssociate => SOCKS5_CMD_UDP_ASSOCIATE,
        }
    }

    /// Whether this command requires a concrete destination at connect time
    pub fn requires_destination(self) -> bool {
        matches!(self, SocksCommand::Connect | SocksCommand::Bind)
    }
}

impl fmt::Display for SocksCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocksCommand::Connect => write!(f, "CONNECT"),
            SocksCommand::Bind => write!(f, "BIND"),
            SocksCommand::UdpAssociate => write!(f, "UDP ASSOCIATE"),
        }
    }
}

/// Authentication method agreed with the proxy during negotiation.
///
/// Selected once per session; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// RFC 1929 username/password
    Password,
}

impl AuthMethod {
    /// Wire byte offered or selected for this method
    pub fn to_byte(self) -> u8 {
        match self {
            AuthMethod::None => SOCKS5_AUTH_METHOD_NONE,
            AuthMethod::Password => SOCKS5_AUTH_METHOD_PASSWORD,
        }
    }
}

/// Username/password pair for the RFC 1929 sub-negotiation.
///
/// Either field being empty means the pair is unusable and the session
/// negotiates as if no credentials were supplied. On the wire both fields
/// carry one-byte lengths, so values over 255 bytes are silently truncated
/// (an inherited limitation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username, at most 255 bytes on the wire
    pub username: String,
    /// Password, at most 255 bytes on the wire
    pub password: String,
}

impl Credentials {
    /// Create a credentials pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when either field is empty and negotiation falls back to no-auth
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

/// Readiness interests for [`wait`](crate::client::ProxyClient::wait) on
/// the UDP relay channel.
///
/// A bitmask over send and receive readiness. `wait` takes the requested
/// interests and rewrites the mask to the subset that became ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitMode(u32);

impl WaitMode {
    /// No interest / nothing ready
    pub const NONE: WaitMode = WaitMode(0);
    /// The relay channel can accept an outgoing datagram
    pub const SEND: WaitMode = WaitMode(1);
    /// The relay channel has an incoming datagram queued
    pub const RECEIVE: WaitMode = WaitMode(2);

    /// Whether this mask contains all bits of `other`
    pub fn contains(self, other: WaitMode) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Whether no interest is set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bitmask value
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for WaitMode {
    type Output = WaitMode;

    fn bitor(self, rhs: WaitMode) -> WaitMode {
        WaitMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for WaitMode {
    fn bitor_assign(&mut self, rhs: WaitMode) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for WaitMode {
    type Output = WaitMode;

    fn bitand(self, rhs: WaitMode) -> WaitMode {
        WaitMode(self.0 & rhs.0)
    }
}
