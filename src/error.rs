//! Error classification for SOCKS5 client sessions
//!
//! The whole library reports failures through a single closed table of
//! error codes. `Success` sits at index 0 so that a freshly created or
//! successfully connected session reports a clean state, followed by the
//! client-side failure categories and the eight reply codes a SOCKS5
//! server can return in a command reply (RFC 1928 section 6).

use thiserror::Error;

/// Number of entries in the error table, `Success` included.
pub const ERROR_TABLE_LEN: u8 = 19;

/// Classified outcome of the most recent proxy operation.
///
/// The table is closed: every failure path in the library records exactly
/// one of these values, and each value renders as a fixed human-readable
/// string. Reply codes received from the proxy map through
/// [`ProxyError::from_reply_code`], never through arithmetic on the
/// discriminant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProxyError {
    /// No failure recorded
    #[error("No error")]
    Success = 0,

    /// TCP connection to the proxy server could not be established
    #[error("Connection to proxy server attempt failed")]
    Connection,

    /// Send or receive on an open channel failed mid-handshake
    #[error("Error while sending data to the proxy server")]
    Network,

    /// A reply did not match the SOCKS5 wire format
    #[error("Response inconsistency with the protocol")]
    Protocol,

    /// The server selected an authentication method we did not offer
    #[error("Invalid authentication method")]
    AuthMethod,

    /// The UDP relay socket could not be created or bound
    #[error("Failed to create UDP socket")]
    UdpBind,

    /// Credentials required but not supplied
    #[error("Username and/or password not set")]
    Credentials,

    /// Allocation failure; kept for table fidelity, not produced in Rust
    #[error("Dynamic memory allocation error")]
    Memory,

    /// Destination host missing or trivial for a mode that requires one
    #[error("Destination host not specified (for CONNECT and BIND commands)")]
    DstHost,

    /// The proxy rejected the supplied username/password
    #[error("Invalid username and/or password from the proxy")]
    SignIn,

    /// Reply code 1: general SOCKS server failure
    #[error("General proxy error")]
    General,

    /// Reply code 2: connection not allowed by ruleset
    #[error("Connection not allowed by proxy server rule set")]
    RuleSet,

    /// Reply code 3: network unreachable from the proxy
    #[error("The network is unavailable on the side of the proxy server")]
    NetworkUnreachable,

    /// Reply code 4: host unreachable from the proxy
    #[error("Proxy server failed to connect to destination host")]
    HostUnreachable,

    /// Reply code 5: connection refused by the destination
    #[error("Connection refused")]
    ConnectionRefused,

    /// Reply code 6: TTL expired
    #[error("TTL expired")]
    TtlExpired,

    /// Reply code 7: command not supported by the proxy
    #[error("The command is not supported by the proxy server")]
    CommandNotSupported,

    /// Reply code 8: address type not supported by the proxy
    #[error("The specified address type is not supported by the proxy server")]
    AddressTypeNotSupported,

    /// Anything outside the defined table
    #[error("Unknown error")]
    Unknown,
}

/// Full error table in discriminant order, `Success` first.
pub const ERROR_TABLE: [ProxyError; ERROR_TABLE_LEN as usize] = [
    ProxyError::Success,
    ProxyError::Connection,
    ProxyError::Network,
    ProxyError::Protocol,
    ProxyError::AuthMethod,
    ProxyError::UdpBind,
    ProxyError::Credentials,
    ProxyError::Memory,
    ProxyError::DstHost,
    ProxyError::SignIn,
    ProxyError::General,
    ProxyError::RuleSet,
    ProxyError::NetworkUnreachable,
    ProxyError::HostUnreachable,
    ProxyError::ConnectionRefused,
    ProxyError::TtlExpired,
    ProxyError::CommandNotSupported,
    ProxyError::AddressTypeNotSupported,
    ProxyError::Unknown,
];

impl ProxyError {
    /// Map a command-reply result byte to its error classification.
    ///
    /// Code 0 is success; 1 through 8 are the failures RFC 1928 defines;
    /// anything above 8 is unassigned and maps to [`ProxyError::Unknown`].
    pub fn from_reply_code(code: u8) -> Self {
        match code {
            0 => ProxyError::Success,
            1 => ProxyError::General,
            2 => ProxyError::RuleSet,
            3 => ProxyError::NetworkUnreachable,
            4 => ProxyError::HostUnreachable,
            5 => ProxyError::ConnectionRefused,
            6 => ProxyError::TtlExpired,
            7 => ProxyError::CommandNotSupported,
            8 => ProxyError::AddressTypeNotSupported,
            _ => ProxyError::Unknown,
        }
    }

    /// Look up an error by its table index; out-of-range renders as Unknown.
    pub fn from_code(code: u8) -> Self {
        if code >= ERROR_TABLE_LEN {
            ProxyError::Unknown
        } else {
            ERROR_TABLE[code as usize]
        }
    }

    /// Table index of this error.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Fixed description for a raw error code.
    pub fn error_string(code: u8) -> String {
        Self::from_code(code).to_string()
    }
}

impl Default for ProxyError {
    fn default() -> Self {
        ProxyError::Success
    }
}
