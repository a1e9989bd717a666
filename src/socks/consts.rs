//! SOCKS5 protocol constants
//!
//! Wire-level constants used by the negotiator, command executor and
//! datagram codec.

/// SOCKS5 protocol version
pub const SOCKS5_VERSION: u8 = 0x05;

/// SOCKS5 username/password sub-negotiation version (RFC 1929)
pub const SOCKS5_AUTH_VERSION: u8 = 0x01;

// Authentication methods
/// No authentication required
pub const SOCKS5_AUTH_METHOD_NONE: u8 = 0x00;
/// Username/password authentication
pub const SOCKS5_AUTH_METHOD_PASSWORD: u8 = 0x02;
/// No acceptable methods
pub const SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE: u8 = 0xFF;

// Commands
/// TCP CONNECT command
pub const SOCKS5_CMD_TCP_CONNECT: u8 = 0x01;
/// TCP BIND command (enumerated, never executed)
pub const SOCKS5_CMD_TCP_BIND: u8 = 0x02;
/// UDP ASSOCIATE command
pub const SOCKS5_CMD_UDP_ASSOCIATE: u8 = 0x03;

// Address types
/// IPv4 address, the only type this client speaks
pub const SOCKS5_ADDR_TYPE_IPV4: u8 = 0x01;

/// Reserved byte value (always 0x00)
pub const SOCKS5_RESERVED: u8 = 0x00;

/// Reply status for a successful username/password sub-negotiation
pub const SOCKS5_AUTH_SUCCEEDED: u8 = 0x00;

/// Fixed length of an IPv4 command request and reply
pub const COMMAND_MESSAGE_LEN: usize = 10;

/// Length of the UDP relay datagram header for IPv4:
/// rsv(2) + frag(1) + atyp(1) + addr(4) + port(2)
pub const UDP_HEADER_LEN: usize = 10;

/// Maximum username/password length carried by a one-byte length field
pub const MAX_CREDENTIAL_LEN: usize = 255;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socks5_version() {
        assert_eq!(SOCKS5_VERSION, 5);
        assert_eq!(SOCKS5_AUTH_VERSION, 1);
    }

    #[test]
    fn test_auth_methods() {
        assert_eq!(SOCKS5_AUTH_METHOD_NONE, 0);
        assert_eq!(SOCKS5_AUTH_METHOD_PASSWORD, 2);
        assert_eq!(SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE, 255);
    }

    #[test]
    fn test_commands() {
        assert_eq!(SOCKS5_CMD_TCP_CONNECT, 1);
        assert_eq!(SOCKS5_CMD_TCP_BIND, 2);
        assert_eq!(SOCKS5_CMD_UDP_ASSOCIATE, 3);
    }

    #[test]
    fn test_message_lengths() {
        // ver + cmd + rsv + atyp + addr(4) + port(2)
        assert_eq!(COMMAND_MESSAGE_LEN, 10);
        // rsv(2) + frag + atyp + addr(4) + port(2)
        assert_eq!(UDP_HEADER_LEN, 10);
    }
}
