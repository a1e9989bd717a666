//! SOCKS5 method negotiation and authentication sub-negotiation
//!
//! Runs the client side of the RFC 1928 method selection exchange and,
//! when the server picks username/password, the RFC 1929 sub-negotiation.
//!
//! # Method selection
//!
//! Client sends:
//! ```text
//! +----+----------+----------+
//! |VER | NMETHODS | METHODS  |
//! +----+----------+----------+
//! | 1  |    1     | 1 to 255 |
//! +----+----------+----------+
//! ```
//!
//! Server responds:
//! ```text
//! +----+--------+
//! |VER | METHOD |
//! +----+--------+
//! | 1  |   1    |
//! +----+--------+
//! ```
//!
//! This client always offers exactly one method: no-auth when no usable
//! credentials are supplied, username/password otherwise.

use crate::error::ProxyError;
use crate::socks::consts::*;
use crate::socks::types::{AuthMethod, Credentials};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Negotiate an authentication method with the proxy and complete the
/// selected sub-negotiation.
///
/// Returns the method the session ended up authenticated under. The caller
/// owns the stream and is responsible for closing it on error; this
/// function never leaves unread negotiation bytes behind on success.
///
/// A server that picks no-auth even though password was offered is
/// accepted, matching common proxy behavior.
pub async fn negotiate<S>(
    stream: &mut S,
    credentials: Option<&Credentials>,
) -> Result<AuthMethod, ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let offered = match credentials {
        Some(creds) if !creds.is_empty() => AuthMethod::Password,
        _ => AuthMethod::None,
    };

    stream
        .write_all(&[SOCKS5_VERSION, 1, offered.to_byte()])
        .await
        .map_err(|_| ProxyError::Network)?;

    let mut reply = [0u8; 2];
    stream
        .read_exact(&mut reply)
        .await
        .map_err(|_| ProxyError::Network)?;

    if reply[0] != SOCKS5_VERSION {
        return Err(ProxyError::Protocol);
    }

    match (reply[1], credentials) {
        (SOCKS5_AUTH_METHOD_NONE, _) => {
            tracing::debug!("proxy selected no-auth");
            Ok(AuthMethod::None)
        }
        (SOCKS5_AUTH_METHOD_PASSWORD, Some(creds)) if offered == AuthMethod::Password => {
            authenticate_password(stream, creds).await?;
            tracing::debug!("proxy accepted username/password auth");
            Ok(AuthMethod::Password)
        }
        (method, _) => {
            tracing::debug!(method, "proxy selected an unusable auth method");
            Err(ProxyError::AuthMethod)
        }
    }
}

/// Run the RFC 1929 username/password sub-negotiation.
///
/// ```text
/// +----+------+----------+------+----------+
/// |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
/// +----+------+----------+------+----------+
/// | 1  |  1   | 1 to 255 |  1   | 1 to 255 |
/// +----+------+----------+------+----------+
/// ```
///
/// Both length fields are a single byte; longer values are silently
/// truncated to 255 bytes.
async fn authenticate_password<S>(stream: &mut S, creds: &Credentials) -> Result<(), ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = build_auth_request(&creds.username, &creds.password);
    stream
        .write_all(&request)
        .await
        .map_err(|_| ProxyError::Network)?;

    let mut reply = [0u8; 2];
    stream
        .read_exact(&mut reply)
        .await
        .map_err(|_| ProxyError::Network)?;

    if reply[0] != SOCKS5_AUTH_VERSION {
        return Err(ProxyError::Protocol);
    }
    if reply[1] != SOCKS5_AUTH_SUCCEEDED {
        return Err(ProxyError::SignIn);
    }

    Ok(())
}

/// Serialize the sub-negotiation request, truncating both fields to the
/// one-byte length limit.
fn build_auth_request(username: &str, password: &str) -> Vec<u8> {
    let user = &username.as_bytes()[..username.len().min(MAX_CREDENTIAL_LEN)];
    let pass = &password.as_bytes()[..password.len().min(MAX_CREDENTIAL_LEN)];

    let mut request = Vec::with_capacity(3 + user.len() + pass.len());
    request.push(SOCKS5_AUTH_VERSION);
    request.push(user.len() as u8);
    request.extend_from_slice(user);
    request.push(pass.len() as u8);
    request.extend_from_slice(pass);
    request
}
