//! Client session module
//!
//! Owns session state and wires the protocol components together behind
//! the [`ProxyClient`] facade.

mod session;

pub use session::{ProxyClient, DEFAULT_HANDSHAKE_TIMEOUT};
