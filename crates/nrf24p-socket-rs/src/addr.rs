//! Node and port addressing.
//!
//! A node is identified by a 32 bit address. Each of the radio's receive
//! pipes is reachable at a 5 byte pipe address made from the pipe number
//! followed by the node address (little endian):
//!
//! | byte | 0 | 1 - 4 |
//! |------|---|-------|
//! | value | pipe | node address |
//!
//! The first byte is the least significant byte the chip matches on, so
//! pipes 2 - 5 (which only store 1 byte) share the node address with pipe 1.

use core::fmt::{Display, Formatter, Result};

/// The first port of the range bound to connection endpoints.
///
/// A connection endpoint on pipe `n` uses port `DYNAMIC_PORT + n`.
/// Ports below this value are free for datagram services and servers.
pub const DYNAMIC_PORT: u16 = 49152;

/// The pipe reserved for datagrams and the connection handshake.
pub const DATAGRAM_PIPE: u8 = 0;

/// The number of the radio's receive pipes.
pub const PIPE_COUNT: u8 = 6;

/// A socket address: a node address plus a port on that node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SocketAddr {
    pub addr: u32,
    pub port: u16,
}

impl SocketAddr {
    pub const fn new(addr: u32, port: u16) -> Self {
        Self { addr, port }
    }
}

impl Display for SocketAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:#010X}:{}", self.addr, self.port)
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for SocketAddr {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=u32:#010X}:{=u16}", self.addr, self.port)
    }
}

/// The 5 byte address of `pipe` on the `node`.
///
/// Pipes 2 - 5 differ from pipe 1 only by the pipe number in the first byte.
/// This mirrors the chip's addressing, but it means nodes must not be
/// numbered in a way that makes a pipe address of one node equal to a pipe
/// address of another.
pub const fn pipe_address(node: u32, pipe: u8) -> [u8; 5] {
    let bytes = node.to_le_bytes();
    [pipe, bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// The port of a connection endpoint bound to `pipe`.
pub const fn connection_port(pipe: u8) -> u16 {
    DYNAMIC_PORT + pipe as u16
}

/// The pipe a connection `port` is bound to.
///
/// Returns `None` if the `port` is not one of the ports for pipes 1 - 5.
pub const fn connection_pipe(port: u16) -> Option<u8> {
    if port > DYNAMIC_PORT && port < DYNAMIC_PORT + PIPE_COUNT as u16 {
        Some((port - DYNAMIC_PORT) as u8)
    } else {
        None
    }
}
