//! Frame layouts carried in the radio's payloads.
//!
//! Datagrams (on the datagram pipe) are prefixed with a [`Header`]:
//!
//! | offset | field | type |
//! |-------:|-------|------|
//! | 0 | destination port | `u16` LE |
//! | 2 | source node address | `u32` LE |
//! | 6 | source port | `u16` LE |
//!
//! A datagram whose payload is exactly [`REQUEST_LEN`] bytes, addressed to
//! a server or connection port, is a handshake [`Request`]:
//!
//! | offset | field | type |
//! |-------:|-------|------|
//! | 0 | [`Op`] | `u8` |
//! | 1 | parameter | `u16` LE |
//!
//! Connection data (on pipes 1 - 5) carries no header.

use crate::addr::SocketAddr;

/// The largest payload the radio carries.
pub const PAYLOAD_MAX: usize = 32;

/// The encoded size of a [`Header`].
pub const HEADER_LEN: usize = 8;

/// The encoded size of a [`Request`].
pub const REQUEST_LEN: usize = 3;

/// The largest datagram payload (after the [`Header`]).
pub const DATAGRAM_MAX: usize = PAYLOAD_MAX - HEADER_LEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub dest_port: u16,
    pub src: SocketAddr,
}

impl Header {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..2].copy_from_slice(&self.dest_port.to_le_bytes());
        buf[2..6].copy_from_slice(&self.src.addr.to_le_bytes());
        buf[6..8].copy_from_slice(&self.src.port.to_le_bytes());
        buf
    }

    /// Decode the header at the start of `buf`.
    ///
    /// Returns `None` if `buf` is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        Some(Self {
            dest_port: u16::from_le_bytes([buf[0], buf[1]]),
            src: SocketAddr::new(
                u32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]),
                u16::from_le_bytes([buf[6], buf[7]]),
            ),
        })
    }
}

/// Handshake operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    ConnectRequest = 1,
    ConnectResponse = 2,
    DisconnectRequest = 3,
    DisconnectResponse = 4,
}

impl Op {
    pub const fn from_bits(value: u8) -> Option<Self> {
        match value {
            1 => Some(Op::ConnectRequest),
            2 => Some(Op::ConnectResponse),
            3 => Some(Op::DisconnectRequest),
            4 => Some(Op::DisconnectResponse),
            _ => None,
        }
    }

    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for Op {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Op::ConnectRequest => defmt::write!(fmt, "CONNECT_REQUEST"),
            Op::ConnectResponse => defmt::write!(fmt, "CONNECT_RESPONSE"),
            Op::DisconnectRequest => defmt::write!(fmt, "DISCONNECT_REQUEST"),
            Op::DisconnectResponse => defmt::write!(fmt, "DISCONNECT_RESPONSE"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    pub op: Op,
    pub param: u16,
}

impl Request {
    pub const fn new(op: Op) -> Self {
        Self { op, param: 0 }
    }

    pub fn encode(&self) -> [u8; REQUEST_LEN] {
        let param = self.param.to_le_bytes();
        [self.op.into_bits(), param[0], param[1]]
    }

    /// Decode a request.
    ///
    /// Returns `None` unless `buf` is exactly [`REQUEST_LEN`] bytes
    /// and starts with a known [`Op`].
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() != REQUEST_LEN {
            return None;
        }
        Some(Self {
            op: Op::from_bits(buf[0])?,
            param: u16::from_le_bytes([buf[1], buf[2]]),
        })
    }
}
