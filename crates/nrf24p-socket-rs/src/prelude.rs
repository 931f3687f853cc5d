//! This module defines the traits that make up the socket device contract.
//!
//! ```
//! use nrf24p_socket::prelude::*;
//! ```

use crate::{
    addr::SocketAddr,
    device::{Client, Server},
    irq::IrqEvent,
    pipe_table::EndpointId,
};

/// The socket-like surface consumed by application code.
///
/// Nothing here waits on the air: a `true` (or non-zero) result means a
/// frame was queued, and the outcome of a handshake is reported later
/// through [`SocketHandler`].
pub trait Transport {
    type TransportErrorType;

    /// Is a received payload waiting?
    fn available(&mut self) -> Result<bool, Self::TransportErrorType>;

    /// Send a datagram from the local `src_port` to `dest`.
    ///
    /// At most [`DATAGRAM_MAX`](crate::wire::DATAGRAM_MAX) bytes of `buf` are sent.
    /// Returns the number of payload bytes queued; `0` if the TX FIFO is full
    /// or `buf` is empty (nothing is sent then).
    fn send(
        &mut self,
        src_port: u16,
        buf: &[u8],
        dest: SocketAddr,
    ) -> Result<u8, Self::TransportErrorType>;

    /// Poll for a datagram.
    ///
    /// Returns `0` if the payload at the head of the RX FIFO is not a
    /// datagram (or the FIFO is empty). Handshake requests are not
    /// interpreted here; use [`Dispatchable::on_event()`] for that.
    fn recv(
        &mut self,
        buf: &mut [u8],
        dest_port: &mut u16,
        src: &mut SocketAddr,
    ) -> Result<u8, Self::TransportErrorType>;

    /// Request a connection to a `server`.
    ///
    /// The `client` is attached to a free pipe if it is not attached yet.
    /// Returns `true` if the request was queued; the connection is
    /// established when [`SocketHandler::on_connected()`] is called.
    fn connect(
        &mut self,
        client: &mut Client,
        server: SocketAddr,
    ) -> Result<bool, Self::TransportErrorType>;

    /// Close the endpoint behind `id`.
    ///
    /// A connected endpoint asks its peer to disconnect and is detached once
    /// the peer responds. Any other endpoint is detached immediately, so
    /// calling this again on a disconnecting endpoint (after the caller's
    /// timeout) frees its pipe without waiting for the peer.
    /// Returns `false` if `id` is stale or the request could not be queued.
    fn disconnect(&mut self, id: EndpointId) -> Result<bool, Self::TransportErrorType>;

    /// Accept connection requests addressed to the `server`'s port.
    ///
    /// Returns `false` if another server already listens on the same port.
    fn listen(&mut self, server: &mut Server) -> Result<bool, Self::TransportErrorType>;

    /// Send `buf` (up to 32 bytes) over the connection behind `id`.
    fn send_connected(
        &mut self,
        id: EndpointId,
        buf: &[u8],
    ) -> Result<u8, Self::TransportErrorType>;

    /// Poll for a payload received over the connection behind `id`.
    fn recv_connected(
        &mut self,
        id: EndpointId,
        buf: &mut [u8],
    ) -> Result<u8, Self::TransportErrorType>;
}

/// Task-context processing of the tokens posted by the
/// [`IrqBridge`](crate::irq::IrqBridge).
pub trait Dispatchable {
    type DispatchErrorType;

    /// Drain every pending payload, running the handshake and delivering
    /// data to the `handler`.
    fn on_event<H: SocketHandler>(
        &mut self,
        event: IrqEvent,
        handler: &mut H,
    ) -> Result<(), Self::DispatchErrorType>;
}

/// Application callbacks. Every callback defaults to doing nothing.
#[allow(unused_variables)]
pub trait SocketHandler {
    /// A datagram for the local `dest_port` arrived from `src`.
    fn on_datagram(&mut self, dest_port: u16, payload: &[u8], src: SocketAddr) {}

    /// A payload arrived over the connection behind `id`.
    fn on_data(&mut self, id: EndpointId, payload: &[u8]) {}

    /// Should the server listening on `server_port` accept a connection from `src`?
    fn on_connect_request(&mut self, server_port: u16, src: SocketAddr) -> bool {
        true
    }

    /// The connection behind `id` is established with `peer`.
    fn on_connected(&mut self, id: EndpointId, peer: SocketAddr) {}

    /// The connection behind `id` was closed and its pipe released.
    fn on_disconnected(&mut self, id: EndpointId) {}
}
