use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use nrf24p::{
    radio::{prelude::*, Nrf24Error, Nrf24p},
    StatusFlags,
};

use crate::{
    addr::{connection_pipe, connection_port, pipe_address, SocketAddr, DATAGRAM_PIPE, DYNAMIC_PORT},
    irq::IrqEvent,
    pipe_table::{Endpoint, EndpointId, EndpointState, PipeTable, Role},
    prelude::{Dispatchable, SocketHandler, Transport},
    wire::{Header, Op, Request, DATAGRAM_MAX, HEADER_LEN, PAYLOAD_MAX, REQUEST_LEN},
};

/// An collection of error types to describe socket failures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SocketError<SPI, DO> {
    /// Represents an error from the radio.
    Radio(Nrf24Error<SPI, DO>),
    /// All 5 connection pipes are attached.
    NoFreePipe,
    /// The endpoint is stale or not connected.
    NotConnected,
}

impl<SPI, DO> From<Nrf24Error<SPI, DO>> for SocketError<SPI, DO> {
    fn from(value: Nrf24Error<SPI, DO>) -> Self {
        SocketError::Radio(value)
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl<SPI, DO> defmt::Format for SocketError<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SocketError::Radio(err) => defmt::write!(fmt, "radio: {}", err),
            SocketError::NoFreePipe => defmt::write!(fmt, "no free pipe"),
            SocketError::NotConnected => defmt::write!(fmt, "not connected"),
        }
    }
}

/// An application-owned handle for the initiating side of a connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Client {
    pub(crate) id: Option<EndpointId>,
}

impl Client {
    pub const fn new() -> Self {
        Self { id: None }
    }

    /// The endpoint this client was attached to (by
    /// [`Transport::connect()`]), if any.
    pub const fn id(&self) -> Option<EndpointId> {
        self.id
    }
}

/// An application-owned handle for a server accepting connections on a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Server {
    port: u16,
    pub(crate) id: Option<EndpointId>,
}

impl Server {
    /// The `port` must be below [`DYNAMIC_PORT`].
    pub const fn new(port: u16) -> Self {
        Self { port, id: None }
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub const fn id(&self) -> Option<EndpointId> {
        self.id
    }
}

/// The socket layer of one node.
///
/// It owns the radio and the table of attached endpoints; nothing in it is
/// touched from interrupt context.
pub struct SocketDevice<SPI, DO, DELAY> {
    radio: Nrf24p<SPI, DO, DELAY>,
    addr: u32,
    pub(crate) table: PipeTable,
}

impl<SPI, DO, DELAY> SocketDevice<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(radio: Nrf24p<SPI, DO, DELAY>, addr: u32) -> Self {
        Self {
            radio,
            addr,
            table: PipeTable::new(),
        }
    }

    /// Power up the radio and start listening on the datagram pipe.
    pub fn begin(&mut self) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        self.radio.set_powerup_mode()?;
        // pipes 2 - 5 borrow the upper address bytes of pipe 1
        self.radio.write_rx_address(1, &pipe_address(self.addr, 1))?;
        self.radio
            .set_receiver_mode(&pipe_address(self.addr, DATAGRAM_PIPE))?;
        self.radio.flush()?;
        Ok(())
    }

    /// Stop listening. Attached endpoints are kept.
    pub fn end(&mut self) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        self.radio.set_standby_mode()?;
        Ok(())
    }

    /// This node's address.
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// The radio, for link-quality polling
    /// ([`RadioStatus::is_max_retransmit()`], [`RadioStatus::is_max_lost()`]).
    pub fn radio(&self) -> &Nrf24p<SPI, DO, DELAY> {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut Nrf24p<SPI, DO, DELAY> {
        &mut self.radio
    }

    pub fn pipes(&self) -> &PipeTable {
        &self.table
    }

    /// The state of the endpoint behind `id`.
    pub fn state(&self, id: EndpointId) -> EndpointState {
        self.table.state(id)
    }

    /// The remote socket of the endpoint behind `id`.
    pub fn peer(&self, id: EndpointId) -> Option<SocketAddr> {
        match self.table.get(id) {
            Some(endpoint) if matches!(endpoint.role, Role::Client | Role::Service { .. }) => {
                Some(endpoint.peer)
            }
            _ => None,
        }
    }

    /// The local socket of the endpoint behind `id`.
    pub fn local_addr(&self, id: EndpointId) -> Option<SocketAddr> {
        self.table
            .port(id)
            .map(|port| SocketAddr::new(self.addr, port))
    }

    /// Bind `endpoint` to a free pipe and enable the pipe's address.
    pub(crate) fn attach(
        &mut self,
        endpoint: Endpoint,
    ) -> Result<EndpointId, SocketError<SPI::Error, DO::Error>> {
        let Some(id) = self.table.allocate(endpoint) else {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::warn!("no free pipe to attach {}", endpoint.state);
            return Err(SocketError::NoFreePipe);
        };
        if let Err(err) = self
            .radio
            .open_rx_pipe(id.pipe(), &pipe_address(self.addr, id.pipe()))
        {
            self.table.release(id);
            return Err(err.into());
        }
        Ok(id)
    }

    /// Disable the pipe of `id` and free it. Does nothing if `id` is stale.
    pub(crate) fn detach(
        &mut self,
        id: EndpointId,
    ) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        if self.table.release(id) {
            self.radio.close_rx_pipe(id.pipe())?;
        }
        Ok(())
    }

    /// Queue a `frame` for the pipe `address`, then listen on the datagram pipe again.
    fn transmit(
        &mut self,
        address: [u8; 5],
        frame: &[u8],
    ) -> Result<u8, SocketError<SPI::Error, DO::Error>> {
        if self.radio.is_max_retransmit()? {
            // the unacknowledged frame is still at the head of the TX FIFO
            self.radio.flush_tx()?;
            self.radio
                .clear_status_flags(StatusFlags::default().with_max_rt(true))?;
        } else if !self.radio.is_ready()? {
            return Ok(0);
        }
        self.radio.set_transmitter_mode(&address)?;
        let sent = self.radio.send(frame);
        // back to listening even if the payload was not queued
        self.radio
            .set_receiver_mode(&pipe_address(self.addr, DATAGRAM_PIPE))?;
        Ok(sent?)
    }

    /// Send a handshake request from the local `src_port` to `dest`.
    pub(crate) fn send_request(
        &mut self,
        src_port: u16,
        op: Op,
        dest: SocketAddr,
    ) -> Result<bool, SocketError<SPI::Error, DO::Error>> {
        let sent = self.send(src_port, &Request::new(op).encode(), dest)?;
        Ok(sent as usize == REQUEST_LEN)
    }

    /// Is `port` a port the handshake is run on?
    fn is_control_port(&self, port: u16) -> bool {
        connection_pipe(port).is_some() || self.table.find_server(port).is_some()
    }

    fn dispatch_datagram<H: SocketHandler>(
        &mut self,
        frame: &[u8],
        handler: &mut H,
    ) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        let Some(header) = Header::decode(frame) else {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::debug!("dropped a {=usize} byte datagram", frame.len());
            return Ok(());
        };
        let payload = &frame[HEADER_LEN..];
        if let Some(request) = Request::decode(payload) {
            if self.is_control_port(header.dest_port) {
                return self.on_request(header, request, handler);
            }
        }
        handler.on_datagram(header.dest_port, payload, header.src);
        Ok(())
    }

    fn dispatch_connected<H: SocketHandler>(&mut self, pipe: u8, payload: &[u8], handler: &mut H) {
        match self.table.at_pipe(pipe) {
            Some(id) if self.table.state(id) == EndpointState::Connected => {
                handler.on_data(id, payload)
            }
            _ => {
                #[cfg(all(feature = "defmt", target_os = "none"))]
                defmt::debug!("dropped data on pipe {=u8} without a connection", pipe);
            }
        }
    }
}

impl<SPI, DO, DELAY> Transport for SocketDevice<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type TransportErrorType = SocketError<SPI::Error, DO::Error>;

    fn available(&mut self) -> Result<bool, Self::TransportErrorType> {
        Ok(self.radio.available()?)
    }

    fn send(
        &mut self,
        src_port: u16,
        buf: &[u8],
        dest: SocketAddr,
    ) -> Result<u8, Self::TransportErrorType> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(DATAGRAM_MAX);
        let header = Header {
            dest_port: dest.port,
            src: SocketAddr::new(self.addr, src_port),
        };
        let mut frame = [0u8; PAYLOAD_MAX];
        frame[..HEADER_LEN].copy_from_slice(&header.encode());
        frame[HEADER_LEN..(HEADER_LEN + len)].copy_from_slice(&buf[..len]);
        let sent = self.transmit(
            pipe_address(dest.addr, DATAGRAM_PIPE),
            &frame[..(HEADER_LEN + len)],
        )?;
        Ok(if sent == 0 { 0 } else { len as u8 })
    }

    fn recv(
        &mut self,
        buf: &mut [u8],
        dest_port: &mut u16,
        src: &mut SocketAddr,
    ) -> Result<u8, Self::TransportErrorType> {
        self.radio.update()?;
        let mut status = StatusFlags::default();
        self.radio.get_status_flags(&mut status);
        if status.rx_pipe() != DATAGRAM_PIPE {
            return Ok(0);
        }
        let mut frame = [0u8; PAYLOAD_MAX];
        let mut pipe = DATAGRAM_PIPE;
        let count = self.radio.recv(&mut frame, &mut pipe)? as usize;
        let Some(header) = Header::decode(&frame[..count]) else {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::debug!("dropped a {=usize} byte datagram", count);
            return Ok(0);
        };
        let len = (count - HEADER_LEN).min(buf.len());
        buf[..len].copy_from_slice(&frame[HEADER_LEN..(HEADER_LEN + len)]);
        *dest_port = header.dest_port;
        *src = header.src;
        Ok(len as u8)
    }

    fn connect(
        &mut self,
        client: &mut Client,
        server: SocketAddr,
    ) -> Result<bool, Self::TransportErrorType> {
        let id = match client.id {
            Some(id) if self.table.get(id).is_some() => id,
            _ => self.attach(Endpoint::new(Role::Client, EndpointState::Idle))?,
        };
        client.id = Some(id);
        if !matches!(
            self.table.state(id),
            EndpointState::Idle | EndpointState::Connecting
        ) {
            return Ok(false);
        }
        if !self.send_request(connection_port(id.pipe()), Op::ConnectRequest, server)? {
            return Ok(false);
        }
        if let Some(endpoint) = self.table.get_mut(id) {
            endpoint.peer = server;
            endpoint.state = EndpointState::Connecting;
        }
        Ok(true)
    }

    fn disconnect(&mut self, id: EndpointId) -> Result<bool, Self::TransportErrorType> {
        let Some(endpoint) = self.table.get(id).copied() else {
            return Ok(false);
        };
        match endpoint.state {
            EndpointState::Connected => {
                if !self.send_request(
                    connection_port(id.pipe()),
                    Op::DisconnectRequest,
                    endpoint.peer,
                )? {
                    return Ok(false);
                }
                if let Some(endpoint) = self.table.get_mut(id) {
                    endpoint.state = EndpointState::Disconnecting;
                }
                Ok(true)
            }
            // a Disconnecting peer never answered; give up on it
            _ => {
                self.detach(id)?;
                Ok(true)
            }
        }
    }

    fn listen(&mut self, server: &mut Server) -> Result<bool, Self::TransportErrorType> {
        if let Some(id) = server.id {
            if self.table.get(id).is_some() {
                return Ok(true);
            }
        }
        if server.port >= DYNAMIC_PORT || self.table.find_server(server.port).is_some() {
            return Ok(false);
        }
        let id = self.attach(Endpoint::new(
            Role::Server { port: server.port },
            EndpointState::Listening,
        ))?;
        server.id = Some(id);
        Ok(true)
    }

    fn send_connected(
        &mut self,
        id: EndpointId,
        buf: &[u8],
    ) -> Result<u8, Self::TransportErrorType> {
        let peer = match self.table.get(id) {
            Some(endpoint) if endpoint.state == EndpointState::Connected => endpoint.peer,
            _ => return Err(SocketError::NotConnected),
        };
        let Some(pipe) = connection_pipe(peer.port) else {
            return Err(SocketError::NotConnected);
        };
        let len = buf.len().min(PAYLOAD_MAX);
        self.transmit(pipe_address(peer.addr, pipe), &buf[..len])
    }

    fn recv_connected(
        &mut self,
        id: EndpointId,
        buf: &mut [u8],
    ) -> Result<u8, Self::TransportErrorType> {
        if self.table.state(id) != EndpointState::Connected {
            return Err(SocketError::NotConnected);
        }
        self.radio.update()?;
        let mut status = StatusFlags::default();
        self.radio.get_status_flags(&mut status);
        if status.rx_pipe() != id.pipe() {
            return Ok(0);
        }
        let mut pipe = id.pipe();
        Ok(self.radio.recv(buf, &mut pipe)?)
    }
}

impl<SPI, DO, DELAY> Dispatchable for SocketDevice<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DispatchErrorType = SocketError<SPI::Error, DO::Error>;

    fn on_event<H: SocketHandler>(
        &mut self,
        event: IrqEvent,
        handler: &mut H,
    ) -> Result<(), Self::DispatchErrorType> {
        match event {
            IrqEvent::DataReady => (),
        }
        let mut frame = [0u8; PAYLOAD_MAX];
        loop {
            let mut pipe = DATAGRAM_PIPE;
            let count = match self.radio.recv(&mut frame, &mut pipe) {
                Ok(0) => return Ok(()),
                Ok(count) => count as usize,
                // the RX FIFO was flushed; nothing is left to drain
                Err(Nrf24Error::BinaryCorruption) => continue,
                Err(err) => return Err(err.into()),
            };
            if pipe == DATAGRAM_PIPE {
                self.dispatch_datagram(&frame[..count], handler)?;
            } else {
                self.dispatch_connected(pipe, &frame[..count], handler);
            }
        }
    }
}
