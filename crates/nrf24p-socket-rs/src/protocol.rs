//! The connection handshake run over the datagram pipe.
//!
//! ```text
//! client (pipe c)                       server node
//!   | CONNECT_REQUEST    (port c -> server port)  |
//!   |-------------------------------------------->| attach a service on pipe s
//!   | CONNECT_RESPONSE   (port s -> port c)       |
//!   |<--------------------------------------------|
//!   | data on pipe s                  data on pipe c
//! ```
//!
//! Either side may then send DISCONNECT_REQUEST. The receiver answers with
//! DISCONNECT_RESPONSE and detaches; the requester detaches when the
//! response arrives.

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    addr::{connection_pipe, connection_port},
    device::{SocketDevice, SocketError},
    pipe_table::{Endpoint, EndpointId, EndpointState, Role},
    prelude::SocketHandler,
    wire::{Header, Op, Request},
};

impl<SPI, DO, DELAY> SocketDevice<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub(crate) fn on_request<H: SocketHandler>(
        &mut self,
        header: Header,
        request: Request,
        handler: &mut H,
    ) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        #[cfg(all(feature = "defmt", target_os = "none"))]
        defmt::debug!("{} from {}", request.op, header.src);
        match request.op {
            Op::ConnectRequest => self.on_connect_request(header, handler),
            Op::ConnectResponse => {
                self.on_connect_response(header, handler);
                Ok(())
            }
            Op::DisconnectRequest => self.on_disconnect_request(header, handler),
            Op::DisconnectResponse => self.on_disconnect_response(header, handler),
        }
    }

    fn on_connect_request<H: SocketHandler>(
        &mut self,
        header: Header,
        handler: &mut H,
    ) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        let server_port = header.dest_port;
        if self.table.find_server(server_port).is_none()
            || connection_pipe(header.src.port).is_none()
        {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::debug!("no server for a request to port {=u16}", server_port);
            return Ok(());
        }

        // the client did not get the response and asked again
        if let Some(id) = self.table.find_service(server_port, header.src) {
            self.send_request(connection_port(id.pipe()), Op::ConnectResponse, header.src)?;
            return Ok(());
        }

        if !handler.on_connect_request(server_port, header.src) {
            return Ok(());
        }
        let mut service = Endpoint::new(Role::Service { server_port }, EndpointState::Connected);
        service.peer = header.src;
        let id = match self.attach(service) {
            Ok(id) => id,
            // the client times out
            Err(SocketError::NoFreePipe) => return Ok(()),
            Err(err) => return Err(err),
        };
        match self.send_request(connection_port(id.pipe()), Op::ConnectResponse, header.src) {
            Ok(true) => (),
            Ok(false) => return self.detach(id),
            Err(err) => {
                // the client asks again and gets a fresh service
                self.detach(id)?;
                return Err(err);
            }
        }
        #[cfg(all(feature = "defmt", target_os = "none"))]
        defmt::debug!("accepted {} on {}", header.src, id);
        handler.on_connected(id, header.src);
        Ok(())
    }

    fn on_connect_response<H: SocketHandler>(&mut self, header: Header, handler: &mut H) {
        if connection_pipe(header.src.port).is_none() {
            return;
        }
        let Some(id) = connection_pipe(header.dest_port).and_then(|pipe| self.table.at_pipe(pipe))
        else {
            return;
        };
        let Some(endpoint) = self.table.get_mut(id) else {
            return;
        };
        if endpoint.role != Role::Client
            || endpoint.state != EndpointState::Connecting
            || endpoint.peer.addr != header.src.addr
        {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::debug!("unexpected response for {}", id);
            return;
        }
        endpoint.state = EndpointState::Connected;
        endpoint.peer = header.src;
        #[cfg(all(feature = "defmt", target_os = "none"))]
        defmt::debug!("connected to {} on {}", header.src, id);
        handler.on_connected(id, header.src);
    }

    fn on_disconnect_request<H: SocketHandler>(
        &mut self,
        header: Header,
        handler: &mut H,
    ) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        let Some(id) = self.connection_for(header) else {
            return Ok(());
        };
        if !matches!(
            self.table.state(id),
            EndpointState::Connected | EndpointState::Disconnecting
        ) {
            return Ok(());
        }
        self.send_request(
            connection_port(id.pipe()),
            Op::DisconnectResponse,
            header.src,
        )?;
        self.detach(id)?;
        handler.on_disconnected(id);
        Ok(())
    }

    fn on_disconnect_response<H: SocketHandler>(
        &mut self,
        header: Header,
        handler: &mut H,
    ) -> Result<(), SocketError<SPI::Error, DO::Error>> {
        let Some(id) = self.connection_for(header) else {
            return Ok(());
        };
        if self.table.state(id) != EndpointState::Disconnecting {
            return Ok(());
        }
        self.detach(id)?;
        handler.on_disconnected(id);
        Ok(())
    }

    /// The endpoint a request addressed to a connection port belongs to.
    ///
    /// The request must come from the endpoint's peer.
    fn connection_for(&self, header: Header) -> Option<EndpointId> {
        let id = self.table.at_pipe(connection_pipe(header.dest_port)?)?;
        let endpoint = self.table.get(id)?;
        (endpoint.peer == header.src).then_some(id)
    }
}
