//! The map from the radio's receive pipes to attached endpoints.

use crate::addr::{connection_port, SocketAddr, PIPE_COUNT};

/// A handle to an attached endpoint.
///
/// The generation makes a handle kept after its endpoint was detached
/// stale, even if the pipe was given to another endpoint since.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointId {
    pipe: u8,
    generation: u16,
}

impl EndpointId {
    /// The receive pipe this endpoint is (or was) bound to.
    pub const fn pipe(&self) -> u8 {
        self.pipe
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for EndpointId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "pipe {=u8} (gen {=u16})", self.pipe, self.generation)
    }
}

/// What an endpoint is attached for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The initiating side of a connection.
    Client,
    /// Accepts connections addressed to `port`.
    Server { port: u16 },
    /// The accepting side of a connection, created for a request to the
    /// server listening on `server_port`.
    Service { server_port: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointState {
    Unattached,
    Idle,
    Listening,
    Connecting,
    Connected,
    Disconnecting,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for EndpointState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            EndpointState::Unattached => defmt::write!(fmt, "Unattached"),
            EndpointState::Idle => defmt::write!(fmt, "Idle"),
            EndpointState::Listening => defmt::write!(fmt, "Listening"),
            EndpointState::Connecting => defmt::write!(fmt, "Connecting"),
            EndpointState::Connected => defmt::write!(fmt, "Connected"),
            EndpointState::Disconnecting => defmt::write!(fmt, "Disconnecting"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub role: Role,
    pub state: EndpointState,
    /// The remote socket; meaningful once a connection is requested.
    pub peer: SocketAddr,
}

impl Endpoint {
    pub const fn new(role: Role, state: EndpointState) -> Self {
        Self {
            role,
            state,
            peer: SocketAddr::new(0, 0),
        }
    }
}

#[derive(Clone, Copy)]
struct Slot {
    generation: u16,
    endpoint: Option<Endpoint>,
}

/// A fixed capacity table with one slot per receive pipe.
///
/// Slot 0 (the datagram pipe) is never handed out.
pub struct PipeTable {
    slots: [Slot; PIPE_COUNT as usize],
}

impl Default for PipeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeTable {
    pub const fn new() -> Self {
        Self {
            slots: [Slot {
                generation: 0,
                endpoint: None,
            }; PIPE_COUNT as usize],
        }
    }

    /// Bind `endpoint` to the first free pipe in range [1, 5].
    ///
    /// Returns `None` if all 5 pipes are taken.
    pub fn allocate(&mut self, endpoint: Endpoint) -> Option<EndpointId> {
        let pipe = (1..PIPE_COUNT).find(|pipe| self.slots[*pipe as usize].endpoint.is_none())?;
        let slot = &mut self.slots[pipe as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.endpoint = Some(endpoint);
        Some(EndpointId {
            pipe,
            generation: slot.generation,
        })
    }

    /// Free the pipe held by `id`.
    ///
    /// Returns `false` (and changes nothing) if `id` is stale.
    pub fn release(&mut self, id: EndpointId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.slots[id.pipe as usize].endpoint = None;
        true
    }

    pub fn get(&self, id: EndpointId) -> Option<&Endpoint> {
        let slot = self.slots.get(id.pipe as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.endpoint.as_ref()
    }

    pub fn get_mut(&mut self, id: EndpointId) -> Option<&mut Endpoint> {
        let slot = self.slots.get_mut(id.pipe as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.endpoint.as_mut()
    }

    /// The state of the endpoint behind `id`; [`EndpointState::Unattached`] if stale.
    pub fn state(&self, id: EndpointId) -> EndpointState {
        self.get(id)
            .map_or(EndpointState::Unattached, |endpoint| endpoint.state)
    }

    /// The endpoint currently bound to `pipe`.
    pub fn at_pipe(&self, pipe: u8) -> Option<EndpointId> {
        let slot = self.slots.get(pipe as usize)?;
        slot.endpoint.map(|_| EndpointId {
            pipe,
            generation: slot.generation,
        })
    }

    /// The server listening on `port`.
    pub fn find_server(&self, port: u16) -> Option<EndpointId> {
        self.find(|endpoint| {
            endpoint.role == Role::Server { port } && endpoint.state == EndpointState::Listening
        })
    }

    /// The service already connected to `peer` on behalf of the server on `server_port`.
    pub fn find_service(&self, server_port: u16, peer: SocketAddr) -> Option<EndpointId> {
        self.find(|endpoint| {
            endpoint.role == Role::Service { server_port } && endpoint.peer == peer
        })
    }

    fn find<F: Fn(&Endpoint) -> bool>(&self, predicate: F) -> Option<EndpointId> {
        (1..PIPE_COUNT)
            .find(|pipe| {
                self.slots[*pipe as usize]
                    .endpoint
                    .as_ref()
                    .is_some_and(&predicate)
            })
            .and_then(|pipe| self.at_pipe(pipe))
    }

    /// The local port of the endpoint behind `id`.
    pub fn port(&self, id: EndpointId) -> Option<u16> {
        self.get(id).map(|endpoint| match endpoint.role {
            Role::Server { port } => port,
            Role::Client | Role::Service { .. } => connection_port(id.pipe),
        })
    }

    /// The number of attached endpoints.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.endpoint.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == PIPE_COUNT as usize - 1
    }
}
