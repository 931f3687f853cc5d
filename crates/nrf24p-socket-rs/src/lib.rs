#![doc = include_str!("../README.md")]
//!
//! ## Sockets
//!
//! - [`SocketDevice::begin()`], [`SocketDevice::end()`]
//! - [`Transport::send()`](fn@crate::prelude::Transport::send),
//!   [`Transport::recv()`](fn@crate::prelude::Transport::recv)
//! - [`Transport::listen()`](fn@crate::prelude::Transport::listen),
//!   [`Transport::connect()`](fn@crate::prelude::Transport::connect),
//!   [`Transport::disconnect()`](fn@crate::prelude::Transport::disconnect)
//! - [`Transport::send_connected()`](fn@crate::prelude::Transport::send_connected),
//!   [`Transport::recv_connected()`](fn@crate::prelude::Transport::recv_connected)
//!
//! ## Events
//!
//! - [`IrqBridge::on_interrupt()`](fn@crate::irq::IrqBridge::on_interrupt)
//! - [`Dispatchable::on_event()`](fn@crate::prelude::Dispatchable::on_event)
//! - [`SocketHandler`](trait@crate::prelude::SocketHandler)
#![no_std]

pub mod addr;
mod device;
pub mod irq;
pub mod pipe_table;
pub mod prelude;
mod protocol;
pub mod wire;

pub use addr::{SocketAddr, DYNAMIC_PORT};
pub use device::{Client, Server, SocketDevice, SocketError};
pub use irq::{IrqBridge, IrqEvent};
pub use pipe_table::{EndpointId, EndpointState};
