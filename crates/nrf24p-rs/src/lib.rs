#![doc = include_str!("../README.md")]
//!
//! ## Mode API
//!
//! - [`Nrf24p::new()`](fn@crate::radio::Nrf24p::new)
//! - [`Nrf24p::with_config()`](fn@crate::radio::Nrf24p::with_config)
//! - [`Nrf24p::set_powerup_mode()`](radio/struct.Nrf24p.html#method.set_powerup_mode)
//! - [`Nrf24p::set_receiver_mode()`](radio/struct.Nrf24p.html#method.set_receiver_mode)
//! - [`Nrf24p::set_transmitter_mode()`](radio/struct.Nrf24p.html#method.set_transmitter_mode)
//! - [`Nrf24p::set_standby_mode()`](radio/struct.Nrf24p.html#method.set_standby_mode)
//! - [`Nrf24p::set_powerdown_mode()`](radio/struct.Nrf24p.html#method.set_powerdown_mode)
//! - [`Nrf24p::state()`](radio/struct.Nrf24p.html#method.state)
//!
//! ## Payload API
//!
//! - [`Nrf24p::send()`](radio/struct.Nrf24p.html#method.send)
//! - [`Nrf24p::send_no_ack()`](radio/struct.Nrf24p.html#method.send_no_ack)
//! - [`Nrf24p::ack()`](radio/struct.Nrf24p.html#method.ack)
//! - [`Nrf24p::recv()`](radio/struct.Nrf24p.html#method.recv)
//! - [`Nrf24p::available()`](radio/struct.Nrf24p.html#method.available)
//! - [`Nrf24p::flush()`](radio/struct.Nrf24p.html#method.flush)
//! - [`Nrf24p::is_ready()`](radio/struct.Nrf24p.html#method.is_ready)
//!
//! ## Link quality API
//!
//! - [`Nrf24p::is_max_retransmit()`](radio/struct.Nrf24p.html#method.is_max_retransmit)
//! - [`Nrf24p::is_max_lost()`](radio/struct.Nrf24p.html#method.is_max_lost)
//! - [`Nrf24p::observe_tx()`](radio/struct.Nrf24p.html#method.observe_tx)
//! - [`Nrf24p::tx_count()`](fn@crate::radio::Nrf24p::tx_count)
//! - [`Nrf24p::rx_count()`](fn@crate::radio::Nrf24p::rx_count)
//!
#![no_std]

mod types;
pub use types::{CrcLength, DataRate, FifoState, ObserveTx, PaLevel, RadioState, StatusFlags};
pub mod radio;
