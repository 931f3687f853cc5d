//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod nrf24p;
pub use nrf24p::{commands, mnemonics, registers, Nrf24Error, Nrf24p};

mod config;
pub use config::RadioConfig;
