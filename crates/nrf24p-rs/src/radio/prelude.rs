//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use nrf24p::radio::prelude::*;
//! ```

use crate::types::{FifoState, ObserveTx, RadioState, StatusFlags};

/// A trait to represent the power and RX/TX mode machine of the transceiver.
///
/// Every transition honors the datasheet timing by blocking on the
/// radio's delay implementation.
pub trait RadioMode {
    type ModeErrorType;

    /// Power up the radio and apply the [`RadioConfig`](struct@crate::radio::RadioConfig)
    /// given at construction.
    ///
    /// This does nothing unless the radio is in [`RadioState::PowerDown`].
    /// It programs FEATURE, RF_CH, RF_SETUP, SETUP_RETR, EN_AA, DYNPD,
    /// SETUP_AW, EN_RXADDR (pipe 0 only) and CONFIG, clears the IRQ flags,
    /// and then blocks for the power-up settling time.
    /// Afterwards, the radio is in [`RadioState::Standby`].
    fn set_powerup_mode(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Enter active RX mode listening on pipe 0 with the given `address`.
    ///
    /// The address width is `address.len()` clamped to range [3, 5].
    /// Both FIFOs are flushed when the radio was in [`RadioState::Standby`].
    /// When leaving [`RadioState::Tx`], this first blocks for
    /// [`Nrf24p::tx_delay`](value@crate::radio::Nrf24p::tx_delay) so the last
    /// transmission (and its auto-retries) can complete.
    ///
    /// If the radio is powered down, then it is powered up first.
    fn set_receiver_mode(&mut self, address: &[u8]) -> Result<(), Self::ModeErrorType>;

    /// Enter active TX mode addressed at `address`.
    ///
    /// The `address` is also written to pipe 0 so the auto-ack packet
    /// from the receiver can be caught.
    /// Both FIFOs are flushed when the radio was in [`RadioState::Standby`].
    ///
    /// If the radio is powered down, then it is powered up first.
    fn set_transmitter_mode(&mut self, address: &[u8]) -> Result<(), Self::ModeErrorType>;

    /// Deassert the CE pin after the minimum CE high time.
    ///
    /// Afterwards, the radio is in [`RadioState::Standby`] (unless it was
    /// powered down).
    fn set_standby_mode(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Deassert the CE pin and clear the PWR_UP bit.
    ///
    /// Register values are retained while powered down.
    fn set_powerdown_mode(&mut self) -> Result<(), Self::ModeErrorType>;

    /// The mode the radio was last put into.
    fn state(&self) -> RadioState;
}

/// A trait to represent manipulation of the transceiver's FIFOs.
pub trait RadioFifo {
    type FifoErrorType;

    /// Flush both FIFOs and clear all IRQ flags.
    ///
    /// If the lost packet counter has saturated (see [`RadioStatus::is_max_lost()`]),
    /// then RF_CH is rewritten to force a PLL relock (which also resets the
    /// counter) and `0xFF` is returned to signal an unreliable channel.
    /// Otherwise, the STATUS byte observed by the last SPI transaction is returned.
    fn flush(&mut self) -> Result<u8, Self::FifoErrorType>;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Is there room in the TX FIFO for another payload?
    fn is_ready(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;
}

/// A trait to represent payload I/O of the transceiver.
///
/// None of these functions wait for a transmission to complete.
/// Use [`RadioStatus::is_max_retransmit()`] or [`RadioStatus::is_max_lost()`]
/// to poll the outcome.
pub trait RadioPayload {
    type PayloadErrorType;

    /// Queue a payload for transmission (with auto-ack).
    ///
    /// Returns the number of bytes queued. This is `0` if
    /// `buf` is longer than 32 bytes (no SPI transaction is performed)
    /// or if the TX FIFO is full.
    fn send(&mut self, buf: &[u8]) -> Result<u8, Self::PayloadErrorType>;

    /// Like [`RadioPayload::send()`], but the receiver is asked not to acknowledge it.
    fn send_no_ack(&mut self, buf: &[u8]) -> Result<u8, Self::PayloadErrorType>;

    /// Queue a payload to be attached to the next auto-ack packet sent on `pipe`.
    ///
    /// Returns `0` if `buf` is longer than 32 bytes, `pipe` is not in range [0, 5],
    /// or the TX FIFO is full.
    fn ack(&mut self, buf: &[u8], pipe: u8) -> Result<u8, Self::PayloadErrorType>;

    /// Read the payload at the head of the RX FIFO into `buf`.
    ///
    /// Returns `0` (repeatably) if no payload is waiting. Otherwise, the pipe the
    /// payload was received on is stored in `pipe`, the RX_DR flag is cleared,
    /// and the number of bytes copied into `buf` is returned. Bytes that do not
    /// fit in `buf` are discarded with the payload.
    fn recv(&mut self, buf: &mut [u8], pipe: &mut u8) -> Result<u8, Self::PayloadErrorType>;

    /// Is there a payload waiting in the RX FIFO?
    fn available(&mut self) -> Result<bool, Self::PayloadErrorType>;
}

/// A trait to represent manipulation of data pipes.
pub trait RadioPipe {
    type PipeErrorType;

    /// Write the `address` for `pipe` and enable the pipe in EN_RXADDR.
    ///
    /// If the specified `pipe` is not in range [0, 5], then this function does nothing.
    ///
    /// Pipes 0 and 1 store a full address. Pipes 2 - 5 only store the first
    /// (least significant) byte and borrow the remaining bytes from pipe 1.
    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Clear the `pipe`'s bit in EN_RXADDR.
    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType>;

    /// Write the `address` for `pipe` without enabling it.
    fn write_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Is the `pipe` enabled in EN_RXADDR?
    fn is_rx_pipe_open(&mut self, pipe: u8) -> Result<bool, Self::PipeErrorType>;
}

/// A trait to represent the STATUS and OBSERVE_TX registers.
pub trait RadioStatus {
    type StatusErrorType;

    /// Update the cached STATUS byte with a NOP command.
    fn update(&mut self) -> Result<(), Self::StatusErrorType>;

    /// Get the STATUS byte cached from the last SPI transaction.
    fn get_status_flags(&self, flags: &mut StatusFlags);

    /// Clear the IRQ flags asserted in `flags`.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;

    /// Has the last payload exhausted its auto-retries?
    fn is_max_retransmit(&mut self) -> Result<bool, Self::StatusErrorType>;

    /// Has the lost packet counter (PLOS_CNT) saturated at 15?
    fn is_max_lost(&mut self) -> Result<bool, Self::StatusErrorType>;

    /// Read the OBSERVE_TX register.
    fn observe_tx(&mut self) -> Result<ObserveTx, Self::StatusErrorType>;
}

/// A trait to represent manipulation of a channel (aka frequency).
pub trait RadioChannel {
    type ChannelErrorType;

    /// Set the radio's currently selected channel.
    ///
    /// The value is clamped to range [0, 125].
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's currently selected channel.
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType>;
}

pub trait RadioDetails {
    type DetailsErrorType;

    /// Print details about the radio's current configuration.
    ///
    /// This function uses [`std::println`] (when the `std` feature is enabled)
    /// or [`defmt::println`](https://docs.rs/defmt/latest/defmt/macro.println.html)
    /// (when the `defmt` feature is enabled). With neither, it does nothing.
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType>;
}
