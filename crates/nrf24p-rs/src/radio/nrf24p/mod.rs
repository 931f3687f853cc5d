use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
pub(crate) mod bit_fields;
mod channel;
use bit_fields::Config;
mod constants;
mod fifo;
mod modes;
mod payload;
mod pipe;
pub use constants::{commands, mnemonics, registers};
pub(crate) use constants::timing;
mod details;
mod status;
use super::RadioConfig;
use crate::{RadioState, StatusFlags};

/// An collection of error types to describe hardware malfunctions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO).
    ///
    /// This is also returned when the radio reports an RX payload width
    /// larger than 32 bytes (the RX FIFO is flushed when that happens).
    BinaryCorruption,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl<SPI, DO> defmt::Format for Nrf24Error<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Nrf24Error::Spi(_) => defmt::write!(fmt, "SPI error"),
            Nrf24Error::Gpo(_) => defmt::write!(fmt, "CE pin error"),
            Nrf24Error::BinaryCorruption => defmt::write!(fmt, "binary corruption"),
        }
    }
}

/// This struct implements the [`Radio*` traits](mod@crate::radio::prelude)
/// for the nRF24L01+ transceiver.
pub struct Nrf24p<SPI, DO, DELAY> {
    /// The delay (in microseconds) in which
    /// [`RadioMode::set_receiver_mode()`](fn@crate::radio::prelude::RadioMode::set_receiver_mode)
    /// waits when leaving TX mode.
    ///
    /// This lets the last queued payload and all of its auto-retries complete
    /// before the radio stops transmitting. The default (10 milliseconds) covers
    /// 15 retries with the default auto-retry delay.
    pub tx_delay: u32,
    _spi: SPI,
    /// The CE pin for the radio.
    ///
    /// This really only exposed for advanced manipulation of active TX mode.
    /// It is strongly recommended to change modes using the
    /// [`RadioMode`](trait@crate::radio::prelude::RadioMode) functions because
    /// those functions guarantee proper radio timing.
    pub ce_pin: DO,
    _delay_impl: DELAY,
    _buf: [u8; 33],
    _status: StatusFlags,
    _state: RadioState,
    _config: RadioConfig,
    _config_reg: Config,
    _address_length: u8,
    _tx_count: u16,
    _rx_count: u16,
}

impl<SPI, DO, DELAY> Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`Nrf24p`] object for use on the specified
    /// `spi` bus with the given `ce_pin`, using [`RadioConfig::default()`].
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    ///
    /// No SPI transaction is performed until the radio is powered up.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> Nrf24p<SPI, DO, DELAY> {
        Self::with_config(ce_pin, spi, delay_impl, RadioConfig::default())
    }

    /// Like [`Nrf24p::new()`], but with a custom [`RadioConfig`].
    pub fn with_config(
        ce_pin: DO,
        spi: SPI,
        delay_impl: DELAY,
        config: RadioConfig,
    ) -> Nrf24p<SPI, DO, DELAY> {
        Nrf24p {
            tx_delay: 10_000,
            ce_pin,
            _spi: spi,
            _delay_impl: delay_impl,
            _status: StatusFlags::from_bits(0),
            _buf: [0u8; 33],
            _state: RadioState::PowerDown,
            _config: config,
            _config_reg: config.config_reg,
            _address_length: config.address_length(),
            _tx_count: 0,
            _rx_count: 0,
        }
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    /// The `len` bytes clocked out after the `command` are zeros.
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..(len as usize + 1)].fill(0);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        register: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = (register & commands::REGISTER_MASK) | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    fn spi_write_buf(
        &mut self,
        register: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_write_command(
            (register & commands::REGISTER_MASK) | commands::W_REGISTER,
            buf,
        )
    }

    /// Write a `command` (that is not a register write) followed by `buf`.
    fn spi_write_command(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        let buf_len = buf.len().min(mnemonics::PAYLOAD_MAX as usize);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    /// The number of payloads queued for transmission since instantiation.
    ///
    /// This counter wraps around at [`u16::MAX`].
    pub fn tx_count(&self) -> u16 {
        self._tx_count
    }

    /// The number of payloads read from the RX FIFO since instantiation.
    ///
    /// This counter wraps around at [`u16::MAX`].
    pub fn rx_count(&self) -> u16 {
        self._rx_count
    }

    /// The configuration this radio applies when powered up.
    pub fn config(&self) -> &RadioConfig {
        &self._config
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers};
    use crate::radio::prelude::RadioStatus;
    use crate::{spi_test_expects, test::mk_radio, RadioState};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn construct_without_spi() {
        let mocks = mk_radio(&[], &[]);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.tx_delay, 10_000);
        assert_eq!(radio._state, RadioState::PowerDown);
        assert_eq!(radio.tx_count(), 0);
        assert_eq!(radio.rx_count(), 0);
        assert_eq!(radio.config().channel(), 64);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn status_cached_from_every_transfer() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::RF_CH | commands::W_REGISTER, 5u8],
                vec![0x4Eu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.spi_write_byte(registers::RF_CH, 5).unwrap();
        let mut flags = crate::StatusFlags::default();
        radio.get_status_flags(&mut flags);
        assert!(flags.rx_dr());
        assert_eq!(flags.rx_pipe(), 7);
        spi.done();
        ce_pin.done();
    }
}
