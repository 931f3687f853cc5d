use super::registers;
use crate::radio::{prelude::RadioChannel, Nrf24Error, Nrf24p, RadioConfig};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> RadioChannel for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ChannelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The nRF24L01+ supports 126 channels. The specified `channel` is
    /// clamped to the range [0, 125].
    ///
    /// The channel is remembered for the relock performed by
    /// [`RadioFifo::flush()`](fn@crate::radio::prelude::RadioFifo::flush).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType> {
        let channel = channel.min(RadioConfig::MAX_CHANNEL);
        self._config = self._config.with_channel(channel);
        self.spi_write_byte(registers::RF_CH, channel)
    }

    /// See also [`Nrf24p::set_channel()`].
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType> {
        self.spi_read(1, registers::RF_CH)?;
        Ok(self._buf[1])
    }
}
