use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{prelude::RadioStatus, Nrf24Error, Nrf24p},
    types::{ObserveTx, StatusFlags},
};

use super::{commands, registers};

impl<SPI, DO, DELAY> RadioStatus for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type StatusErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn update(&mut self) -> Result<(), Self::StatusErrorType> {
        self.spi_read(0, commands::NOP)
    }

    fn get_status_flags(&self, flags: &mut StatusFlags) {
        *flags = self._status;
    }

    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType> {
        self.spi_write_byte(registers::STATUS, flags.into_bits() & StatusFlags::IRQ_MASK)
    }

    fn is_max_retransmit(&mut self) -> Result<bool, Self::StatusErrorType> {
        self.update()?;
        Ok(self._status.max_rt())
    }

    fn is_max_lost(&mut self) -> Result<bool, Self::StatusErrorType> {
        Ok(self.observe_tx()?.is_max_lost())
    }

    fn observe_tx(&mut self) -> Result<ObserveTx, Self::StatusErrorType> {
        self.spi_read(1, registers::OBSERVE_TX)?;
        Ok(ObserveTx::from_bits(self._buf[1]))
    }
}
