use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::prelude::{RadioFifo, RadioStatus};
use crate::radio::{Nrf24Error, Nrf24p};
use crate::{FifoState, StatusFlags};

use super::bit_fields::FifoStatus;
use super::{commands, registers};

impl<SPI, DO, DELAY> RadioFifo for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn flush(&mut self) -> Result<u8, Self::FifoErrorType> {
        let relock = self.is_max_lost()?;
        if relock {
            // rewriting RF_CH forces a PLL relock and resets PLOS_CNT
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::warn!("packet loss saturated on channel {=u8}", self._config.channel());
            self.spi_write_byte(registers::RF_CH, self._config.channel())?;
        }
        self.flush_rx()?;
        self.flush_tx()?;
        self.clear_status_flags(StatusFlags::new())?;
        Ok(if relock { 0xFF } else { self._status.into_bits() })
    }

    /// Use this to discard all 3 layers in the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)
    }

    fn is_ready(&mut self) -> Result<bool, Self::FifoErrorType> {
        self.spi_read(1, registers::FIFO_STATUS)?;
        Ok(!FifoStatus::from_bits(self._buf[1]).tx_full())
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        self.spi_read(1, registers::FIFO_STATUS)?;
        let status = FifoStatus::from_bits(self._buf[1]);
        Ok(if about_tx {
            status.tx_state()
        } else {
            status.rx_state()
        })
    }
}
