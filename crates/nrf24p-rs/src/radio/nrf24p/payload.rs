use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::prelude::{RadioFifo, RadioPayload, RadioStatus};
use crate::radio::{Nrf24Error, Nrf24p};
use crate::StatusFlags;

use super::{commands, mnemonics};

impl<SPI, DO, DELAY> Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn queue_payload(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        if buf.len() > mnemonics::PAYLOAD_MAX as usize || !self.is_ready()? {
            return Ok(0);
        }
        self.spi_write_command(command, buf)?;
        self._tx_count = self._tx_count.wrapping_add(1);
        Ok(buf.len() as u8)
    }
}

impl<SPI, DO, DELAY> RadioPayload for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PayloadErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn send(&mut self, buf: &[u8]) -> Result<u8, Self::PayloadErrorType> {
        self.queue_payload(commands::W_TX_PAYLOAD, buf)
    }

    fn send_no_ack(&mut self, buf: &[u8]) -> Result<u8, Self::PayloadErrorType> {
        self.queue_payload(commands::W_TX_PAYLOAD_NO_ACK, buf)
    }

    fn ack(&mut self, buf: &[u8], pipe: u8) -> Result<u8, Self::PayloadErrorType> {
        if pipe >= mnemonics::PIPE_MAX {
            return Ok(0);
        }
        self.queue_payload(commands::W_ACK_PAYLOAD | pipe, buf)
    }

    fn recv(&mut self, buf: &mut [u8], pipe: &mut u8) -> Result<u8, Self::PayloadErrorType> {
        self.update()?;
        if !self._status.has_payload() {
            return Ok(0);
        }
        let source = self._status.rx_pipe();

        self.spi_read(1, commands::R_RX_PL_WID)?;
        let width = self._buf[1];
        if width == 0 || width > mnemonics::PAYLOAD_MAX {
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::warn!("RX payload width {=u8} is corrupt; flushing RX FIFO", width);
            self.flush_rx()?;
            return Err(Nrf24Error::BinaryCorruption);
        }

        // the whole payload is clocked out so it leaves the FIFO
        self.spi_read(width, commands::R_RX_PAYLOAD)?;
        let len = buf.len().min(width as usize);
        buf[..len].copy_from_slice(&self._buf[1..(len + 1)]);
        self.clear_status_flags(StatusFlags::default().with_rx_dr(true))?;

        *pipe = source;
        self._rx_count = self._rx_count.wrapping_add(1);
        Ok(len as u8)
    }

    fn available(&mut self) -> Result<bool, Self::PayloadErrorType> {
        self.update()?;
        Ok(self._status.has_payload())
    }
}
