use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::RadioPipe, Nrf24Error, Nrf24p};

use super::{mnemonics, registers};

impl<SPI, DO, DELAY> Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Read-modify-write EN_RXADDR.
    ///
    /// The radio's IRQ handler must never observe a half-updated pipe mask,
    /// so interrupts are held off for the duration.
    fn update_rx_pipes(
        &mut self,
        pipe: u8,
        enable: bool,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        critical_section::with(|_| {
            self.spi_read(1, registers::EN_RXADDR)?;
            let out = if enable {
                self._buf[1] | (1 << pipe)
            } else {
                self._buf[1] & !(1 << pipe)
            };
            self.spi_write_byte(registers::EN_RXADDR, out)
        })
    }
}

impl<SPI, DO, DELAY> RadioPipe for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        if pipe >= mnemonics::PIPE_MAX {
            return Ok(());
        }
        self.write_rx_address(pipe, address)?;
        self.update_rx_pipes(pipe, true)
    }

    /// If the given `pipe` number is  not in range [0, 5], then this function does nothing.
    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType> {
        if pipe >= mnemonics::PIPE_MAX {
            return Ok(());
        }
        self.update_rx_pipes(pipe, false)
    }

    fn write_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        if pipe >= mnemonics::PIPE_MAX || address.is_empty() {
            return Ok(());
        }
        if pipe < 2 {
            // only write the bytes that were passed (up to the programmed width)
            let width = address.len().min(self._address_length as usize);
            self.spi_write_buf(registers::RX_ADDR_P0 + pipe, &address[..width])
        } else {
            // For pipes 2-5, only write the LSB
            self.spi_write_byte(registers::RX_ADDR_P0 + pipe, address[0])
        }
    }

    fn is_rx_pipe_open(&mut self, pipe: u8) -> Result<bool, Self::PipeErrorType> {
        if pipe >= mnemonics::PIPE_MAX {
            return Ok(false);
        }
        self.spi_read(1, registers::EN_RXADDR)?;
        Ok(self._buf[1] & (1 << pipe) > 0)
    }
}
