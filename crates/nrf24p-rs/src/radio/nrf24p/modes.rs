use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::prelude::{RadioFifo, RadioMode, RadioStatus};
use crate::radio::{Nrf24Error, Nrf24p};
use crate::{RadioState, StatusFlags};

use super::bit_fields::Feature;
use super::{mnemonics, registers, timing};

impl<SPI, DO, DELAY> Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Pad (with zeros) or truncate `address` to a width the chip supports.
    ///
    /// SETUP_AW is only rewritten when the width differs from the programmed one.
    fn set_address_width(
        &mut self,
        address: &[u8],
    ) -> Result<([u8; 5], usize), Nrf24Error<SPI::Error, DO::Error>> {
        let width = address.len().clamp(3, 5);
        let len = address.len().min(5);
        let mut padded = [0u8; 5];
        padded[..len].copy_from_slice(&address[..len]);
        if width as u8 != self._address_length {
            self._address_length = width as u8;
            self.spi_write_byte(registers::SETUP_AW, width as u8 - 2)?;
        }
        Ok((padded, width))
    }

    /// Assert CE for an active mode and settle.
    ///
    /// Both FIFOs are flushed if `activating` from standby.
    fn enter_active(
        &mut self,
        state: RadioState,
        activating: bool,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._config_reg = if state == RadioState::Rx {
            self._config_reg.as_rx()
        } else {
            self._config_reg.as_tx()
        };
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_us(timing::STANDBY_TO_ACTIVE_US);
        if activating {
            self.flush_rx()?;
            self.flush_tx()?;
        }
        self._state = state;
        Ok(())
    }
}

impl<SPI, DO, DELAY> RadioMode for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ModeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_powerup_mode(&mut self) -> Result<(), Self::ModeErrorType> {
        if self._state != RadioState::PowerDown {
            return Ok(());
        }
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;

        self.spi_write_byte(registers::FEATURE, Feature::default().into_bits())?;
        self.spi_write_byte(registers::RF_CH, self._config.channel())?;
        self.spi_write_byte(registers::RF_SETUP, self._config.rf_setup.into_bits())?;
        self.spi_write_byte(
            registers::SETUP_RETR,
            self._config.auto_retries.into_bits(),
        )?;
        self.spi_write_byte(registers::EN_AA, mnemonics::ALL_PIPES)?;
        self.spi_write_byte(registers::DYNPD, mnemonics::ALL_PIPES)?;
        self._address_length = self._config.address_length();
        self.spi_write_byte(registers::SETUP_AW, self._address_length - 2)?;
        // only the datagram pipe; other pipes are opened on demand
        self.spi_write_byte(registers::EN_RXADDR, 1)?;

        self._config_reg = self._config.config_reg.with_power(true).as_tx();
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self.clear_status_flags(StatusFlags::new())?;

        self._delay_impl.delay_us(timing::POWER_UP_US);
        self._state = RadioState::Standby;
        Ok(())
    }

    fn set_receiver_mode(&mut self, address: &[u8]) -> Result<(), Self::ModeErrorType> {
        if self._state == RadioState::PowerDown {
            self.set_powerup_mode()?;
        }
        let activating = self._state == RadioState::Standby;
        if self._state == RadioState::Tx {
            // let the last frame (and its auto-ack) complete on the old address
            self._delay_impl.delay_us(self.tx_delay);
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        }

        let (address, width) = self.set_address_width(address)?;
        self.spi_write_buf(registers::RX_ADDR_P0, &address[..width])?;
        if self._state == RadioState::Rx {
            return Ok(());
        }
        self.enter_active(RadioState::Rx, activating)
    }

    fn set_transmitter_mode(&mut self, address: &[u8]) -> Result<(), Self::ModeErrorType> {
        if self._state == RadioState::PowerDown {
            self.set_powerup_mode()?;
        }
        let (address, width) = self.set_address_width(address)?;
        self.spi_write_buf(registers::TX_ADDR, &address[..width])?;
        self.spi_write_buf(registers::RX_ADDR_P0, &address[..width])?;
        if self._state == RadioState::Tx {
            return Ok(());
        }

        let activating = self._state == RadioState::Standby;
        if self._state == RadioState::Rx {
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        }
        self.enter_active(RadioState::Tx, activating)
    }

    fn set_standby_mode(&mut self) -> Result<(), Self::ModeErrorType> {
        if matches!(self._state, RadioState::Rx | RadioState::Tx) {
            self._delay_impl.delay_us(timing::CE_HOLD_US);
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
            self._state = RadioState::Standby;
        }
        Ok(())
    }

    fn set_powerdown_mode(&mut self) -> Result<(), Self::ModeErrorType> {
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self._config_reg = self._config_reg.with_power(false);
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self._state = RadioState::PowerDown;
        Ok(())
    }

    fn state(&self) -> RadioState {
        self._state
    }
}
