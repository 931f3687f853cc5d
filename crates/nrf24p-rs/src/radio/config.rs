use crate::radio::nrf24p::bit_fields::{Config, RfSetup, SetupRetry};
use crate::{CrcLength, DataRate, PaLevel};

/// Settings written to the chip when it powers up.
///
/// Build one from [`RadioConfig::default`] with the `with_*()` methods.
/// ```
/// use nrf24p::radio::RadioConfig;
/// let mut config = RadioConfig::default();
/// config = config.with_channel(42);
/// assert_eq!(config.channel(), 42);
/// ```
///
/// The configuration is applied to the chip by
/// [`RadioMode::set_powerup_mode()`](fn@crate::radio::prelude::RadioMode::set_powerup_mode).
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    pub(crate) config_reg: Config,
    pub(crate) auto_retries: SetupRetry,
    pub(crate) rf_setup: RfSetup,
    channel: u8,
    address_length: u8,
}

impl Default for RadioConfig {
    /// Chip reset values, except for the channel.
    ///
    /// | setting | default |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `64` |
    /// | [`RadioConfig::address_length()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps2`] |
    /// | [`RadioConfig::auto_retry_delay()`] | `2` |
    /// | [`RadioConfig::auto_retry_count()`] | `15` |
    /// | [`RadioConfig::rx_dr()`] | `true` |
    /// | [`RadioConfig::tx_ds()`] | `true` |
    /// | [`RadioConfig::max_rt()`] | `true` |
    fn default() -> Self {
        Self {
            // IRQs unmasked, CRC-16, PWR_UP = 0
            config_reg: Config::default(),
            // 750 us, 15 attempts
            auto_retries: SetupRetry::default(),
            // 2 Mbps, 0 dBm
            rf_setup: RfSetup::default(),
            channel: 64,
            address_length: 5,
        }
    }
}

impl RadioConfig {
    /// The highest channel the chip supports.
    pub const MAX_CHANNEL: u8 = 125;

    /// See [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    /// CRC appended to each packet.
    ///
    /// Auto-acknowledgement requires CRC, so [`CrcLength::Disabled`] is
    /// overridden by the chip while auto-ack is enabled on any pipe.
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self {
            config_reg: self.config_reg.with_crc_length(length),
            ..self
        }
    }

    /// See [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.rf_setup.data_rate()
    }

    /// Over-the-air bit rate.
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self {
            rf_setup: self.rf_setup.with_data_rate(data_rate),
            ..self
        }
    }

    /// See [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.rf_setup.pa_level()
    }

    /// Transmit power.
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        Self {
            rf_setup: self.rf_setup.with_pa_level(level),
            ..self
        }
    }

    /// See [`RadioConfig::with_address_length()`].
    pub const fn address_length(&self) -> u8 {
        self.address_length
    }

    /// The address length used until the first mode-set operation
    /// programs a different one.
    ///
    /// This value is clamped to range [3, 5].
    pub fn with_address_length(self, value: u8) -> Self {
        Self {
            address_length: value.clamp(3, 5),
            ..self
        }
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The channel (aka frequency) the radio operates on.
    ///
    /// The resulting frequency is 2400 MHz + `channel`.
    /// This value is clamped to [`RadioConfig::MAX_CHANNEL`].
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(Self::MAX_CHANNEL),
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_auto_retries()`].
    pub const fn auto_retry_delay(&self) -> u8 {
        self.auto_retries.ard()
    }

    /// Returns the value set by [`RadioConfig::with_auto_retries()`].
    pub const fn auto_retry_count(&self) -> u8 {
        self.auto_retries.arc()
    }

    /// Auto-retransmit `delay` and `count` (SETUP_RETR).
    ///
    /// The `delay` is in steps of 250 microseconds (plus 250 microseconds).
    /// Both values are clamped to range [0, 15].
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        Self {
            auto_retries: SetupRetry::new()
                .with_ard(delay.min(15))
                .with_arc(count.min(15)),
            ..self
        }
    }

    /// Is the "RX Data Ready" event reflected on the IRQ pin?
    pub const fn rx_dr(&self) -> bool {
        self.config_reg.rx_dr()
    }

    /// Reflect (or mask) the "RX Data Ready" event on the IRQ pin.
    pub fn with_rx_dr(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_rx_dr(enable),
            ..self
        }
    }

    /// Is the "TX Data Sent" event reflected on the IRQ pin?
    pub const fn tx_ds(&self) -> bool {
        self.config_reg.tx_ds()
    }

    /// Reflect (or mask) the "TX Data Sent" event on the IRQ pin.
    pub fn with_tx_ds(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_tx_ds(enable),
            ..self
        }
    }

    /// Is the "maximum retransmits" event reflected on the IRQ pin?
    pub const fn max_rt(&self) -> bool {
        self.config_reg.max_rt()
    }

    /// Reflect (or mask) the "maximum retransmits" event on the IRQ pin.
    pub fn with_max_rt(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_max_rt(enable),
            ..self
        }
    }
}
