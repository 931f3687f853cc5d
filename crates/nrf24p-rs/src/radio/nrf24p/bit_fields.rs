use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, FifoState, PaLevel};

use super::mnemonics;

#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// Configure the radio's "RX Data Ready" IRQ event.
    #[bits(1, access = None)]
    pub rx_dr: bool,

    /// Configure the radio's "TX Data Sent" IRQ event.
    #[bits(1, access = None)]
    pub tx_ds: bool,

    /// Configure the radio's "maximum retransmits" IRQ event.
    #[bits(1, access = None)]
    pub max_rt: bool,

    #[bits(2, access = None, default = 3)]
    pub crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = 0b1100;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !Self::CRC_MASK | length.into_bits();
        Self::from_bits(new_val)
    }

    pub const fn rx_dr(&self) -> bool {
        (self.into_bits() & mnemonics::MASK_RX_DR) == 0
    }

    pub fn with_rx_dr(self, enable: bool) -> Self {
        Self::from_bits(
            self.into_bits() & !mnemonics::MASK_RX_DR | ((!enable as u8) * mnemonics::MASK_RX_DR),
        )
    }

    pub const fn tx_ds(&self) -> bool {
        (self.into_bits() & mnemonics::MASK_TX_DS) == 0
    }

    pub fn with_tx_ds(self, enable: bool) -> Self {
        Self::from_bits(
            self.into_bits() & !mnemonics::MASK_TX_DS | ((!enable as u8) * mnemonics::MASK_TX_DS),
        )
    }

    pub const fn max_rt(&self) -> bool {
        (self.into_bits() & mnemonics::MASK_MAX_RT) == 0
    }

    pub fn with_max_rt(self, enable: bool) -> Self {
        Self::from_bits(
            self.into_bits() & !mnemonics::MASK_MAX_RT | ((!enable as u8) * mnemonics::MASK_MAX_RT),
        )
    }

    pub fn as_rx(self) -> Self {
        Self::from_bits(self.into_bits() | 1)
    }

    pub fn as_tx(self) -> Self {
        Self::from_bits(self.into_bits() & !1)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4, default = 2)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4, default = 15)]
    pub arc: u8,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    /// CONT_WAVE and a reserved bit; never set by this driver.
    #[bits(2)]
    _padding: u8,

    /// RF_DR_LOW, PLL_LOCK and RF_DR_HIGH.
    #[bits(3, access = None, default = 1)]
    data_rate: u8,

    #[bits(2, access = None, default = 3)]
    pa_level: u8,

    #[bits(1)]
    _obsolete: u8,
}

impl RfSetup {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits())
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits())
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    #[bits(5)]
    _padding: u8,

    /// Enables the dynamic payload length feature.
    #[bits(1, default = true)]
    pub dynamic_payloads: bool,

    /// Enables payloads attached to auto-ack packets.
    #[bits(1, default = true)]
    pub ack_payloads: bool,

    /// Enables the W_TX_PAYLOAD_NOACK command.
    #[bits(1, default = true)]
    pub ask_no_ack: bool,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct FifoStatus {
    #[bits(1)]
    _padding: u8,

    pub tx_reuse: bool,

    pub tx_full: bool,

    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    pub rx_full: bool,

    pub rx_empty: bool,
}

impl FifoStatus {
    pub const fn tx_state(&self) -> FifoState {
        if self.tx_full() {
            FifoState::Full
        } else if self.tx_empty() {
            FifoState::Empty
        } else {
            FifoState::Occupied
        }
    }

    pub const fn rx_state(&self) -> FifoState {
        if self.rx_full() {
            FifoState::Full
        } else if self.rx_empty() {
            FifoState::Empty
        } else {
            FifoState::Occupied
        }
    }
}
