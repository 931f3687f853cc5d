//! This module defines types used by various traits.
//! These types are meant to be agnostic of the trait implementation.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Implements [`Display`] and `defmt::Format` for enums that have a `label()`.
macro_rules! labelled {
    ($($ty:ty),+) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                    f.write_str(self.label())
                }
            }

            #[cfg(feature = "defmt")]
            #[cfg(target_os = "none")]
            impl defmt::Format for $ty {
                fn format(&self, fmt: defmt::Formatter) {
                    defmt::write!(fmt, "{=str}", self.label())
                }
            }
        )+
    };
}

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

impl PaLevel {
    pub(crate) const MASK: u8 = 6;

    /// The RF_SETUP.RF_PWR field, already shifted into place.
    pub(crate) const fn into_bits(self) -> u8 {
        (self as u8) << 1
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match (value & Self::MASK) >> 1 {
            0 => PaLevel::Min,
            1 => PaLevel::Low,
            2 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            PaLevel::Min => "-18 dBm",
            PaLevel::Low => "-12 dBm",
            PaLevel::High => "-6 dBm",
            PaLevel::Max => "0 dBm",
        }
    }
}

/// How fast data moves through the air.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    Mbps1,
    Mbps2,
    Kbps250,
}

impl DataRate {
    /// RF_DR_LOW and RF_DR_HIGH
    pub(crate) const MASK: u8 = 0x28;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x08,
            DataRate::Kbps250 => 0x20,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        let value = value & Self::MASK;
        if value & 0x20 != 0 {
            DataRate::Kbps250
        } else if value == 0x08 {
            DataRate::Mbps2
        } else {
            DataRate::Mbps1
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            DataRate::Mbps1 => "1 Mbps",
            DataRate::Mbps2 => "2 Mbps",
            DataRate::Kbps250 => "250 kbps",
        }
    }
}

/// Size of the CRC appended to every packet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrcLength {
    Disabled,
    Bit8,
    Bit16,
}

impl CrcLength {
    /// EN_CRC and CRCO in CONFIG
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 0b1000,
            CrcLength::Bit16 => 0b1100,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        if value & 0b1000 == 0 {
            CrcLength::Disabled
        } else if value & 0b0100 == 0 {
            CrcLength::Bit8
        } else {
            CrcLength::Bit16
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            CrcLength::Disabled => "no CRC",
            CrcLength::Bit8 => "CRC-8",
            CrcLength::Bit16 => "CRC-16",
        }
    }
}

/// Fill level of the TX or RX FIFO (3 levels deep each).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FifoState {
    Full,
    Empty,
    /// Neither full nor empty.
    Occupied,
}

impl FifoState {
    pub const fn label(&self) -> &'static str {
        match self {
            FifoState::Full => "full",
            FifoState::Empty => "empty",
            FifoState::Occupied => "occupied",
        }
    }
}

/// The operating mode of the transceiver (datasheet chapter 6.1.1).
///
/// | state | CONFIG.PWR_UP | CONFIG.PRIM_RX | CE |
/// |-------|:-------------:|:--------------:|:--:|
/// | [`RadioState::PowerDown`] | 0 | - | 0 |
/// | [`RadioState::Standby`] | 1 | - | 0 |
/// | [`RadioState::Rx`] | 1 | 1 | 1 |
/// | [`RadioState::Tx`] | 1 | 0 | 1 |
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum RadioState {
    #[default]
    PowerDown,
    Standby,
    Rx,
    Tx,
}

impl RadioState {
    pub const fn label(&self) -> &'static str {
        match self {
            RadioState::PowerDown => "power down",
            RadioState::Standby => "standby",
            RadioState::Rx => "RX",
            RadioState::Tx => "TX",
        }
    }
}

labelled!(PaLevel, DataRate, CrcLength, FifoState, RadioState);

/// The decoded STATUS register.
///
/// Every SPI transaction clocks the STATUS register out as its first byte,
/// so an up-to-date copy is cached after each command.
///
/// To instantiate an object with flags that have different values:
/// ```
/// use nrf24p::StatusFlags;
/// let flags = StatusFlags::default() // all flags are false
///     .with_rx_dr(true); // assert only `rx_dr` flags
/// ```
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all IRQ flags set to true.
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent (or an ACK was received).
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if the maximum number of retransmits was reached.
    #[bits(1, access = RO)]
    pub max_rt: bool,

    /// The pipe number of the payload at the head of the RX FIFO.
    ///
    /// [`StatusFlags::NO_PAYLOAD`] means the RX FIFO is empty.
    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    /// A flag to describe if the TX FIFO is full.
    #[bits(1, access = RO)]
    pub tx_full: bool,
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub const IRQ_MASK: u8 = 0x70;

    /// The value of [`StatusFlags::rx_pipe()`] when the RX FIFO is empty.
    pub const NO_PAYLOAD: u8 = 7;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all IRQ flags are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// Is there a payload waiting at the head of the RX FIFO?
    pub const fn has_payload(&self) -> bool {
        self.rx_pipe() < 6
    }

    /// A flag to describe if RX Data Ready to read.
    pub fn with_rx_dr(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::RX_DR_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::RX_DR_OFFSET))
    }

    /// A flag to describe if TX Data Sent.
    pub fn with_tx_ds(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DS_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DS_OFFSET))
    }

    /// A flag to describe if the maximum number of retransmits was reached.
    pub fn with_max_rt(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::MAX_RT_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::MAX_RT_OFFSET))
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "RX_DR:{} TX_DS:{} MAX_RT:{} RX_P_NO:{} TX_FULL:{}",
            self.rx_dr() as u8,
            self.tx_ds() as u8,
            self.max_rt() as u8,
            self.rx_pipe(),
            self.tx_full() as u8
        )
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "RX_DR:{=bool} TX_DS:{=bool} MAX_RT:{=bool} RX_P_NO:{=u8} TX_FULL:{=bool}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt(),
            self.rx_pipe(),
            self.tx_full()
        )
    }
}

/// The decoded OBSERVE_TX register: transmission statistics.
#[bitfield(u8, order = Msb)]
pub struct ObserveTx {
    /// Count of lost packets. Saturates at 15 and is reset by writing RF_CH.
    #[bits(4, access = RO)]
    pub plos_cnt: u8,

    /// Count of retransmissions for the last packet.
    #[bits(4, access = RO)]
    pub arc_cnt: u8,
}

impl ObserveTx {
    /// The saturation value of [`ObserveTx::plos_cnt()`].
    pub const PLOS_MAX: u8 = 15;

    /// Has the lost packet counter saturated?
    pub const fn is_max_lost(&self) -> bool {
        self.plos_cnt() == Self::PLOS_MAX
    }
}

impl Display for ObserveTx {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} lost, {} retries", self.plos_cnt(), self.arc_cnt())
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for ObserveTx {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=u8} lost, {=u8} retries", self.plos_cnt(), self.arc_cnt())
    }
}
