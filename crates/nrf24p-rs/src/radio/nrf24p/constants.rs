/// A module encapsulating register offsets for the nRF24L01+.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const RX_ADDR_P2: u8 = 0x0C;
    pub const RX_ADDR_P3: u8 = 0x0D;
    pub const RX_ADDR_P4: u8 = 0x0E;
    pub const RX_ADDR_P5: u8 = 0x0F;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// A module encapsulating SPI commands for the nRF24L01+.
pub mod commands {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    /// Masks the 5 bit register address of R_REGISTER/W_REGISTER.
    pub const REGISTER_MASK: u8 = 0x1F;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

/// A module to encapsulate bit mnemonics
pub mod mnemonics {
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;

    /// Enable auto-ack (EN_AA) or dynamic payloads (DYNPD) on pipes 0 - 5.
    pub const ALL_PIPES: u8 = 0x3F;

    /// The largest payload the chip's FIFOs hold.
    pub const PAYLOAD_MAX: u8 = 32;

    /// The number of data pipes.
    pub const PIPE_MAX: u8 = 6;
}

/// Datasheet timing (in microseconds).
pub(crate) mod timing {
    /// Oscillator start-up plus power-down to standby settling.
    pub const POWER_UP_US: u32 = 4500;
    /// Standby to active RX/TX settling (tStby2a).
    pub const STANDBY_TO_ACTIVE_US: u32 = 130;
    /// Minimum CE high pulse (tHCE).
    pub const CE_HOLD_US: u32 = 10;
}
