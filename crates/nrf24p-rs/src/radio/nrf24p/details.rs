use super::{Nrf24Error, Nrf24p};
use crate::radio::prelude::RadioDetails;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

#[cfg(any(feature = "defmt", feature = "std"))]
use super::{
    bit_fields::{Config, FifoStatus, RfSetup, SetupRetry},
    registers,
};
#[cfg(any(feature = "defmt", feature = "std"))]
use crate::{radio::prelude::RadioStatus, ObserveTx};

#[cfg(feature = "std")]
extern crate std;

/// Every register [`RadioDetails::print_details()`] reports, read in one pass.
#[cfg(any(feature = "defmt", feature = "std"))]
struct Snapshot {
    config: Config,
    channel: u8,
    rf_setup: RfSetup,
    address_length: u8,
    retries: SetupRetry,
    observer: ObserveTx,
    fifo: FifoStatus,
    dynamic_payloads: u8,
    auto_ack: u8,
    open_pipes: u8,
    tx_address: u64,
    /// The effective address of each pipe (pipes 2 - 5 share the upper bytes of pipe 1).
    pipes: [u64; 6],
}

#[cfg(any(feature = "defmt", feature = "std"))]
impl Snapshot {
    /// The retransmit delay in microseconds.
    fn retry_delay(&self) -> u16 {
        (self.retries.ard() as u16 + 1) * 250
    }

    fn is_open(&self, pipe: usize) -> bool {
        self.open_pipes & (1 << pipe) > 0
    }
}

#[cfg(any(feature = "defmt", feature = "std"))]
impl<SPI, DO, DELAY> Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn read_byte(&mut self, register: u8) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, register)?;
        Ok(self._buf[1])
    }

    fn read_address(&mut self, register: u8) -> Result<[u8; 5], Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(5, register)?;
        let mut address = [0u8; 5];
        address.copy_from_slice(&self._buf[1..6]);
        Ok(address)
    }

    fn snapshot(&mut self) -> Result<Snapshot, Nrf24Error<SPI::Error, DO::Error>> {
        // an address is LSByte first on the wire
        fn as_u64(address: [u8; 5]) -> u64 {
            let mut bytes = [0u8; 8];
            bytes[..5].copy_from_slice(&address);
            u64::from_le_bytes(bytes)
        }

        let config = Config::from_bits(self.read_byte(registers::CONFIG)?);
        let channel = self.read_byte(registers::RF_CH)?;
        let rf_setup = RfSetup::from_bits(self.read_byte(registers::RF_SETUP)?);
        let address_length = (self.read_byte(registers::SETUP_AW)? & 3) + 2;
        let retries = SetupRetry::from_bits(self.read_byte(registers::SETUP_RETR)?);
        let observer = self.observe_tx()?;
        let fifo = FifoStatus::from_bits(self.read_byte(registers::FIFO_STATUS)?);
        let dynamic_payloads = self.read_byte(registers::DYNPD)?;
        let auto_ack = self.read_byte(registers::EN_AA)?;
        let open_pipes = self.read_byte(registers::EN_RXADDR)?;
        let tx_address = as_u64(self.read_address(registers::TX_ADDR)?);

        let mut pipes = [0u64; 6];
        pipes[0] = as_u64(self.read_address(registers::RX_ADDR_P0)?);
        let base = self.read_address(registers::RX_ADDR_P1)?;
        pipes[1] = as_u64(base);
        for pipe in 2..6u8 {
            let mut address = base;
            address[0] = self.read_byte(registers::RX_ADDR_P0 + pipe)?;
            pipes[pipe as usize] = as_u64(address);
        }

        Ok(Snapshot {
            config,
            channel,
            rf_setup,
            address_length,
            retries,
            observer,
            fifo,
            dynamic_payloads,
            auto_ack,
            open_pipes,
            tx_address,
            pipes,
        })
    }
}

impl<SPI, DO, DELAY> RadioDetails for Nrf24p<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DetailsErrorType = Nrf24Error<SPI::Error, DO::Error>;

    #[cfg(feature = "defmt")]
    #[cfg(target_os = "none")]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let regs = self.snapshot()?;
        defmt::println!(
            "state: {} (powered = {=bool}, PRIM_RX = {=bool})",
            self._state,
            regs.config.power(),
            regs.config.is_rx()
        );
        defmt::println!(
            "channel: {=u8} ({=u16} MHz), {}, PA {}, CRC {}",
            regs.channel,
            regs.channel as u16 + 2400,
            regs.rf_setup.data_rate(),
            regs.rf_setup.pa_level(),
            regs.config.crc_length()
        );
        defmt::println!(
            "auto-retry: {=u8} x {=u16} us; last TX: {}",
            regs.retries.arc(),
            regs.retry_delay(),
            regs.observer
        );
        defmt::println!(
            "payloads: {=u16} sent, {=u16} received",
            self._tx_count,
            self._rx_count
        );
        defmt::println!(
            "IRQ enabled: RX_DR = {=bool}, TX_DS = {=bool}, MAX_RT = {=bool}",
            regs.config.rx_dr(),
            regs.config.tx_ds(),
            regs.config.max_rt()
        );
        defmt::println!("status: {}", self._status);
        defmt::println!(
            "FIFO: TX {}, RX {}",
            regs.fifo.tx_state(),
            regs.fifo.rx_state()
        );
        defmt::println!(
            "DYNPD = {=u8:#04X}, EN_AA = {=u8:#04X}",
            regs.dynamic_payloads,
            regs.auto_ack
        );
        defmt::println!(
            "TX address ({=u8} bytes): {=u64:#012X}",
            regs.address_length,
            regs.tx_address
        );
        for (pipe, address) in regs.pipes.iter().enumerate() {
            defmt::println!(
                "pipe {=usize}: {=u64:#012X}{}",
                pipe,
                *address,
                if regs.is_open(pipe) { "" } else { " (closed)" }
            );
        }
        Ok(())
    }

    #[cfg(not(target_os = "none"))]
    #[cfg(feature = "std")]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let regs = self.snapshot()?;
        std::println!(
            "state: {} (powered = {}, PRIM_RX = {})",
            self._state,
            regs.config.power(),
            regs.config.is_rx()
        );
        std::println!(
            "channel: {} ({} MHz), {}, PA {}, CRC {}",
            regs.channel,
            regs.channel as u16 + 2400,
            regs.rf_setup.data_rate(),
            regs.rf_setup.pa_level(),
            regs.config.crc_length()
        );
        std::println!(
            "auto-retry: {} x {} us; last TX: {}",
            regs.retries.arc(),
            regs.retry_delay(),
            regs.observer
        );
        std::println!(
            "payloads: {} sent, {} received",
            self._tx_count,
            self._rx_count
        );
        std::println!(
            "IRQ enabled: RX_DR = {}, TX_DS = {}, MAX_RT = {}",
            regs.config.rx_dr(),
            regs.config.tx_ds(),
            regs.config.max_rt()
        );
        std::println!("status: {}", self._status);
        std::println!(
            "FIFO: TX {}, RX {}",
            regs.fifo.tx_state(),
            regs.fifo.rx_state()
        );
        std::println!(
            "DYNPD = {:#04X}, EN_AA = {:#04X}",
            regs.dynamic_payloads,
            regs.auto_ack
        );
        std::println!(
            "TX address ({} bytes): {:#012X}",
            regs.address_length,
            regs.tx_address
        );
        for (pipe, address) in regs.pipes.iter().enumerate() {
            std::println!(
                "pipe {pipe}: {address:#012X}{}",
                if regs.is_open(pipe) { "" } else { " (closed)" }
            );
        }
        Ok(())
    }

    #[cfg(not(any(
        all(feature = "defmt", target_os = "none"),
        all(feature = "std", not(target_os = "none"))
    )))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        Ok(())
    }
}
