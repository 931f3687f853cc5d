//! A simulated air: several nRF24L01+ chips whose transmissions reach each
//! other instantly.
//!
//! Only what the driver uses is modeled: registers, both 3 level FIFOs,
//! address matching (including the shared upper bytes of pipes 2 - 5),
//! auto-ack and the MAX_RT/PLOS_CNT bookkeeping of a lost frame.
#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, convert::Infallible, rc::Rc};

use embedded_hal::{
    digital::{ErrorType as PinErrorType, OutputPin},
    spi::{Error as SpiError, ErrorKind, ErrorType as SpiErrorType, Operation, SpiDevice},
};
use embedded_hal_mock::eh1::delay::NoopDelay;
use nrf24p::radio::{commands, registers, Nrf24p};
use nrf24p_socket::{
    prelude::{Dispatchable, SocketHandler},
    EndpointId, IrqEvent, SocketAddr, SocketDevice,
};

const FIFO_DEPTH: usize = 3;

pub struct Chip {
    regs: [u8; 0x1E],
    rx_p0: [u8; 5],
    rx_p1: [u8; 5],
    tx_addr: [u8; 5],
    rx_fifo: VecDeque<(u8, Vec<u8>)>,
    tx_fifo: VecDeque<Vec<u8>>,
    rx_dr: bool,
    tx_ds: bool,
    max_rt: bool,
    plos: u8,
    arc: u8,
    /// Make every W_TX_PAYLOAD command fail on the bus.
    pub fail_tx_payload: bool,
}

impl Chip {
    fn new() -> Self {
        let mut regs = [0u8; 0x1E];
        regs[registers::CONFIG as usize] = 0x08;
        regs[registers::EN_AA as usize] = 0x3F;
        regs[registers::EN_RXADDR as usize] = 0x03;
        regs[registers::SETUP_AW as usize] = 3;
        regs[registers::SETUP_RETR as usize] = 3;
        regs[registers::RF_CH as usize] = 2;
        regs[registers::RF_SETUP as usize] = 0x0E;
        regs[registers::RX_ADDR_P2 as usize] = 0xC3;
        regs[registers::RX_ADDR_P3 as usize] = 0xC4;
        regs[registers::RX_ADDR_P4 as usize] = 0xC5;
        regs[registers::RX_ADDR_P5 as usize] = 0xC6;
        Self {
            regs,
            rx_p0: [0xE7; 5],
            rx_p1: [0xC2; 5],
            tx_addr: [0xE7; 5],
            rx_fifo: VecDeque::new(),
            tx_fifo: VecDeque::new(),
            rx_dr: false,
            tx_ds: false,
            max_rt: false,
            plos: 0,
            arc: 0,
            fail_tx_payload: false,
        }
    }

    fn status(&self) -> u8 {
        let rx_pipe = self.rx_fifo.front().map_or(7, |(pipe, _)| *pipe);
        ((self.rx_dr as u8) << 6)
            | ((self.tx_ds as u8) << 5)
            | ((self.max_rt as u8) << 4)
            | (rx_pipe << 1)
            | (self.tx_fifo.len() == FIFO_DEPTH) as u8
    }

    fn fifo_status(&self) -> u8 {
        (((self.tx_fifo.len() == FIFO_DEPTH) as u8) << 5)
            | ((self.tx_fifo.is_empty() as u8) << 4)
            | (((self.rx_fifo.len() == FIFO_DEPTH) as u8) << 1)
            | self.rx_fifo.is_empty() as u8
    }

    fn width(&self) -> usize {
        self.regs[registers::SETUP_AW as usize] as usize + 2
    }

    pub fn is_powered(&self) -> bool {
        self.regs[registers::CONFIG as usize] & 2 > 0
    }

    pub fn is_rx(&self) -> bool {
        self.regs[registers::CONFIG as usize] & 1 > 0
    }

    pub fn is_pipe_open(&self, pipe: u8) -> bool {
        self.regs[registers::EN_RXADDR as usize] & (1 << pipe) > 0
    }

    pub fn channel(&self) -> u8 {
        self.regs[registers::RF_CH as usize]
    }

    pub fn plos(&self) -> u8 {
        self.plos
    }

    pub fn max_rt(&self) -> bool {
        self.max_rt
    }

    pub fn rx_pending(&self) -> usize {
        self.rx_fifo.len()
    }

    /// The level of the active low IRQ line.
    pub fn irq_asserted(&self) -> bool {
        let config = self.regs[registers::CONFIG as usize];
        (self.rx_dr && config & 0x40 == 0)
            || (self.tx_ds && config & 0x20 == 0)
            || (self.max_rt && config & 0x10 == 0)
    }

    fn pipe_address(&self, pipe: u8) -> [u8; 5] {
        match pipe {
            0 => self.rx_p0,
            1 => self.rx_p1,
            _ => {
                let mut address = self.rx_p1;
                address[0] = self.regs[(registers::RX_ADDR_P0 + pipe) as usize];
                address
            }
        }
    }

    /// The pipe that would receive a frame sent to `address`.
    fn accepts(&self, address: &[u8]) -> Option<u8> {
        if !self.is_powered() || !self.is_rx() {
            return None;
        }
        let width = self.width();
        (0..6).find(|pipe| {
            self.is_pipe_open(*pipe) && self.pipe_address(*pipe)[..width] == address[..width]
        })
    }

    fn read_register(&self, register: u8, data: &mut [u8]) {
        let address = match register {
            registers::RX_ADDR_P0 => Some(self.rx_p0),
            registers::RX_ADDR_P1 => Some(self.rx_p1),
            registers::TX_ADDR => Some(self.tx_addr),
            _ => None,
        };
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = match (register, address) {
                (_, Some(address)) => address.get(i).copied().unwrap_or(0),
                (registers::STATUS, _) => self.status(),
                (registers::FIFO_STATUS, _) => self.fifo_status(),
                (registers::OBSERVE_TX, _) => (self.plos << 4) | self.arc,
                _ => self.regs[register as usize],
            };
        }
    }

    fn write_register(&mut self, register: u8, data: &[u8]) {
        let Some(first) = data.first().copied() else {
            return;
        };
        let len = data.len().min(5);
        match register {
            registers::STATUS => {
                self.rx_dr &= first & 0x40 == 0;
                self.tx_ds &= first & 0x20 == 0;
                self.max_rt &= first & 0x10 == 0;
            }
            registers::RX_ADDR_P0 => self.rx_p0[..len].copy_from_slice(&data[..len]),
            registers::RX_ADDR_P1 => self.rx_p1[..len].copy_from_slice(&data[..len]),
            registers::TX_ADDR => self.tx_addr[..len].copy_from_slice(&data[..len]),
            registers::RF_CH => {
                self.regs[registers::RF_CH as usize] = first;
                self.plos = 0;
            }
            _ => self.regs[register as usize] = first,
        }
    }

    /// Execute one SPI command. Returns `true` if a payload should go on air.
    fn command(&mut self, buf: &mut [u8]) -> bool {
        let command = buf[0];
        let data = &mut buf[1..];
        match command {
            0x00..=0x1F => self.read_register(command & commands::REGISTER_MASK, data),
            0x20..=0x3F => self.write_register(command & commands::REGISTER_MASK, data),
            commands::R_RX_PL_WID => {
                if let Some(first) = data.first_mut() {
                    *first = self.rx_fifo.front().map_or(0, |(_, payload)| payload.len() as u8);
                }
            }
            commands::R_RX_PAYLOAD => {
                if let Some((_, payload)) = self.rx_fifo.pop_front() {
                    let len = data.len().min(payload.len());
                    data[..len].copy_from_slice(&payload[..len]);
                }
            }
            commands::W_TX_PAYLOAD | commands::W_TX_PAYLOAD_NO_ACK => {
                if self.tx_fifo.len() < FIFO_DEPTH {
                    self.tx_fifo.push_back(data.to_vec());
                }
                return self.is_powered() && !self.is_rx();
            }
            commands::FLUSH_TX => self.tx_fifo.clear(),
            commands::FLUSH_RX => self.rx_fifo.clear(),
            // NOP and ACK payloads
            _ => (),
        }
        false
    }
}

#[derive(Default)]
pub struct Ether {
    chips: Vec<Chip>,
}

impl Ether {
    pub fn chip(&self, index: usize) -> &Chip {
        &self.chips[index]
    }

    fn transfer(&mut self, index: usize, buf: &mut [u8]) -> Result<(), SimFault> {
        if buf.is_empty() {
            return Ok(());
        }
        if self.chips[index].fail_tx_payload
            && matches!(buf[0], commands::W_TX_PAYLOAD | commands::W_TX_PAYLOAD_NO_ACK)
        {
            return Err(SimFault);
        }
        let status = self.chips[index].status();
        let on_air = self.chips[index].command(buf);
        buf[0] = status;
        if on_air {
            self.transmit(index);
        }
        Ok(())
    }

    fn transmit(&mut self, from: usize) {
        while let Some(payload) = self.chips[from].tx_fifo.front().cloned() {
            if self.chips[from].max_rt {
                // a lost frame blocks the TX FIFO until it is flushed
                return;
            }
            let address = self.chips[from].tx_addr;
            let receiver = (0..self.chips.len())
                .filter(|index| *index != from)
                .find_map(|index| self.chips[index].accepts(&address).map(|pipe| (index, pipe)));
            match receiver {
                Some((to, pipe)) if self.chips[to].rx_fifo.len() < FIFO_DEPTH => {
                    let receiver = &mut self.chips[to];
                    receiver.rx_fifo.push_back((pipe, payload));
                    receiver.rx_dr = true;
                    let sender = &mut self.chips[from];
                    sender.tx_fifo.pop_front();
                    sender.tx_ds = true;
                    sender.arc = 0;
                }
                _ => {
                    let sender = &mut self.chips[from];
                    sender.max_rt = true;
                    sender.arc = sender.regs[registers::SETUP_RETR as usize] & 0xF;
                    sender.plos = (sender.plos + 1).min(15);
                    return;
                }
            }
        }
    }
}

/// A bus error injected with [`Chip::fail_tx_payload`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimFault;

impl SpiError for SimFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct SimSpi {
    ether: Rc<RefCell<Ether>>,
    index: usize,
}

impl SpiErrorType for SimSpi {
    type Error = SimFault;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for operation in operations.iter_mut() {
            match operation {
                Operation::TransferInPlace(buf) => {
                    self.ether.borrow_mut().transfer(self.index, buf)?
                }
                Operation::Write(buf) => {
                    let mut copy = buf.to_vec();
                    self.ether.borrow_mut().transfer(self.index, &mut copy)?;
                }
                _ => (),
            }
        }
        Ok(())
    }
}

pub struct SimPin;

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub type SimDevice = SocketDevice<SimSpi, SimPin, NoopDelay>;

#[derive(Clone, Default)]
pub struct Net {
    ether: Rc<RefCell<Ether>>,
}

impl Net {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chip to the air and return the index it is known by.
    pub fn add_chip(&self) -> usize {
        let mut ether = self.ether.borrow_mut();
        ether.chips.push(Chip::new());
        ether.chips.len() - 1
    }

    /// A separate SPI handle for the chip at `index`.
    pub fn spi(&self, index: usize) -> SimSpi {
        SimSpi {
            ether: self.ether.clone(),
            index,
        }
    }

    /// A started socket device at node `addr`.
    pub fn node(&self, addr: u32) -> (SimDevice, usize) {
        let index = self.add_chip();
        let radio = Nrf24p::new(SimPin, self.spi(index), NoopDelay);
        let mut device = SocketDevice::new(radio, addr);
        device.begin().unwrap();
        (device, index)
    }

    pub fn with_chip<R>(&self, index: usize, f: impl FnOnce(&Chip) -> R) -> R {
        f(self.ether.borrow().chip(index))
    }

    pub fn with_chip_mut<R>(&self, index: usize, f: impl FnOnce(&mut Chip) -> R) -> R {
        f(&mut self.ether.borrow_mut().chips[index])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Datagram {
        dest_port: u16,
        payload: Vec<u8>,
        src: SocketAddr,
    },
    Data {
        id: EndpointId,
        payload: Vec<u8>,
    },
    Connected {
        id: EndpointId,
        peer: SocketAddr,
    },
    Disconnected {
        id: EndpointId,
    },
}

/// A [`SocketHandler`] that records everything it is told.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub requests: Vec<(u16, SocketAddr)>,
    pub refuse: bool,
}

impl Recorder {
    pub fn take(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.events)
    }
}

impl SocketHandler for Recorder {
    fn on_datagram(&mut self, dest_port: u16, payload: &[u8], src: SocketAddr) {
        self.events.push(Event::Datagram {
            dest_port,
            payload: payload.to_vec(),
            src,
        });
    }

    fn on_data(&mut self, id: EndpointId, payload: &[u8]) {
        self.events.push(Event::Data {
            id,
            payload: payload.to_vec(),
        });
    }

    fn on_connect_request(&mut self, server_port: u16, src: SocketAddr) -> bool {
        self.requests.push((server_port, src));
        !self.refuse
    }

    fn on_connected(&mut self, id: EndpointId, peer: SocketAddr) {
        self.events.push(Event::Connected { id, peer });
    }

    fn on_disconnected(&mut self, id: EndpointId) {
        self.events.push(Event::Disconnected { id });
    }
}

/// Process whatever the radio received, as the task would after an IRQ.
pub fn pump(device: &mut SimDevice, handler: &mut Recorder) {
    device.on_event(IrqEvent::DataReady, handler).unwrap();
}
