//! Hand-off from the radio's IRQ line to task context.
//!
//! The [`IrqBridge`] is the only code meant to run inside the interrupt
//! handler. It uses its own SPI handle (a second [`SpiDevice`] on the same
//! bus), acknowledges RX_DR and posts an [`IrqEvent`] for the task that
//! owns the [`SocketDevice`](crate::SocketDevice). Payloads are never
//! read in interrupt context.
//!
//! ```ignore
//! let mut queue = heapless::spsc::Queue::<IrqEvent, 4>::new();
//! let (mut producer, mut consumer) = queue.split();
//! let mut bridge = IrqBridge::new(irq_spi, move |event: IrqEvent| {
//!     producer.enqueue(event).is_ok()
//! });
//!
//! // in the IRQ handler
//! bridge.on_interrupt().ok();
//!
//! // in the task
//! while let Some(event) = consumer.dequeue() {
//!     device.on_event(event, &mut handler)?;
//! }
//! ```

use embedded_hal::spi::SpiDevice;
use nrf24p::{
    radio::{commands, mnemonics, registers},
    StatusFlags,
};

/// A token telling the task what the radio needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqEvent {
    /// At least one payload is waiting in the RX FIFO.
    DataReady,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for IrqEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            IrqEvent::DataReady => defmt::write!(fmt, "DataReady"),
        }
    }
}

/// Somewhere to post [`IrqEvent`]s without blocking.
///
/// Any `FnMut(IrqEvent) -> bool` is a sink, so the producer half of a
/// lock-free queue (like `heapless::spsc`) is wrapped in a closure.
pub trait EventSink {
    /// Returns `false` if the event was dropped.
    fn post(&mut self, event: IrqEvent) -> bool;
}

impl<F: FnMut(IrqEvent) -> bool> EventSink for F {
    fn post(&mut self, event: IrqEvent) -> bool {
        self(event)
    }
}

pub struct IrqBridge<SPI, Q> {
    spi: SPI,
    sink: Q,
}

impl<SPI, Q> IrqBridge<SPI, Q>
where
    SPI: SpiDevice,
    Q: EventSink,
{
    pub fn new(spi: SPI, sink: Q) -> Self {
        Self { spi, sink }
    }

    /// Service a falling edge on the IRQ line.
    ///
    /// Returns `true` if a [`IrqEvent::DataReady`] was posted. Other
    /// interrupt sources (TX_DS, MAX_RT) are left for the task to poll.
    pub fn on_interrupt(&mut self) -> Result<bool, SPI::Error> {
        let mut buf = [commands::NOP];
        self.spi.transfer_in_place(&mut buf)?;
        if !StatusFlags::from_bits(buf[0]).rx_dr() {
            return Ok(false);
        }
        let mut buf = [
            commands::W_REGISTER | registers::STATUS,
            mnemonics::MASK_RX_DR,
        ];
        self.spi.transfer_in_place(&mut buf)?;
        let posted = self.sink.post(IrqEvent::DataReady);
        if !posted {
            // the task still drains every payload on its next event
            #[cfg(all(feature = "defmt", target_os = "none"))]
            defmt::warn!("IRQ event queue is full");
        }
        Ok(posted)
    }

    /// Give back the SPI handle and the sink.
    pub fn release(self) -> (SPI, Q) {
        (self.spi, self.sink)
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{IrqBridge, IrqEvent};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use heapless::spsc::Queue;
    use nrf24p::radio::{commands, registers};
    use std::vec;

    #[test]
    fn acknowledges_rx_dr() {
        let spi_expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![commands::NOP], vec![0x40]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(
                vec![registers::STATUS | commands::W_REGISTER, 0x40],
                vec![0x40, 0],
            ),
            SpiTransaction::transaction_end(),
        ];
        let mut queue = Queue::<IrqEvent, 4>::new();
        let (mut producer, mut consumer) = queue.split();
        let mut bridge = IrqBridge::new(SpiMock::new(&spi_expectations), |event: IrqEvent| {
            producer.enqueue(event).is_ok()
        });
        assert!(bridge.on_interrupt().unwrap());
        assert_eq!(consumer.dequeue(), Some(IrqEvent::DataReady));
        assert_eq!(consumer.dequeue(), None);
        let (mut spi, _) = bridge.release();
        spi.done();
    }

    #[test]
    fn ignores_other_sources() {
        let spi_expectations = [
            SpiTransaction::transaction_start(),
            // TX_DS and MAX_RT
            SpiTransaction::transfer_in_place(vec![commands::NOP], vec![0x3E]),
            SpiTransaction::transaction_end(),
        ];
        let mut queue = Queue::<IrqEvent, 4>::new();
        let (mut producer, mut consumer) = queue.split();
        let mut bridge = IrqBridge::new(SpiMock::new(&spi_expectations), |event: IrqEvent| {
            producer.enqueue(event).is_ok()
        });
        assert!(!bridge.on_interrupt().unwrap());
        assert_eq!(consumer.dequeue(), None);
        let (mut spi, _) = bridge.release();
        spi.done();
    }

    #[test]
    fn full_sink() {
        let spi_expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(vec![commands::NOP], vec![0x4E]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer_in_place(
                vec![registers::STATUS | commands::W_REGISTER, 0x40],
                vec![0x4E, 0],
            ),
            SpiTransaction::transaction_end(),
        ];
        let mut bridge = IrqBridge::new(SpiMock::new(&spi_expectations), |_: IrqEvent| false);
        // RX_DR is acknowledged even if the event is dropped
        assert!(!bridge.on_interrupt().unwrap());
        let (mut spi, _) = bridge.release();
        spi.done();
    }
}
