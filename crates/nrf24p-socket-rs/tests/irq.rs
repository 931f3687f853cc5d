mod common;

use common::{Event, Net, Recorder};
use heapless::spsc::Queue;
use nrf24p_socket::{prelude::*, IrqBridge, IrqEvent, SocketAddr};

const NODE_A: u32 = 0xC05A0001;
const NODE_B: u32 = 0xC05A0002;

#[test]
fn one_event_drains_the_fifo() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, b_chip) = net.node(NODE_B);
    let mut queue = Queue::<IrqEvent, 4>::new();
    let (mut producer, mut consumer) = queue.split();
    let mut bridge = IrqBridge::new(net.spi(b_chip), |event: IrqEvent| {
        producer.enqueue(event).is_ok()
    });

    assert!(!bridge.on_interrupt().unwrap());
    for port in 1..=3 {
        a.send(port, &[port as u8], SocketAddr::new(NODE_B, 9)).unwrap();
    }
    assert!(net.with_chip(b_chip, |chip| chip.irq_asserted()));
    assert!(bridge.on_interrupt().unwrap());
    // RX_DR was acknowledged, but nothing was read
    assert!(!net.with_chip(b_chip, |chip| chip.irq_asserted()));
    assert_eq!(net.with_chip(b_chip, |chip| chip.rx_pending()), 3);

    let mut handler = Recorder::default();
    while let Some(event) = consumer.dequeue() {
        b.on_event(event, &mut handler).unwrap();
    }
    let events = handler.take();
    assert_eq!(events.len(), 3);
    for (port, event) in (1..=3u16).zip(events) {
        assert_eq!(
            event,
            Event::Datagram {
                dest_port: 9,
                payload: vec![port as u8],
                src: SocketAddr::new(NODE_A, port),
            }
        );
    }
    assert_eq!(net.with_chip(b_chip, |chip| chip.rx_pending()), 0);
}

#[test]
fn stale_event_is_harmless() {
    let net = Net::new();
    let (mut b, _) = net.node(NODE_B);
    let mut handler = Recorder::default();
    b.on_event(IrqEvent::DataReady, &mut handler).unwrap();
    assert!(handler.take().is_empty());
}
