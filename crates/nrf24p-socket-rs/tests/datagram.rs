mod common;

use common::{pump, Event, Net, Recorder};
use nrf24p::radio::prelude::*;
use nrf24p_socket::{
    addr::{pipe_address, DATAGRAM_PIPE},
    prelude::*,
    wire::{Request, DATAGRAM_MAX},
    SocketAddr,
};

const NODE_A: u32 = 0xC05A0001;
const NODE_B: u32 = 0xC05A0002;

#[test]
fn every_length_arrives_intact() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, _) = net.node(NODE_B);
    let mut handler = Recorder::default();
    for len in 1..=DATAGRAM_MAX {
        let payload: Vec<u8> = (0..len as u8).collect();
        assert_eq!(
            a.send(7, &payload, SocketAddr::new(NODE_B, 9)).unwrap() as usize,
            len
        );
        pump(&mut b, &mut handler);
        assert_eq!(
            handler.take(),
            vec![Event::Datagram {
                dest_port: 9,
                payload,
                src: SocketAddr::new(NODE_A, 7),
            }]
        );
    }
}

#[test]
fn oversized_is_truncated() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, _) = net.node(NODE_B);
    let payload = [0xA5u8; 30];
    assert_eq!(
        a.send(7, &payload, SocketAddr::new(NODE_B, 9)).unwrap() as usize,
        DATAGRAM_MAX
    );
    let mut handler = Recorder::default();
    pump(&mut b, &mut handler);
    assert_eq!(
        handler.take(),
        vec![Event::Datagram {
            dest_port: 9,
            payload: payload[..DATAGRAM_MAX].to_vec(),
            src: SocketAddr::new(NODE_A, 7),
        }]
    );
}

#[test]
fn empty_send_transmits_nothing() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, b_chip) = net.node(NODE_B);
    assert_eq!(a.send(7, &[], SocketAddr::new(NODE_B, 9)).unwrap(), 0);
    assert_eq!(a.radio().tx_count(), 0);
    assert_eq!(net.with_chip(b_chip, |chip| chip.rx_pending()), 0);
    let mut handler = Recorder::default();
    pump(&mut b, &mut handler);
    assert!(handler.take().is_empty());
}

#[test]
fn short_frame_is_consumed() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, _) = net.node(NODE_B);
    // too short for a header
    let radio = a.radio_mut();
    radio
        .set_transmitter_mode(&pipe_address(NODE_B, DATAGRAM_PIPE))
        .unwrap();
    assert_eq!(radio.send(&[1, 2, 3, 4]).unwrap(), 4);
    radio
        .set_receiver_mode(&pipe_address(NODE_A, DATAGRAM_PIPE))
        .unwrap();

    assert!(b.available().unwrap());
    let mut buf = [0u8; 32];
    let mut dest_port = 0;
    let mut src = SocketAddr::default();
    assert_eq!(b.recv(&mut buf, &mut dest_port, &mut src).unwrap(), 0);
    assert!(!b.available().unwrap());
}

#[test]
fn request_shaped_datagram_on_plain_port() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, _) = net.node(NODE_B);
    // looks like a CONNECT_REQUEST, but nobody listens on port 9
    let request = [1u8, 0, 0];
    assert!(Request::decode(&request).is_some());
    a.send(7, &request, SocketAddr::new(NODE_B, 9)).unwrap();
    let mut handler = Recorder::default();
    pump(&mut b, &mut handler);
    assert_eq!(
        handler.take(),
        vec![Event::Datagram {
            dest_port: 9,
            payload: request.to_vec(),
            src: SocketAddr::new(NODE_A, 7),
        }]
    );
    assert!(handler.requests.is_empty());
}

#[test]
fn polled_recv() {
    let net = Net::new();
    let (mut a, _) = net.node(NODE_A);
    let (mut b, _) = net.node(NODE_B);
    let mut buf = [0u8; 32];
    let mut dest_port = 0;
    let mut src = SocketAddr::default();
    assert!(!b.available().unwrap());
    assert_eq!(b.recv(&mut buf, &mut dest_port, &mut src).unwrap(), 0);

    a.send(7, b"hello", SocketAddr::new(NODE_B, 9)).unwrap();
    a.send(8, b"world!", SocketAddr::new(NODE_B, 10)).unwrap();
    assert!(b.available().unwrap());
    assert_eq!(b.recv(&mut buf, &mut dest_port, &mut src).unwrap(), 5);
    assert_eq!(&buf[..5], b"hello");
    assert_eq!((dest_port, src), (9, SocketAddr::new(NODE_A, 7)));

    // a short buffer only gets what fits
    let mut short = [0u8; 3];
    assert_eq!(b.recv(&mut short, &mut dest_port, &mut src).unwrap(), 3);
    assert_eq!(&short, b"wor");
    assert_eq!((dest_port, src), (10, SocketAddr::new(NODE_A, 8)));
    assert!(!b.available().unwrap());
}

#[test]
fn unreachable_node() {
    let net = Net::new();
    let (mut a, index) = net.node(NODE_A);
    // queued, but never acknowledged
    assert_eq!(a.send(7, b"anyone?", SocketAddr::new(0xDEAD, 9)).unwrap(), 7);
    assert!(a.radio_mut().is_max_retransmit().unwrap());
    assert_eq!(net.with_chip(index, |chip| chip.plos()), 1);

    // the next send discards the lost frame first
    let (mut b, _) = net.node(NODE_B);
    assert_eq!(a.send(7, b"again", SocketAddr::new(NODE_B, 9)).unwrap(), 5);
    assert!(!a.radio_mut().is_max_retransmit().unwrap());
    let mut handler = Recorder::default();
    pump(&mut b, &mut handler);
    assert_eq!(handler.take().len(), 1);
}

#[test]
fn saturated_loss_relocks() {
    let net = Net::new();
    let (mut a, index) = net.node(NODE_A);
    for _ in 0..20 {
        a.send(7, b"lost", SocketAddr::new(0xDEAD, 9)).unwrap();
    }
    assert!(a.radio_mut().is_max_lost().unwrap());
    assert_eq!(a.radio_mut().flush().unwrap(), 0xFF);
    assert_eq!(net.with_chip(index, |chip| chip.plos()), 0);
    assert!(!a.radio_mut().is_max_lost().unwrap());
    // a second flush does not relock again
    assert_ne!(a.radio_mut().flush().unwrap(), 0xFF);
}
