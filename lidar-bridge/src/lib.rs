mod bridge_threads;
mod config;
mod constants;
mod encode;
mod error;
mod mock;
mod numeric;
mod packet;
mod serial;
mod server;
mod time;

use crate::bridge_threads::{deliver_frames, ingest_packets};
use crate::mock::{SyntheticLidar, MOCK_RADIUS_M, MOCK_ROTATION_PERIOD_MS};
use crate::serial::{PacketSource, SerialLidar};
use crate::server::bind_listener;
use crossbeam_channel::{bounded, unbounded};
use std::net::SocketAddr;
use tracing::info;

pub use crate::bridge_threads::BridgeThreads;
pub use crate::config::BridgeConfig;
pub use crate::encode::Frame;
pub use crate::error::BridgeError;

/// Function to launch the bridge.
///
/// Opens the sensor (real or synthetic, per `config.mock`) and binds the
/// listening socket before spawning either loop, so a startup failure of one
/// side never leaves the other running on its own. Returns the thread
/// handles and the bound listen address.
pub fn run_bridge(config: &BridgeConfig) -> Result<(BridgeThreads, SocketAddr), BridgeError> {
    let source: Box<dyn PacketSource> = if config.mock {
        Box::new(SyntheticLidar::new(MOCK_RADIUS_M, MOCK_ROTATION_PERIOD_MS))
    } else {
        Box::new(SerialLidar::open(
            &config.device,
            config.baud_rate,
            config.serial_timeout_ms,
        )?)
    };

    let listener = bind_listener(&config.address, config.port)?;
    let local_addr = listener.local_addr()?;
    info!("Created server at {local_addr}");

    let (ingest_terminator_tx, ingest_terminator_rx) = bounded(10);
    let (delivery_terminator_tx, delivery_terminator_rx) = bounded(10);
    let (frame_tx, frame_rx) = unbounded::<Frame>();

    let ingest_thread = Some(std::thread::spawn(move || {
        ingest_packets(source, frame_tx, ingest_terminator_rx);
    }));

    let accept_timeout_ms = config.accept_timeout_ms;
    let delivery_thread = Some(std::thread::spawn(move || {
        deliver_frames(listener, frame_rx, delivery_terminator_rx, accept_timeout_ms);
    }));

    let bridge_threads = BridgeThreads {
        ingest_terminator_tx,
        delivery_terminator_tx,
        ingest_thread,
        delivery_thread,
    };

    Ok((bridge_threads, local_addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EXPECTED_PACKET_LENGTH, PACKET_HEADER};
    use crate::time::sleep_ms;
    use lidar_data::{point_to_distance, SPOT_POSITION_MASK};
    use serialport::{SerialPort, TTYPort};
    use std::io::{Read, Write};
    use std::net::TcpStream;

    fn test_config(device: &str) -> BridgeConfig {
        BridgeConfig {
            address: "127.0.0.1".to_string(),
            port: 0,
            device: device.to_string(),
            serial_timeout_ms: 100,
            accept_timeout_ms: 10,
            ..BridgeConfig::default()
        }
    }

    fn full_packet() -> Vec<u8> {
        let mut packet = PACKET_HEADER.to_vec();
        packet.extend_from_slice(&[0x00, 0x00]); // status
        packet.extend_from_slice(&[0xF4, 0x01]); // 500 ms rotation
        packet.extend_from_slice(&[0x2C, 0x01].repeat(360));
        assert_eq!(packet.len(), EXPECTED_PACKET_LENGTH);
        packet
    }

    fn read_one_frame(addr: SocketAddr) -> Vec<u8> {
        let mut stream = TcpStream::connect(addr).unwrap();
        let mut frame = Vec::new();
        stream.read_to_end(&mut frame).unwrap();
        frame
    }

    #[test]
    fn test_bridge_relays_one_packet_as_hex_text() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");

        master.write_all(&full_packet()).unwrap();
        sleep_ms(10);

        let name = slave.name().unwrap();
        let (bridge, addr) = run_bridge(&test_config(&name)).unwrap();

        let frame = read_one_frame(addr);
        assert_eq!(frame.len(), 1440);
        assert_eq!(frame, b"012c".repeat(360));

        drop(bridge);
    }

    #[test]
    fn test_short_packet_is_dropped_not_forwarded() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");

        let name = slave.name().unwrap();
        let (bridge, addr) = run_bridge(&test_config(&name)).unwrap();

        // Ten bytes, then silence: the read times out and the fragment is
        // rejected without producing a frame.
        master.write_all(&full_packet()[..10]).unwrap();
        sleep_ms(300);

        master.write_all(&full_packet()).unwrap();

        // The first frame a client ever sees comes from the full packet.
        let frame = read_one_frame(addr);
        assert_eq!(frame, b"012c".repeat(360));

        drop(bridge);
    }

    #[test]
    fn test_queue_retains_frames_for_a_late_client() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");

        let name = slave.name().unwrap();
        let (bridge, addr) = run_bridge(&test_config(&name)).unwrap();

        // Two packets ingested while no client is connected.
        master.write_all(&full_packet()).unwrap();
        sleep_ms(150);
        master.write_all(&full_packet()).unwrap();
        sleep_ms(150);

        // Each connection gets exactly one frame, oldest first.
        assert_eq!(read_one_frame(addr), b"012c".repeat(360));
        assert_eq!(read_one_frame(addr), b"012c".repeat(360));

        drop(bridge);
    }

    #[test]
    fn test_mock_mode_serves_decodable_frames() {
        let config = BridgeConfig {
            address: "127.0.0.1".to_string(),
            port: 0,
            accept_timeout_ms: 10,
            mock: true,
            ..BridgeConfig::default()
        };
        let (bridge, addr) = run_bridge(&config).unwrap();

        let frame = read_one_frame(addr);
        assert_eq!(frame.len(), 1440);

        // Undo the wire format: hex text -> bytes -> big-endian words.
        let bytes: Vec<u8> = frame
            .chunks_exact(2)
            .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
            .collect();
        assert_eq!(bytes.len(), 720);
        for pair in bytes.chunks_exact(2) {
            let raw = u16::from_be_bytes([pair[0], pair[1]]);
            let distance = point_to_distance(raw & SPOT_POSITION_MASK);
            assert!(
                (distance - 5.0).abs() < 0.05,
                "expected the mock circle radius, got {} m",
                distance
            );
        }

        drop(bridge);
    }
}
