use crate::constants::{EXPECTED_PACKET_LENGTH, READ_POLL_INTERVAL_MS};
use crate::error::BridgeError;
use crate::time::sleep_ms;
use serialport::SerialPort;
use std::io::Read;

/// One logical sensor read per call. The device handle is released when the
/// source is dropped. Implemented by the real serial transport and by the
/// synthetic generator, selected at construction time.
pub trait PacketSource: Send {
    /// Reads one packet worth of bytes. Returns fewer than
    /// `EXPECTED_PACKET_LENGTH` bytes (possibly none) when the device did not
    /// deliver a full packet within the read timeout.
    fn read_packet(&mut self) -> Result<Vec<u8>, BridgeError>;
}

pub struct SerialLidar {
    port: Box<dyn SerialPort>,
    n_read_trials: u64,
}

impl SerialLidar {
    pub fn open(path: &str, baud_rate: u32, timeout_ms: u64) -> Result<SerialLidar, BridgeError> {
        let port = serialport::new(path, baud_rate)
            .timeout(std::time::Duration::from_millis(READ_POLL_INTERVAL_MS))
            .open()?;
        Ok(SerialLidar {
            port,
            n_read_trials: (timeout_ms / READ_POLL_INTERVAL_MS).max(1),
        })
    }
}

fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize, BridgeError> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

fn read(port: &mut Box<dyn SerialPort>, data_size: usize) -> Result<Vec<u8>, BridgeError> {
    let mut packet: Vec<u8> = vec![0; data_size];
    port.read_exact(packet.as_mut_slice())?;
    Ok(packet)
}

impl PacketSource for SerialLidar {
    fn read_packet(&mut self) -> Result<Vec<u8>, BridgeError> {
        for _ in 0..self.n_read_trials {
            let n_read = get_n_read(&mut self.port)?;
            if n_read >= EXPECTED_PACKET_LENGTH {
                return read(&mut self.port, EXPECTED_PACKET_LENGTH);
            }
            sleep_ms(READ_POLL_INTERVAL_MS);
        }
        // Timed out. Surface whatever arrived so the caller can log and
        // reject it instead of silently accumulating a partial packet.
        let n_read = get_n_read(&mut self.port)?;
        if n_read == 0 {
            return Ok(Vec::new());
        }
        read(&mut self.port, n_read.min(EXPECTED_PACKET_LENGTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PACKET_HEADER;
    use serialport::TTYPort;
    use std::io::Write;

    #[test]
    fn test_read_packet_full() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let mut lidar = SerialLidar::open(&slave.name().unwrap(), 115200, 100).unwrap();

        let mut packet = PACKET_HEADER.to_vec();
        packet.extend_from_slice(&[0x00, 0x00, 0xF4, 0x01]);
        packet.extend_from_slice(&[0x2C, 0x01].repeat(360));
        master.write_all(&packet).unwrap();

        let data = lidar.read_packet().unwrap();
        assert_eq!(data, packet);
    }

    #[test]
    fn test_read_packet_times_out_with_partial_data() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let mut lidar = SerialLidar::open(&slave.name().unwrap(), 115200, 100).unwrap();

        master.write_all(&[0xAA, 0xBB, 0xCC]).unwrap();

        let data = lidar.read_packet().unwrap();
        assert_eq!(data, [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_read_packet_times_out_empty() {
        let (_master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let mut lidar = SerialLidar::open(&slave.name().unwrap(), 115200, 100).unwrap();

        let data = lidar.read_packet().unwrap();
        assert!(data.is_empty());
    }
}
