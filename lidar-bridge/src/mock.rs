use crate::constants::{N_SAMPLES, PACKET_HEADER};
use crate::error::BridgeError;
use crate::serial::PacketSource;
use crate::time::sleep_ms;
use lidar_data::{distance_to_point, SPOT_POSITION_BITS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub(crate) const MOCK_RADIUS_M: f64 = 5.0;
pub(crate) const MOCK_ROTATION_PERIOD_MS: u16 = 500;

/// Synthetic sensor standing in for the real lidar: every read yields one
/// full rotation seeing a circular wall at a fixed radius, with noise
/// injected into the reserved sample bits.
pub struct SyntheticLidar {
    radius_m: f64,
    rotation_period_ms: u16,
    rng: StdRng,
}

impl SyntheticLidar {
    pub fn new(radius_m: f64, rotation_period_ms: u16) -> SyntheticLidar {
        SyntheticLidar {
            radius_m,
            rotation_period_ms,
            rng: StdRng::from_entropy(),
        }
    }

    fn generate_circle(&mut self) -> Vec<u8> {
        let mut packet = PACKET_HEADER.to_vec();
        packet.extend_from_slice(&[0x00, 0x00]);
        packet.extend_from_slice(&self.rotation_period_ms.to_le_bytes());
        for _ in 0..N_SAMPLES {
            let point = distance_to_point(self.radius_m);
            let noise: u32 = self.rng.gen_range(0..=500);
            let sample = point | (noise << SPOT_POSITION_BITS) as u16;
            packet.extend_from_slice(&sample.to_le_bytes());
        }
        packet
    }
}

impl PacketSource for SyntheticLidar {
    fn read_packet(&mut self) -> Result<Vec<u8>, BridgeError> {
        // Pace like a real device: one packet per rotation.
        sleep_ms(self.rotation_period_ms.into());
        Ok(self.generate_circle())
    }
}

impl Drop for SyntheticLidar {
    fn drop(&mut self) {
        debug!("Closing mock lidar");
    }
}
