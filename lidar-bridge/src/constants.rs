pub(crate) const PACKET_HEADER: [u8; 4] = [0xAA, 0xBB, 0xCC, 0xDD];
pub(crate) const PACKET_HEADER_SIZE: usize = 4;
pub(crate) const STATUS_SIZE: usize = 2;
pub(crate) const ROTATION_SIZE: usize = 2;
pub(crate) const N_SAMPLES: usize = 360;
pub(crate) const SAMPLE_DATA_SIZE: usize = N_SAMPLES * 2;
pub(crate) const EXPECTED_PACKET_LENGTH: usize =
    PACKET_HEADER_SIZE + STATUS_SIZE + ROTATION_SIZE + SAMPLE_DATA_SIZE;

pub(crate) const STATUS_OFFSET: usize = PACKET_HEADER_SIZE;
pub(crate) const ROTATION_OFFSET: usize = STATUS_OFFSET + STATUS_SIZE;
pub(crate) const SAMPLE_DATA_OFFSET: usize = ROTATION_OFFSET + ROTATION_SIZE;

pub(crate) const READ_POLL_INTERVAL_MS: u64 = 10;
pub(crate) const DEQUEUE_POLL_INTERVAL_MS: u64 = 100;
