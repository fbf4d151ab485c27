use crate::constants::{
    EXPECTED_PACKET_LENGTH, PACKET_HEADER, PACKET_HEADER_SIZE, ROTATION_OFFSET, SAMPLE_DATA_OFFSET,
    STATUS_OFFSET,
};
use crate::error::BridgeError;
use crate::numeric::{to_string, to_u16};

fn validate_packet(packet: &[u8]) -> Result<(), BridgeError> {
    if packet.len() < EXPECTED_PACKET_LENGTH {
        return Err(BridgeError::PacketTooShort(packet.len()));
    }
    if packet[..PACKET_HEADER_SIZE] != PACKET_HEADER {
        return Err(BridgeError::InvalidHeader(to_string(
            &packet[..PACKET_HEADER_SIZE],
        )));
    }
    Ok(())
}

/// Strips header, status and rotation fields in one pass and returns the
/// 720-byte sample region. The length check guarantees a full packet, so
/// the strip is a single unconditional 8-byte cut. No resynchronization is
/// attempted; a read that does not start on a packet boundary is rejected
/// by the header check.
pub(crate) fn strip_packet(packet: &[u8]) -> Result<&[u8], BridgeError> {
    validate_packet(packet)?;
    Ok(&packet[SAMPLE_DATA_OFFSET..EXPECTED_PACKET_LENGTH])
}

/// Status word of the packet. Opaque, carried for future use.
pub(crate) fn status(packet: &[u8]) -> u16 {
    to_u16(packet[STATUS_OFFSET], packet[STATUS_OFFSET + 1])
}

/// Duration of the last full rotation in milliseconds.
pub(crate) fn rotation_duration_ms(packet: &[u8]) -> u16 {
    to_u16(packet[ROTATION_OFFSET], packet[ROTATION_OFFSET + 1])
}
