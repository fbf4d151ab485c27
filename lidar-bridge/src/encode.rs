/// One encoded unit handed from ingestion to delivery: the sample region of
/// an accepted packet, byte-swapped and expanded to lowercase ASCII hex.
pub type Frame = Vec<u8>;

/// Swaps each consecutive pair of bytes. The sample words arrive
/// little-endian; the downstream client expects them big-endian.
pub(crate) fn swap_endianness(data: &[u8]) -> Vec<u8> {
    debug_assert!(data.len() % 2 == 0);
    let mut out = Vec::with_capacity(data.len());
    for pair in data.chunks_exact(2) {
        out.push(pair[1]);
        out.push(pair[0]);
    }
    out
}

/// Expands every byte to two lowercase hex characters. Doubles the payload
/// size, but keeps it text-safe for the downstream consumer.
pub(crate) fn to_hex_text(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    for byte in data {
        out.extend_from_slice(format!("{:02x}", byte).as_bytes());
    }
    out
}

pub(crate) fn encode_frame(samples: &[u8]) -> Frame {
    to_hex_text(&swap_endianness(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAMPLE_DATA_SIZE;

    #[test]
    fn test_swap_endianness() {
        assert_eq!(swap_endianness(&[0x2C, 0x01]), [0x01, 0x2C]);
        assert_eq!(
            swap_endianness(&[0x01, 0x02, 0x03, 0x04]),
            [0x02, 0x01, 0x04, 0x03]
        );
    }

    #[test]
    fn test_swap_endianness_is_an_involution() {
        let data: Vec<u8> = (0u16..720).map(|e| (e % 251) as u8).collect();
        assert_eq!(swap_endianness(&swap_endianness(&data)), data);
    }

    #[test]
    fn test_to_hex_text() {
        assert_eq!(to_hex_text(&[0x1A]), b"1a");
        assert_eq!(to_hex_text(&[0x00, 0xFF, 0x0B]), b"00ff0b");
    }

    #[test]
    fn test_hex_text_doubles_length_and_is_injective() {
        let data: Vec<u8> = (0u16..=255).map(|e| e as u8).collect();
        let encoded = to_hex_text(&data);
        assert_eq!(encoded.len(), 2 * data.len());

        let decoded: Vec<u8> = encoded
            .chunks_exact(2)
            .map(|pair| {
                let text = std::str::from_utf8(pair).unwrap();
                u8::from_str_radix(text, 16).unwrap()
            })
            .collect();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_encode_frame() {
        let samples = [0x2C, 0x01].repeat(360);
        let frame = encode_frame(&samples);
        assert_eq!(frame.len(), 2 * SAMPLE_DATA_SIZE);
        assert_eq!(frame, b"012c".repeat(360));
    }
}
