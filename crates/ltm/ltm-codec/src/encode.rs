use ltm_events::{FrameKind, HEADER_1, HEADER_2};

use crate::checksum::xor_checksum;

/// Builds the wire bytes for one frame: header, kind tag, payload, checksum.
///
/// The payload is written as given; callers are responsible for its length
/// matching `kind.payload_len()`.
pub fn encode_frame(kind: FrameKind, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 4);
    out.push(HEADER_1);
    out.push(HEADER_2);
    out.push(kind.tag());
    out.extend_from_slice(payload);
    out.push(xor_checksum(payload));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let bytes = encode_frame(FrameKind::Attitude, &[1, 0, 2, 0, 3, 0]);
        assert_eq!(bytes, vec![b'$', b'T', b'A', 1, 0, 2, 0, 3, 0, 1 ^ 2 ^ 3]);
    }
}
