// An LTM frame on the wire:
//
//   '$' 'T' <kind> <payload: fixed length per kind> <xor of payload>
//
// The kind byte is an ASCII letter and fully determines the payload length,
// so nothing about the layout is negotiated at runtime.

use crate::records::Channel;

/// First header byte.
pub const HEADER_1: u8 = b'$';
/// Second header byte.
pub const HEADER_2: u8 = b'T';

/// Largest payload of any kind (GPS and Origin).
pub const MAX_PAYLOAD_LEN: usize = 14;

/// The six frame kinds, discriminant = tag byte on the wire.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameKind {
    Gps = b'G',
    Attitude = b'A',
    Status = b'S',
    Origin = b'O',
    Nav = b'N',
    Extra = b'X',
}

impl FrameKind {
    pub const ALL: [FrameKind; 6] = [
        FrameKind::Gps,
        FrameKind::Attitude,
        FrameKind::Status,
        FrameKind::Origin,
        FrameKind::Nav,
        FrameKind::Extra,
    ];

    /// Looks up the kind for a tag byte. `None` for anything outside the table.
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'G' => Some(FrameKind::Gps),
            b'A' => Some(FrameKind::Attitude),
            b'S' => Some(FrameKind::Status),
            b'O' => Some(FrameKind::Origin),
            b'N' => Some(FrameKind::Nav),
            b'X' => Some(FrameKind::Extra),
            _ => None,
        }
    }

    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Payload length in bytes, excluding header, kind and checksum.
    #[inline]
    pub const fn payload_len(self) -> usize {
        match self {
            FrameKind::Gps | FrameKind::Origin => 14,
            FrameKind::Status => 7,
            FrameKind::Attitude | FrameKind::Nav | FrameKind::Extra => 6,
        }
    }

    /// Store channel fed by this kind.
    #[inline]
    pub const fn channel(self) -> Channel {
        match self {
            FrameKind::Gps => Channel::Gps,
            FrameKind::Attitude => Channel::Attitude,
            FrameKind::Status => Channel::Status,
            FrameKind::Origin => Channel::Origin,
            FrameKind::Nav => Channel::Nav,
            FrameKind::Extra => Channel::Extra,
        }
    }

    pub const fn name(self) -> &'static str {
        self.channel().name()
    }
}

/// A checksum-validated frame, prior to payload interpretation.
///
/// Plain old data: the payload lives inline in a fixed buffer sized for the
/// largest kind, so producing a frame never allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame {
    kind: FrameKind,
    len: u8,
    buf: [u8; MAX_PAYLOAD_LEN],
}

impl RawFrame {
    /// Builds a frame from a payload slice.
    ///
    /// The payload may be shorter than `kind.payload_len()` (the decoder
    /// rejects that case), but never longer than [`MAX_PAYLOAD_LEN`].
    pub fn new(kind: FrameKind, payload: &[u8]) -> Option<Self> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        buf[..payload.len()].copy_from_slice(payload);
        Some(Self {
            kind,
            len: payload.len() as u8,
            buf,
        })
    }

    #[inline]
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn tags_round_trip_through_table() {
        for kind in FrameKind::ALL {
            assert_eq!(FrameKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(FrameKind::from_tag(b'Z'), None);
        assert_eq!(FrameKind::from_tag(HEADER_1), None);
    }

    #[test]
    fn payload_lengths_match_wire_format() {
        let lens: Vec<usize> = FrameKind::ALL.iter().map(|k| k.payload_len()).collect();
        assert_eq!(lens, vec![14, 6, 7, 14, 6, 6]);
        assert!(lens.iter().all(|&l| l <= MAX_PAYLOAD_LEN));
    }

    /// RawFrame is copied through the ingestion path by value, so it has to
    /// stay a small byte-aligned POD.
    #[test]
    fn raw_frame_is_small_pod() {
        assert_eq!(size_of::<FrameKind>(), 1);
        assert_eq!(size_of::<RawFrame>(), 16, "RawFrame layout changed");
        assert_eq!(align_of::<RawFrame>(), 1);
    }

    #[test]
    fn raw_frame_rejects_oversized_payload() {
        assert!(RawFrame::new(FrameKind::Nav, &[0u8; 15]).is_none());
        let f = RawFrame::new(FrameKind::Nav, &[1, 2, 3]).unwrap();
        assert_eq!(f.payload(), &[1, 2, 3]);
        assert_eq!(f.kind(), FrameKind::Nav);
    }
}
