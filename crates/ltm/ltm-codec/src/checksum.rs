/// XOR of every payload byte.
///
/// Header and kind byte are not covered, only the payload.
#[inline]
pub fn xor_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(xor_checksum(&[]), 0x00);
        assert_eq!(xor_checksum(&[0xFF]), 0xFF);
        assert_eq!(xor_checksum(&[0x01, 0x02]), 0x03);
        assert_eq!(xor_checksum(&[0u8; 14]), 0x00);
        assert_eq!(xor_checksum(&[0x01, 0x00, 0x00, 0x00, 0x67, 0x01]), 0x67);
    }

    #[test]
    fn identical_bytes_cancel_in_pairs() {
        for n in 1..=9usize {
            let bytes = vec![0xA5u8; n];
            let want = if n % 2 == 1 { 0xA5 } else { 0x00 };
            assert_eq!(xor_checksum(&bytes), want, "n = {n}");
        }
    }
}
