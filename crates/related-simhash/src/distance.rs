use related_core::Fingerprint;

/// Number of differing bits, in `0..=64`. Symmetric and zero on the diagonal.
pub fn distance(a: Fingerprint, b: Fingerprint) -> u32 {
    (a.bits() ^ b.bits()).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [u64; 6] = [0, u64::MAX, 0xdead_beef, 0x5555_5555_5555_5555, 1 << 63, 0x0123_4567_89ab_cdef];

    #[test]
    fn symmetric_bounded_and_reflexive() {
        for &a in &SAMPLES {
            assert_eq!(distance(Fingerprint(a), Fingerprint(a)), 0);
            for &b in &SAMPLES {
                let d = distance(Fingerprint(a), Fingerprint(b));
                assert_eq!(d, distance(Fingerprint(b), Fingerprint(a)));
                assert!(d <= 64);
            }
        }
    }

    #[test]
    fn extremes() {
        assert_eq!(distance(Fingerprint(0), Fingerprint(u64::MAX)), 64);
        assert_eq!(distance(Fingerprint(0b1011), Fingerprint(0b0001)), 2);
    }
}
