//! Common wrapper around the native hash function, which is keccak256 so that
//! leaves and nodes match what EVM contracts compute on-chain.

use alloy_primitives::keccak256;

use crate::buf::Buf32;

/// Direct untagged hash.
pub fn raw(buf: &[u8]) -> Buf32 {
    Buf32::from(keccak256(buf))
}

/// Hashes two tree nodes together, in the order given.
pub fn hash_pair(left: &Buf32, right: &Buf32) -> Buf32 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    raw(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_matches_known_keccak() {
        // keccak256("")
        let expected: Buf32 = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
            .parse()
            .unwrap();
        assert_eq!(raw(&[]), expected);
    }

    #[test]
    fn test_hash_pair_is_ordered() {
        let a = Buf32::from([1; 32]);
        let b = Buf32::from([2; 32]);
        assert_ne!(hash_pair(&a, &b), hash_pair(&b, &a));

        let mut concat = [1u8; 64];
        concat[32..].copy_from_slice(&[2; 32]);
        assert_eq!(hash_pair(&a, &b), raw(&concat));
    }
}
