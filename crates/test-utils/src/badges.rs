//! Badge fixtures.

use emblem_primitives::{badge::BadgeRecord, buf::Buf20};

/// Deterministic winner address for fixture number `i`.
pub fn winner_for(i: u64) -> Buf20 {
    let mut addr = [0u8; 20];
    addr[..8].copy_from_slice(&i.to_be_bytes());
    addr[19] = 0xe5;
    Buf20::from(addr)
}

/// `n` distinct records in a fixed order, cycling through definition numbers
/// including negative ones.
pub fn sample_records(n: usize) -> Vec<BadgeRecord> {
    (0..n as u64)
        .map(|i| BadgeRecord::new(winner_for(i), ((i % 256) as u8) as i8))
        .collect()
}
