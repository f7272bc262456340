//! Hash functions for the counting Bloom filter
//!
//! Uses MurmurHash3 for fast, high-quality hashing with different seeds.
//! Block hashes are already uniformly distributed, but the filter must also
//! accept arbitrary byte strings, so positions are always re-hashed.

use std::io::Cursor;

/// Hash an element with MurmurHash3 using a seed and tweak
pub fn murmur_hash(element: &[u8], seed: u32, tweak: u32) -> u64 {
    let combined_seed = seed.wrapping_add(tweak);
    let mut cursor = Cursor::new(element);

    // Lower 64 bits of the 128-bit variant
    let hash = murmur3::murmur3_x64_128(&mut cursor, combined_seed).unwrap_or(0);
    hash as u64
}

/// Compute k counter positions for an element
///
/// Double hashing: h(i) = h1 + i * h2
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize, tweak: u32) -> Vec<usize> {
    let h1 = murmur_hash(element, 0, tweak);
    let h2 = murmur_hash(element, 1, tweak);

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m as u64) as usize
        })
        .collect()
}
