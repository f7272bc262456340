//! # Accumulator Snapshot
//!
//! XOR-fold of a shard's block hashes into a fixed-width digest.
//!
//! Inputs shorter than the accumulator are zero-padded on the right. Inputs
//! longer than the accumulator wrap around, so no byte is ever discarded.

/// Accumulator width in bytes.
pub const ACCUMULATOR_WIDTH: usize = 32;

/// XOR every input into a `ACCUMULATOR_WIDTH`-byte digest.
pub fn xor_fold<'a, I>(inputs: I) -> [u8; ACCUMULATOR_WIDTH]
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut acc = [0u8; ACCUMULATOR_WIDTH];
    for input in inputs {
        for (i, byte) in input.iter().enumerate() {
            acc[i % ACCUMULATOR_WIDTH] ^= byte;
        }
    }
    acc
}
