//! # Hash Tree
//!
//! Binary Merkle tree over an ordered list of leaf hashes. Stateless.
//!
//! Odd levels are padded by pairing the last node with itself. Proof
//! verification reproduces the same rule: a node at an even position is
//! combined as `(current, sibling)`, a node at an odd position as
//! `(sibling, current)`, and a padded node's sibling is itself.

use sha2::{Digest, Sha256};

use crate::domain::{ForestError, Hash, ProofFingerprint};

/// SHA-256 of `left || right`.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            hash_pair(left, right)
        })
        .collect()
}

/// Compute the root of the tree over `leaves`.
///
/// A single leaf is its own root.
pub fn build_root(leaves: &[Hash]) -> Result<Hash, ForestError> {
    if leaves.is_empty() {
        return Err(ForestError::EmptyInput);
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = next_level(&level);
    }
    Ok(level[0])
}

/// Sibling hashes from leaf level to root for the leaf at `target_index`.
pub fn build_proof(leaves: &[Hash], target_index: usize) -> Result<Vec<Hash>, ForestError> {
    if target_index >= leaves.len() {
        return Err(ForestError::IndexOutOfRange {
            index: target_index,
            len: leaves.len(),
        });
    }

    let mut proof = Vec::new();
    let mut level = leaves.to_vec();
    let mut index = target_index;

    while level.len() > 1 {
        let sibling = if index % 2 == 0 {
            *level.get(index + 1).unwrap_or(&level[index])
        } else {
            level[index - 1]
        };
        proof.push(sibling);

        level = next_level(&level);
        index /= 2;
    }

    Ok(proof)
}

/// Recombine `leaf` with `proof` and compare against `expected_root`.
pub fn verify_proof(leaf: &Hash, index: usize, proof: &[Hash], expected_root: &Hash) -> bool {
    let mut current = *leaf;
    let mut index = index;

    for sibling in proof {
        current = if index % 2 == 0 {
            hash_pair(&current, sibling)
        } else {
            hash_pair(sibling, &current)
        };
        index /= 2;
    }

    current == *expected_root
}

/// Keep the first four bytes of each sibling hash.
///
/// A compressed proof identifies a full proof in logs and receipts; it can
/// never be used to verify inclusion on its own.
pub fn compress_proof(proof: &[Hash]) -> Vec<ProofFingerprint> {
    proof
        .iter()
        .map(|hash| [hash[0], hash[1], hash[2], hash[3]])
        .collect()
}

/// Whether `proof` is the full form of `fingerprints`.
pub fn fingerprint_matches(proof: &[Hash], fingerprints: &[ProofFingerprint]) -> bool {
    proof.len() == fingerprints.len() && compress_proof(proof) == fingerprints
}
