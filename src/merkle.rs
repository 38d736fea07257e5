//! Merkle inclusion proof verification.

use crate::hashes::{Hash256Digest, MarkedDigest};
use crate::primitives::hash256;

/// Combines two 32-byte nodes into their parent: `hash256(a ++ b)`.
pub fn hash256_merkle_step(a: &[u8], b: &[u8]) -> Hash256Digest {
    let mut buf = Vec::with_capacity(a.len() + b.len());
    buf.extend_from_slice(a);
    buf.extend_from_slice(b);
    hash256(&buf)
}

/// Verifies a flattened merkle proof: `leaf ++ intermediate_nodes ++ root`,
/// each a 32-byte digest, walking up from `leaf` using `index`'s bits to
/// choose sibling order at each level.
///
/// A proof of exactly one node (just the root, no siblings) trivially
/// verifies; a proof of exactly two nodes is never valid, since a real
/// tree with more than one leaf always has at least one intermediate
/// level.
pub fn verify_hash256_merkle(proof: &[u8], index: u64) -> bool {
    if proof.len() % 32 != 0 {
        return false;
    }
    if proof.len() == 32 {
        return true;
    }
    if proof.len() == 64 {
        return false;
    }

    let root = &proof[proof.len() - 32..];
    let mut current = proof[0..32].to_vec();
    let steps = proof.len() / 32 - 2;
    let mut idx = index;

    for i in 1..=steps {
        let sibling = &proof[i * 32..(i + 1) * 32];
        current = if idx & 1 == 1 {
            hash256_merkle_step(sibling, &current).bytes()
        } else {
            hash256_merkle_step(&current, sibling).bytes()
        };
        idx >>= 1;
    }

    current.as_slice() == root
}
