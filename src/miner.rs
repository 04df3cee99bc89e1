//! Proof-of-work sealing
//!
//! A block is sealed by finding the smallest `proof` such that the SHA-256 of
//! the previous proof's decimal form concatenated with the candidate's decimal
//! form starts with [`PROOF_PREFIX`]. Expected work per seal is ~16^4 hash
//! evaluations; the search has no upper bound.

use crate::crypto::sha256_hex;

/// Required hex prefix of a winning guess hash.
pub const PROOF_PREFIX: &str = "0000";

/// Does `(last_proof, proof)` satisfy the sealing predicate?
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    sha256_hex(guess.as_bytes()).starts_with(PROOF_PREFIX)
}

/// Linear search from 0 for the smallest valid proof.
///
/// Deterministic for a given `last_proof`, which is what lets validation
/// re-check sealed pairs without re-running the search. CPU-bound and
/// synchronous; callers needing responsiveness should run it on a worker.
pub fn proof_of_work(last_proof: u64) -> u64 {
    let mut proof = 0;
    while !valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_proof_satisfies_predicate() {
        let proof = proof_of_work(100);
        assert!(valid_proof(100, proof));

        let guess = format!("100{proof}");
        assert!(sha256_hex(guess.as_bytes()).starts_with(PROOF_PREFIX));
    }

    #[test]
    fn test_search_returns_smallest_candidate() {
        let proof = proof_of_work(100);
        assert!((0..proof).all(|candidate| !valid_proof(100, candidate)));
    }

    #[test]
    fn test_search_is_deterministic() {
        assert_eq!(proof_of_work(12345), proof_of_work(12345));
    }
}
