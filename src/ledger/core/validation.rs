use super::chain::Block;
use crate::miner::valid_proof;

/// Walk adjacent block pairs checking hash linkage and the sealing predicate.
///
/// A chain of length <= 1 is trivially valid. The result is a single boolean;
/// there is no report of where a bad chain diverges.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    chain.windows(2).all(|pair| {
        let (prev, curr) = (&pair[0], &pair[1]);
        curr.previous_hash == prev.hash() && valid_proof(prev.proof, curr.proof)
    })
}
