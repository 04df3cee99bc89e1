use std::collections::HashSet;

use crate::crypto::canonical_json_hash;
use crate::transaction::{unix_time, CustodyEvent, Transaction};

/// `previous_hash` of the genesis block, which has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Fixed proof recorded on the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// One sealed batch of custody events.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Block {
    /// 1-based position in the chain, contiguous and monotonically increasing.
    pub index: u64,
    /// The pending pool as it stood at seal time, in insertion order.
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    /// Canonical hash of the preceding block, or [`GENESIS_PREVIOUS_HASH`].
    pub previous_hash: String,
    /// Seal time, fractional Unix seconds.
    pub timestamp: f64,
}

impl Block {
    /// Canonical content hash: SHA-256 hex over the sorted-key JSON form of
    /// index, transactions, proof, previous_hash and timestamp.
    pub fn hash(&self) -> String {
        canonical_json_hash(self)
    }
}

/// The append-only ledger: the sealed chain plus the pool of pending events.
///
/// No internal locking. Hosts serving concurrent callers must serialize
/// mutations (`record_transaction`, and the seal + `append_block` pair) and
/// keep reads from observing a chain/pending pair mid-mutation.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub chain: Vec<Block>,
    pub pending: Vec<Transaction>,
    /// Peer registry. Written by [`Ledger::register_node`], read by nothing
    /// yet; kept so a future sync layer has somewhere to look.
    pub nodes: HashSet<String>,
}

impl Ledger {
    /// Start a chain holding only the genesis block.
    pub fn new() -> Self {
        let mut ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
            nodes: HashSet::new(),
        };
        ledger.append_block(GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string());
        ledger
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Append a custody event to the pending pool.
    ///
    /// Returns the index of the block that would hold the event if sealed
    /// next. Advisory only: events recorded afterwards land in the same block.
    pub fn record_transaction(&mut self, event: CustodyEvent) -> u64 {
        self.pending.push(Transaction::new(event));
        self.last_block().index + 1
    }

    /// Seal the entire pending pool into a new block and clear the pool.
    ///
    /// `previous_hash` must be computed by the caller over the current last
    /// block's content; the ledger does not recompute it here.
    pub fn append_block(&mut self, proof: u64, previous_hash: String) -> &Block {
        let block = Block {
            index: self.chain.len() as u64 + 1,
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
            timestamp: unix_time(),
        };
        self.chain.push(block);
        self.chain.last().expect("block was just pushed")
    }

    /// Record a peer address. No algorithm reads the registry.
    pub fn register_node(&mut self, address: String) {
        self.nodes.insert(address);
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_has_only_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.chain.len(), 1);

        let genesis = ledger.last_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions.is_empty());
        assert!(ledger.pending.is_empty());
        assert!(ledger.nodes.is_empty());
    }

    #[test]
    fn test_record_returns_advisory_block_index() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.record_transaction(CustodyEvent::default()), 2);
        // Still block 2: nothing was sealed in between
        assert_eq!(ledger.record_transaction(CustodyEvent::default()), 2);
        assert_eq!(ledger.pending.len(), 2);
    }

    #[test]
    fn test_append_block_snapshots_and_clears_pending() {
        let mut ledger = Ledger::new();
        ledger.record_transaction(CustodyEvent::default());
        ledger.record_transaction(CustodyEvent::default());
        let pending_ids: Vec<_> = ledger.pending.iter().map(|tx| tx.id).collect();

        let previous_hash = ledger.last_block().hash();
        let block = ledger.append_block(35293, previous_hash).clone();

        assert_eq!(block.index, 2);
        assert!(ledger.pending.is_empty());
        let sealed_ids: Vec<_> = block.transactions.iter().map(|tx| tx.id).collect();
        assert_eq!(sealed_ids, pending_ids);
    }

    #[test]
    fn test_empty_pool_seals_into_empty_block() {
        let mut ledger = Ledger::new();
        let previous_hash = ledger.last_block().hash();
        let block = ledger.append_block(7, previous_hash).clone();
        assert_eq!(block.index, 2);
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn test_register_node_deduplicates() {
        let mut ledger = Ledger::new();
        ledger.register_node("10.0.0.1:5000".to_string());
        ledger.register_node("10.0.0.1:5000".to_string());
        assert_eq!(ledger.nodes.len(), 1);
    }
}
