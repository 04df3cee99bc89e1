use std::collections::BTreeSet;

use serde::Serialize;

use super::chain::Ledger;
use crate::transaction::Transaction;

/// One step of a product's custody trail.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Index of the sealed block holding the event.
    pub block_index: u64,
    pub transaction: Transaction,
    /// Canonical hash of the containing block.
    pub block_hash: String,
    /// Seal time of the containing block.
    pub timestamp: f64,
}

impl Ledger {
    /// Every distinct non-empty product id recorded in sealed blocks.
    pub fn all_product_ids(&self) -> BTreeSet<String> {
        self.chain
            .iter()
            .flat_map(|block| &block.transactions)
            .filter(|tx| !tx.product_id.is_empty())
            .map(|tx| tx.product_id.clone())
            .collect()
    }

    /// Full custody trail of one product, in sealing order.
    ///
    /// Scans every sealed block; entries come out in chain order, then
    /// block-insertion order. Pending events are not part of history until
    /// they are sealed.
    pub fn product_history(&self, product_id: &str) -> Vec<HistoryEntry> {
        let mut history = Vec::new();
        for block in &self.chain {
            let block_hash = block.hash();
            for tx in &block.transactions {
                if tx.product_id == product_id {
                    history.push(HistoryEntry {
                        block_index: block.index,
                        transaction: tx.clone(),
                        block_hash: block_hash.clone(),
                        timestamp: block.timestamp,
                    });
                }
            }
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::CustodyEvent;

    fn event(product_id: &str, status: &str) -> CustodyEvent {
        CustodyEvent {
            product_id: product_id.to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    /// Seals whatever is pending; queries never check proofs.
    fn seal(ledger: &mut Ledger) {
        let previous_hash = ledger.last_block().hash();
        ledger.append_block(0, previous_hash);
    }

    #[test]
    fn test_history_spans_blocks_in_order() {
        let mut ledger = Ledger::new();
        ledger.record_transaction(event("P1", "created"));
        seal(&mut ledger); // block 2
        ledger.record_transaction(event("P1", "shipped"));
        seal(&mut ledger); // block 3
        ledger.record_transaction(event("P2", "created"));
        seal(&mut ledger); // block 4
        ledger.record_transaction(event("P1", "delivered"));
        seal(&mut ledger); // block 5

        let history = ledger.product_history("P1");
        let indices: Vec<u64> = history.iter().map(|entry| entry.block_index).collect();
        assert_eq!(indices, vec![2, 3, 5]);
        assert_eq!(history[0].transaction.status, "created");
        assert_eq!(history[2].transaction.status, "delivered");

        for entry in &history {
            let block = &ledger.chain[(entry.block_index - 1) as usize];
            assert_eq!(entry.block_hash, block.hash());
            assert_eq!(entry.timestamp, block.timestamp);
        }
    }

    #[test]
    fn test_intra_block_order_is_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.record_transaction(event("P1", "created"));
        ledger.record_transaction(event("P1", "packed"));
        ledger.record_transaction(event("P1", "shipped"));
        seal(&mut ledger);

        let statuses: Vec<_> = ledger
            .product_history("P1")
            .into_iter()
            .map(|entry| entry.transaction.status)
            .collect();
        assert_eq!(statuses, vec!["created", "packed", "shipped"]);
    }

    #[test]
    fn test_empty_product_ids_are_skipped() {
        let mut ledger = Ledger::new();
        ledger.record_transaction(event("", "created"));
        ledger.record_transaction(event("P9", "created"));
        seal(&mut ledger);

        let products = ledger.all_product_ids();
        assert_eq!(products.len(), 1);
        assert!(products.contains("P9"));
    }

    #[test]
    fn test_pending_events_are_not_history() {
        let mut ledger = Ledger::new();
        ledger.record_transaction(event("P1", "created"));
        assert!(ledger.product_history("P1").is_empty());
        assert!(ledger.all_product_ids().is_empty());
    }

    #[test]
    fn test_unknown_product_has_empty_history() {
        let ledger = Ledger::new();
        assert!(ledger.product_history("missing").is_empty());
    }
}
