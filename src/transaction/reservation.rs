//! Reservation ledger for outputs claimed by in-flight flows.
//!
//! The ledger node only marks an output spent once a transaction is
//! broadcast, so two concurrent flows reading the same snapshot can pick
//! the same output. A shared [`OutputReservations`] lets the pipeline skip
//! outputs another flow has already claimed.
//!
//! One reservation ledger must only ever see snapshots of a single owner
//! address, since pruning drops claims missing from the latest snapshot.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::transaction::types::{OutPoint, SpendableOutput};

/// Identifies one flow's claim.
pub type ReservationId = Uuid;

/// Collaborator consulted by the pipeline around coin selection.
pub trait OutputReservations: Send + Sync {
    /// Filter a fresh ledger snapshot down to outputs nobody has claimed.
    fn available(&self, snapshot: Vec<SpendableOutput>) -> Vec<SpendableOutput>;

    /// Claim every outpoint or none of them.
    fn try_reserve(&self, outpoints: &[OutPoint]) -> Option<ReservationId>;

    /// Drop a claim made by `try_reserve`.
    fn release(&self, id: ReservationId, outpoints: &[OutPoint]);
}

/// No coordination: every flow sees the whole snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReservations;

impl OutputReservations for NoReservations {
    fn available(&self, snapshot: Vec<SpendableOutput>) -> Vec<SpendableOutput> {
        snapshot
    }

    fn try_reserve(&self, _outpoints: &[OutPoint]) -> Option<ReservationId> {
        Some(Uuid::nil())
    }

    fn release(&self, _id: ReservationId, _outpoints: &[OutPoint]) {}
}

/// Process-local reservation ledger.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReservations {
    claims: Arc<DashMap<OutPoint, ReservationId>>,
}

impl InMemoryReservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn is_reserved(&self, outpoint: &OutPoint) -> bool {
        self.claims.contains_key(outpoint)
    }
}

impl OutputReservations for InMemoryReservations {
    fn available(&self, snapshot: Vec<SpendableOutput>) -> Vec<SpendableOutput> {
        let present: HashSet<OutPoint> = snapshot.iter().map(SpendableOutput::outpoint).collect();
        let before = self.claims.len();
        self.claims.retain(|outpoint, _| present.contains(outpoint));
        let pruned = before.saturating_sub(self.claims.len());
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned reservations for spent outputs");
        }

        snapshot
            .into_iter()
            .filter(|utxo| !self.claims.contains_key(&utxo.outpoint()))
            .collect()
    }

    fn try_reserve(&self, outpoints: &[OutPoint]) -> Option<ReservationId> {
        let id = Uuid::new_v4();
        let mut claimed = Vec::with_capacity(outpoints.len());

        for outpoint in outpoints {
            // The entry guard holds the shard lock; it must be gone before rollback.
            let inserted = match self.claims.entry(outpoint.clone()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(id);
                    true
                }
            };
            if !inserted {
                self.release(id, &claimed);
                tracing::debug!(outpoint = %outpoint, "Output already reserved by another flow");
                return None;
            }
            claimed.push(outpoint.clone());
        }
        Some(id)
    }

    fn release(&self, id: ReservationId, outpoints: &[OutPoint]) {
        for outpoint in outpoints {
            self.claims.remove_if(outpoint, |_, owner| *owner == id);
        }
    }
}

/// Releases a claim on drop unless the flow reached broadcast.
pub(crate) struct ReservationGuard {
    reservations: Arc<dyn OutputReservations>,
    id: ReservationId,
    outpoints: Vec<OutPoint>,
    committed: bool,
}

impl ReservationGuard {
    pub(crate) fn new(
        reservations: Arc<dyn OutputReservations>,
        id: ReservationId,
        outpoints: Vec<OutPoint>,
    ) -> Self {
        Self {
            reservations,
            id,
            outpoints,
            committed: false,
        }
    }

    /// Keep the claim until the outputs drop out of a later snapshot.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl std::fmt::Debug for ReservationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationGuard")
            .field("id", &self.id)
            .field("outputs", &self.outpoints.len())
            .finish()
    }
}

impl Drop for ReservationGuard {
    fn drop(&mut self) {
        if !self.committed {
            self.reservations.release(self.id, &self.outpoints);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(n: u32) -> SpendableOutput {
        SpendableOutput {
            txid: format!("tx{}", n),
            vout: n,
            amount: "1".parse().unwrap(),
            address: "owner".into(),
        }
    }

    #[test]
    fn test_reserved_outputs_are_hidden() {
        let ledger = InMemoryReservations::new();
        let snapshot = vec![utxo(0), utxo(1), utxo(2)];
        ledger.try_reserve(&[utxo(1).outpoint()]).unwrap();

        let available = ledger.available(snapshot);
        let vouts: Vec<_> = available.iter().map(|u| u.vout).collect();
        assert_eq!(vouts, vec![0, 2]);
    }

    #[test]
    fn test_reserve_is_all_or_nothing() {
        let ledger = InMemoryReservations::new();
        ledger.try_reserve(&[utxo(1).outpoint()]).unwrap();

        let result = ledger.try_reserve(&[utxo(0).outpoint(), utxo(1).outpoint()]);
        assert!(result.is_none());
        assert!(!ledger.is_reserved(&utxo(0).outpoint()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_release_only_own_claim() {
        let ledger = InMemoryReservations::new();
        let first = ledger.try_reserve(&[utxo(0).outpoint()]).unwrap();
        ledger.release(Uuid::new_v4(), &[utxo(0).outpoint()]);
        assert!(ledger.is_reserved(&utxo(0).outpoint()));
        ledger.release(first, &[utxo(0).outpoint()]);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_spent_outputs_are_pruned() {
        let ledger = InMemoryReservations::new();
        ledger.try_reserve(&[utxo(0).outpoint()]).unwrap();
        let available = ledger.available(vec![utxo(1)]);
        assert_eq!(available.len(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_guard_releases_unless_committed() {
        let ledger = InMemoryReservations::new();
        let shared: Arc<dyn OutputReservations> = Arc::new(ledger.clone());

        let id = ledger.try_reserve(&[utxo(0).outpoint()]).unwrap();
        drop(ReservationGuard::new(shared.clone(), id, vec![utxo(0).outpoint()]));
        assert!(ledger.is_empty());

        let id = ledger.try_reserve(&[utxo(1).outpoint()]).unwrap();
        ReservationGuard::new(shared, id, vec![utxo(1).outpoint()]).commit();
        assert!(ledger.is_reserved(&utxo(1).outpoint()));
    }

    #[test]
    fn test_no_reservations_passes_through() {
        let snapshot = vec![utxo(0), utxo(1)];
        assert_eq!(NoReservations.available(snapshot.clone()), snapshot);
        assert!(NoReservations.try_reserve(&[utxo(0).outpoint()]).is_some());
    }
}
