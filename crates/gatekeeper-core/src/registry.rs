// ABOUTME: In-memory access registry holding pending requests and approved client keys.
// ABOUTME: Pure data structure with no I/O; the registry actor is its only owner.

use std::collections::HashMap;

use crate::model::{AccessRequest, ApprovedEntry, ClientKey};

/// A pending request paired with its insertion sequence number so that
/// listings come back in arrival order.
#[derive(Debug, Clone)]
struct PendingSlot {
    seq: u64,
    request: AccessRequest,
}

/// Process-lifetime state: pending requests keyed by client key, and the
/// set of approved client keys. Nothing is ever persisted.
///
/// A key is never both approved and pending: `approve` removes the pending
/// entry, and `get_or_create_pending` is only reached for unapproved keys.
#[derive(Debug, Default)]
pub struct AccessRegistry {
    pending: HashMap<ClientKey, PendingSlot>,
    approved: HashMap<ClientKey, ApprovedEntry>,
    next_seq: u64,
}

impl AccessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the key has been approved during this process lifetime.
    pub fn is_approved(&self, key: &ClientKey) -> bool {
        self.approved.contains_key(key)
    }

    /// Return the existing pending request for `key`, or create one.
    /// The boolean is true only when a new request was inserted.
    pub fn get_or_create_pending(
        &mut self,
        key: &ClientKey,
        descriptor: Option<String>,
    ) -> (AccessRequest, bool) {
        if let Some(slot) = self.pending.get(key) {
            return (slot.request.clone(), false);
        }

        let request = AccessRequest::new(key.clone(), descriptor);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(
            key.clone(),
            PendingSlot {
                seq,
                request: request.clone(),
            },
        );
        (request, true)
    }

    /// Approve `key` and drop any pending request for it. Approving a key
    /// that was never pending still approves it. Re-approving keeps the
    /// original approval timestamp.
    pub fn approve(&mut self, key: &ClientKey) {
        self.approved
            .entry(key.clone())
            .or_insert_with(|| ApprovedEntry::new(key.clone()));
        self.pending.remove(key);
    }

    /// Drop the pending request for `key`, if any. Approved keys are untouched.
    pub fn decline(&mut self, key: &ClientKey) {
        self.pending.remove(key);
    }

    /// Snapshot of all pending requests in insertion order.
    pub fn list_pending(&self) -> Vec<AccessRequest> {
        let mut slots: Vec<&PendingSlot> = self.pending.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.request.clone()).collect()
    }

    #[cfg(test)]
    fn approved_entry(&self, key: &ClientKey) -> Option<&ApprovedEntry> {
        self.approved.get(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn approved_count(&self) -> usize {
        self.approved.len()
    }
}
