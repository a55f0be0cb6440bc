//! Basis reconciliation.

use crate::protocols::qkd::bb84::QubitEvent;

/// Alice's and Bob's bits at the positions where their bases matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiftedKey {
    pub alice: Vec<bool>,
    pub bob: Vec<bool>,
}

impl SiftedKey {
    pub fn len(&self) -> usize {
        self.alice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alice.is_empty()
    }

    /// Whether Alice and Bob disagree at sifted position `idx`.
    pub fn mismatch_at(&self, idx: usize) -> bool {
        self.alice[idx] != self.bob[idx]
    }
}

/// Keeps the events where the bases matched, preserving their order.
pub fn sift(events: &[QubitEvent]) -> SiftedKey {
    let (alice, bob) = events
        .iter()
        .filter(|event| event.bases_matched())
        .map(|event| (event.alice_bit, event.bob_measured_bit))
        .unzip();

    SiftedKey { alice, bob }
}
