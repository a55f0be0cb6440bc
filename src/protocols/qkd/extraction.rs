//! Final key derivation from the untested sifted bits.

use crate::protocols::qkd::sifting::SiftedKey;
use serde::Serialize;

/// Keys left after the test subset is discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedKeys {
    pub alice: Vec<bool>,
    pub bob: Vec<bool>,
    /// Positions of the final keys where Alice and Bob agree.
    pub shared: Vec<bool>,
}

impl ExtractedKeys {
    pub fn len(&self) -> usize {
        self.alice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alice.is_empty()
    }

    /// Whether the raw final keys are identical. Residual noise outside the test subset
    /// can make them differ.
    pub fn keys_match(&self) -> bool {
        self.alice == self.bob
    }
}

/// Drops the `test_indices` positions (ascending) from the sifted key.
pub fn extract(sifted: &SiftedKey, test_indices: &[usize]) -> ExtractedKeys {
    let mut tested = vec![false; sifted.len()];
    for &idx in test_indices {
        tested[idx] = true;
    }

    let mut keys = ExtractedKeys::default();
    for (idx, (&a, &b)) in sifted.alice.iter().zip(&sifted.bob).enumerate() {
        if tested[idx] {
            continue;
        }
        keys.alice.push(a);
        keys.bob.push(b);
        if a == b {
            keys.shared.push(a);
        }
    }
    keys
}
