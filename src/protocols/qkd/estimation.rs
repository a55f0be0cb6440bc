//! QBER estimation on a sacrificed test subset of the sifted key.

use crate::core::RandomSource;
use crate::protocols::qkd::sifting::SiftedKey;
use serde::{Deserialize, Serialize};

/// QBER cutoff below which the channel is declared free of eavesdropping.
pub const SECURITY_THRESHOLD: f64 = 0.11;

/// Fraction of the sifted key disclosed for error estimation.
pub const TEST_FRACTION: f64 = 0.2;

/// Outcome of the security decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Secure,
    Insecure,
    /// Sifting left nothing to test; treated as insecure.
    InsufficientData,
}

impl Verdict {
    pub fn is_secure(self) -> bool {
        self == Verdict::Secure
    }
}

/// Result of sampling the sifted key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QberEstimate {
    pub qber: f64,
    pub verdict: Verdict,
    /// Sifted positions disclosed for testing, ascending.
    pub test_indices: Vec<usize>,
    /// Mismatches found among the test positions.
    pub errors: usize,
}

impl QberEstimate {
    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }

    pub fn secure(&self) -> bool {
        self.verdict.is_secure()
    }
}

/// Number of test positions for a sifted key of length `n_sifted`.
pub fn test_sample_size(n_sifted: usize) -> usize {
    if n_sifted == 0 {
        return 0;
    }
    ((n_sifted as f64 * TEST_FRACTION).floor() as usize).max(1)
}

/// Samples the test subset and renders the security verdict.
pub fn estimate(sifted: &SiftedKey, rng: &mut RandomSource) -> QberEstimate {
    let n_sifted = sifted.len();
    if n_sifted == 0 {
        return QberEstimate {
            qber: 0.0,
            verdict: Verdict::InsufficientData,
            test_indices: Vec::new(),
            errors: 0,
        };
    }

    let test_indices = rng.sample_indices(n_sifted, test_sample_size(n_sifted));
    let errors = test_indices
        .iter()
        .filter(|&&idx| sifted.mismatch_at(idx))
        .count();
    let qber = errors as f64 / test_indices.len() as f64;

    let verdict = if qber < SECURITY_THRESHOLD {
        Verdict::Secure
    } else {
        Verdict::Insecure
    };

    QberEstimate {
        qber,
        verdict,
        test_indices,
        errors,
    }
}
