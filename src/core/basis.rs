use crate::core::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement basis. Only equality matters; no amplitudes are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Z basis (Computational) -> {|0>, |1>}.
    Rectilinear,
    /// X basis (Hadamard) -> {|+>, |->}.
    Diagonal,
}

impl Basis {
    /// Measures a qubit prepared as `bit` in `prepared` using this basis.
    ///
    /// A matching basis reads the prepared bit back; a mismatched basis collapses
    /// to a fresh uniform bit.
    pub fn measure(self, prepared: Basis, bit: bool, rng: &mut RandomSource) -> bool {
        if self == prepared { bit } else { rng.bit() }
    }

    pub fn symbol(self) -> char {
        match self {
            Basis::Rectilinear => '+',
            Basis::Diagonal => 'x',
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => write!(f, "Z"),
            Basis::Diagonal => write!(f, "X"),
        }
    }
}
