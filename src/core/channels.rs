use crate::core::RandomSource;
use crate::core::errors::{ConfigError, validate_prob};
use serde::Serialize;

/// Classical bit-flip channel.
///
/// Each transmitted bit is flipped independently with probability `flip_prob`,
/// standing in for depolarizing noise on the quantum link.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChannelNoiseModel {
    flip_prob: f64,
}

impl ChannelNoiseModel {
    /// Bit Flip Channel -> X
    pub fn bit_flip(p: f64) -> Result<ChannelNoiseModel, ConfigError> {
        validate_prob("noise_prob", p)?;
        Ok(Self { flip_prob: p })
    }

    /// Noise-free channel.
    pub fn ideal() -> ChannelNoiseModel {
        Self { flip_prob: 0.0 }
    }

    pub fn flip_prob(&self) -> f64 {
        self.flip_prob
    }

    pub fn is_ideal(&self) -> bool {
        self.flip_prob == 0.0
    }

    /// Composes the current channel with another one (two flips cancel).
    pub fn compose(&self, other: &ChannelNoiseModel) -> ChannelNoiseModel {
        let (a, b) = (self.flip_prob, other.flip_prob);
        Self {
            flip_prob: (a + b - 2.0 * a * b).clamp(0.0, 1.0),
        }
    }

    /// Sends `bit` through the channel.
    ///
    /// An ideal channel returns the input without consuming a random draw.
    pub fn transmit(&self, bit: bool, rng: &mut RandomSource) -> bool {
        if self.is_ideal() {
            return bit;
        }
        bit ^ rng.bernoulli(self.flip_prob)
    }
}

impl Default for ChannelNoiseModel {
    fn default() -> Self {
        Self::ideal()
    }
}
