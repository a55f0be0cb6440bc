use crate::core::{Basis, ChannelNoiseModel, RandomSource};

/// Classical stand-in for a single photon on the link: the bit it encodes and
/// the basis it was prepared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QubitState {
    pub bit: bool,
    pub basis: Basis,
}

impl QubitState {
    /// Prepares `bit` in `basis`.
    pub fn prepare(bit: bool, basis: Basis) -> Self {
        Self { bit, basis }
    }

    /// Applies channel noise to the encoded bit.
    pub fn apply_channel(&mut self, channel: &ChannelNoiseModel, rng: &mut RandomSource) {
        self.bit = channel.transmit(self.bit, rng);
    }

    /// Measures the qubit in `basis`, returning the observed bit.
    pub fn measure(&self, basis: Basis, rng: &mut RandomSource) -> bool {
        basis.measure(self.basis, self.bit, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noiseless_same_basis_round_trip() {
        let mut rng = RandomSource::from_seed(1);
        let mut qubit = QubitState::prepare(true, Basis::Diagonal);
        qubit.apply_channel(&ChannelNoiseModel::ideal(), &mut rng);
        assert!(qubit.measure(Basis::Diagonal, &mut rng));
    }

    #[test]
    fn certain_noise_flips_encoded_bit() {
        let mut rng = RandomSource::from_seed(1);
        let mut qubit = QubitState::prepare(false, Basis::Rectilinear);
        qubit.apply_channel(&ChannelNoiseModel::bit_flip(1.0).unwrap(), &mut rng);
        assert!(qubit.bit);
        assert_eq!(qubit.basis, Basis::Rectilinear);
    }
}
