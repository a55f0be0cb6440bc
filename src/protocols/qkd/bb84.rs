//! BB84 Quantum Key Distribution Protocol.
//!
//! Alice sends random bits in random bases, an optional intercept-resend attacker
//! sits on the link, Bob measures in random bases. Sifting, QBER estimation and
//! key extraction then run on the recorded events.

use crate::config::ProtocolConfig;
use crate::core::errors::ConfigError;
use crate::core::{Basis, ChannelNoiseModel, QubitState, RandomSource};
use crate::protocols::qkd::eavesdropper::{Eavesdropper, Interception};
use crate::protocols::qkd::estimation::{self, Verdict};
use crate::protocols::qkd::{extraction, sifting};
use serde::Serialize;
use tracing::{debug, warn};

/// One simulated transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QubitEvent {
    pub index: usize,
    pub alice_bit: bool,
    pub alice_basis: Basis,
    /// Present iff Eve intercepted this qubit.
    pub eve: Option<Interception>,
    pub bob_basis: Basis,
    pub bob_measured_bit: bool,
}

impl QubitEvent {
    pub fn bases_matched(&self) -> bool {
        self.alice_basis == self.bob_basis
    }

    /// Whether Bob's bit differs from Alice's; `None` when the bases differ.
    pub fn bit_error(&self) -> Option<bool> {
        self.bases_matched()
            .then_some(self.alice_bit != self.bob_measured_bit)
    }

    pub fn eve_intercepted(&self) -> bool {
        self.eve.is_some()
    }

    pub fn eve_basis(&self) -> Option<Basis> {
        self.eve.map(|hit| hit.basis)
    }

    pub fn eve_measured_bit(&self) -> Option<bool> {
        self.eve.map(|hit| hit.measured_bit)
    }
}

/// BB84 results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolRunResult {
    pub config: ProtocolConfig,
    pub events: Vec<QubitEvent>,
    pub sifted_alice: Vec<bool>,
    pub sifted_bob: Vec<bool>,
    /// Sifted length over raw length.
    pub sifting_efficiency: f64,
    /// Sifted positions disclosed for QBER estimation, ascending.
    pub test_indices: Vec<usize>,
    /// Mismatches found in the test subset.
    pub errors: usize,
    pub qber: f64,
    pub verdict: Verdict,
    pub secure: bool,
    pub final_alice_key: Vec<bool>,
    pub final_bob_key: Vec<bool>,
    /// Final key positions where Alice and Bob agree.
    pub shared_key: Vec<bool>,
    pub eve_interception_count: usize,
    pub eve_interception_rate: f64,
}

impl ProtocolRunResult {
    pub fn raw_length(&self) -> usize {
        self.events.len()
    }

    pub fn sifted_length(&self) -> usize {
        self.sifted_alice.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }

    pub fn final_key_length(&self) -> usize {
        self.final_alice_key.len()
    }

    pub fn keys_match(&self) -> bool {
        self.final_alice_key == self.final_bob_key
    }

    pub fn insufficient_data(&self) -> bool {
        self.verdict == Verdict::InsufficientData
    }
}

/// A single configured BB84 trial. Owns its random source.
#[derive(Debug, Clone)]
pub struct ProtocolRun {
    config: ProtocolConfig,
    channel: ChannelNoiseModel,
    eve: Option<Eavesdropper>,
    rng: RandomSource,
}

impl ProtocolRun {
    /// Validates `config` and builds the channel, attacker and random source.
    pub fn new(config: ProtocolConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let channel = ChannelNoiseModel::bit_flip(config.noise_prob)?;
        let eve = Eavesdropper::new(config.eve_intercept_prob)?;

        Ok(Self {
            rng: RandomSource::new(config.seed),
            eve: config.eve_enabled.then_some(eve),
            channel,
            config,
        })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Runs every qubit, then sifts, estimates and extracts.
    pub fn execute(mut self) -> ProtocolRunResult {
        let n_bits = self.config.n_bits as usize;
        debug!(
            n_bits,
            noise_prob = self.config.noise_prob,
            eve_enabled = self.config.eve_enabled,
            eve_intercept_prob = self.config.eve_intercept_prob,
            "starting BB84 run"
        );

        let events: Vec<QubitEvent> = (0..n_bits).map(|index| self.transmit(index)).collect();

        let sifted = sifting::sift(&events);
        let estimate = estimation::estimate(&sifted, &mut self.rng);
        let keys = extraction::extract(&sifted, &estimate.test_indices);

        let eve_interception_count = events.iter().filter(|e| e.eve_intercepted()).count();

        if estimate.verdict == Verdict::InsufficientData {
            warn!(n_bits, "no bases matched; no key material to test");
        }
        debug!(
            sifted = sifted.len(),
            n_test = estimate.n_test(),
            qber = estimate.qber,
            verdict = ?estimate.verdict,
            final_key = keys.len(),
            eve_interception_count,
            "BB84 run complete"
        );

        ProtocolRunResult {
            sifting_efficiency: sifted.len() as f64 / n_bits as f64,
            eve_interception_rate: eve_interception_count as f64 / n_bits as f64,
            eve_interception_count,
            test_indices: estimate.test_indices,
            errors: estimate.errors,
            qber: estimate.qber,
            secure: estimate.verdict.is_secure(),
            verdict: estimate.verdict,
            sifted_alice: sifted.alice,
            sifted_bob: sifted.bob,
            final_alice_key: keys.alice,
            final_bob_key: keys.bob,
            shared_key: keys.shared,
            config: self.config,
            events,
        }
    }

    /// Prepare -> Intercept? -> ChannelNoise -> Measure -> Record for one qubit.
    fn transmit(&mut self, index: usize) -> QubitEvent {
        // Alice prepares qubit
        let alice_bit = self.rng.bit();
        let alice_basis = self.rng.basis();
        let mut qubit = QubitState::prepare(alice_bit, alice_basis);

        // Eavesdropper intercepts
        let eve = match self.eve {
            Some(eve) => eve.intercept(&mut qubit, &self.channel, &mut self.rng),
            None => None,
        };

        // Whatever is in flight crosses the (remaining) link to Bob
        qubit.apply_channel(&self.channel, &mut self.rng);

        // Bob measures
        let bob_basis = self.rng.basis();
        let bob_measured_bit = qubit.measure(bob_basis, &mut self.rng);

        QubitEvent {
            index,
            alice_bit,
            alice_basis,
            eve,
            bob_basis,
            bob_measured_bit,
        }
    }
}

/// Runs BB84 protocol
pub fn run_protocol(
    n_bits: u32,
    noise_prob: f64,
    eve_enabled: bool,
    eve_intercept_prob: f64,
    seed: Option<u64>,
) -> Result<ProtocolRunResult, ConfigError> {
    let config = ProtocolConfig {
        n_bits,
        noise_prob,
        eve_enabled,
        eve_intercept_prob,
        seed,
    };
    Ok(ProtocolRun::new(config)?.execute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::qkd::estimation::test_sample_size;

    #[test]
    fn rejects_invalid_configuration_eagerly() {
        assert_eq!(
            run_protocol(0, 0.0, false, 0.0, Some(1)).unwrap_err(),
            ConfigError::ZeroQubits
        );
        assert!(matches!(
            run_protocol(10, 1.2, false, 0.0, Some(1)),
            Err(ConfigError::InvalidProbability {
                name: "noise_prob",
                ..
            })
        ));
        assert!(matches!(
            run_protocol(10, 0.0, true, -0.5, Some(1)),
            Err(ConfigError::InvalidProbability {
                name: "eve_intercept_prob",
                ..
            })
        ));
    }

    #[test]
    fn events_are_indexed_and_consistent() {
        let result = run_protocol(200, 0.05, true, 0.5, Some(3)).unwrap();

        assert_eq!(result.raw_length(), 200);
        for (i, event) in result.events.iter().enumerate() {
            assert_eq!(event.index, i);
            assert_eq!(event.eve_intercepted(), event.eve_basis().is_some());
            assert_eq!(event.eve_intercepted(), event.eve_measured_bit().is_some());
            assert_eq!(event.bit_error().is_some(), event.bases_matched());
        }
    }

    #[test]
    fn aggregates_follow_the_events() {
        let result = run_protocol(500, 0.1, true, 0.4, Some(8)).unwrap();

        let matched: Vec<&QubitEvent> = result.events.iter().filter(|e| e.bases_matched()).collect();
        assert_eq!(result.sifted_length(), matched.len());
        assert!(
            matched
                .iter()
                .zip(&result.sifted_bob)
                .all(|(e, &b)| e.bob_measured_bit == b)
        );

        let n_sifted = result.sifted_length();
        assert_eq!(result.n_test(), test_sample_size(n_sifted));
        assert_eq!(result.final_key_length(), n_sifted - result.n_test());
        assert_eq!(result.final_bob_key.len(), result.final_key_length());
        assert!(result.shared_key.len() <= result.final_key_length());
        assert!((0.0..=1.0).contains(&result.qber));
        assert_eq!(result.secure, result.qber < 0.11);

        let intercepted = result.events.iter().filter(|e| e.eve_intercepted()).count();
        assert_eq!(result.eve_interception_count, intercepted);
        assert!((result.eve_interception_rate - intercepted as f64 / 500.0).abs() < 1e-12);
    }

    #[test]
    fn disabled_eve_never_intercepts() {
        let result = run_protocol(300, 0.0, false, 1.0, Some(21)).unwrap();
        assert_eq!(result.eve_interception_count, 0);
        assert!(result.events.iter().all(|e| e.eve.is_none()));
    }

    #[test]
    fn noiseless_private_channel_has_no_errors() {
        let result = run_protocol(100, 0.0, false, 0.0, Some(42)).unwrap();

        assert!(result.events.iter().all(|e| e.bit_error() != Some(true)));
        assert_eq!(result.qber, 0.0);
        assert!(result.secure);
        assert!(result.keys_match());
        assert_eq!(result.shared_key, result.final_alice_key);
    }

    #[test]
    fn always_on_eve_resends_her_bits() {
        let result = run_protocol(400, 0.0, true, 1.0, Some(5)).unwrap();

        assert_eq!(result.eve_interception_count, 400);
        for event in &result.events {
            let hit = event.eve.unwrap();
            if hit.basis == event.alice_basis {
                assert_eq!(hit.measured_bit, event.alice_bit);
            }
            if hit.basis == event.bob_basis {
                assert_eq!(hit.measured_bit, event.bob_measured_bit);
            }
        }
    }

    #[test]
    fn same_seed_replays_identically() {
        let a = run_protocol(256, 0.07, true, 0.3, Some(99)).unwrap();
        let b = run_protocol(256, 0.07, true, 0.3, Some(99)).unwrap();
        assert_eq!(a, b);

        let c = run_protocol(256, 0.07, true, 0.3, Some(100)).unwrap();
        assert_ne!(a.events, c.events);
    }

    #[test]
    fn single_qubit_run_may_have_no_key() {
        // With one qubit either the bases differ (insufficient data) or the lone
        // sifted bit is consumed by the test subset.
        for seed in 0..20 {
            let result = run_protocol(1, 0.0, false, 0.0, Some(seed)).unwrap();
            assert_eq!(result.final_key_length(), 0);
            if result.sifted_length() == 0 {
                assert!(result.insufficient_data());
                assert!(!result.secure);
                assert_eq!(result.qber, 0.0);
            } else {
                assert_eq!(result.n_test(), 1);
                assert!(result.secure);
            }
        }
    }
}
