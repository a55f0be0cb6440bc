pub mod analysis;
pub mod config;
mod core;
pub mod protocols;

pub use crate::config::{ProtocolConfig, SweepConfig};
pub use crate::core::{Basis, ChannelNoiseModel, QubitState, RandomSource, errors};
pub use crate::protocols::bb84::{ProtocolRun, ProtocolRunResult, QubitEvent, run_protocol};
pub use crate::protocols::qkd::estimation::{SECURITY_THRESHOLD, TEST_FRACTION, Verdict};
