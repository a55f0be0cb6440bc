//! Statistical analysis over repeated protocol runs.

pub mod sweep;

pub use sweep::{
    FixedParams, ParamKind, SweepAnalyzer, SweepPoint, SweepSummary, linspace, run_sweep,
};
