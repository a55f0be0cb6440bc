mod basis;
mod channels;
pub mod errors;
mod random;
mod state;

pub use basis::Basis;
pub use channels::ChannelNoiseModel;
pub use random::RandomSource;
pub use state::QubitState;
