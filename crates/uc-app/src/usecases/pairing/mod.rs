mod engine;

pub use engine::{PairingEngine, PairingEngineConfig};
