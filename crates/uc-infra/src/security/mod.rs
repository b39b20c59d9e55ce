mod file_key_pair_store;
mod memory_trust_store;

pub use file_key_pair_store::FileKeyPairStore;
pub use memory_trust_store::InMemoryTrustStore;
