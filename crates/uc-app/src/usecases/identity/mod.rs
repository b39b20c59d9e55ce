mod load_or_generate_key_pair;

pub use load_or_generate_key_pair::LoadOrGenerateKeyPair;
