use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use uc_core::crypto::SecureKeyPair;
use uc_core::ports::SecureKeyPairStorePort;

/// Loads the local key pair, generating and storing one on first run.
pub struct LoadOrGenerateKeyPair {
    store: Arc<dyn SecureKeyPairStorePort>,
}

impl LoadOrGenerateKeyPair {
    pub fn new(store: Arc<dyn SecureKeyPairStorePort>) -> Self {
        Self { store }
    }

    pub fn execute(&self) -> Result<SecureKeyPair> {
        if let Some(secret) = self.store.load_secret().context("load key pair")? {
            let pair = SecureKeyPair::from_secret_bytes(&secret).context("decode stored key pair")?;
            info!("Loaded existing key pair");
            return Ok(pair);
        }

        let pair = SecureKeyPair::generate();
        self.store
            .store_secret(&pair.to_secret_bytes())
            .context("store generated key pair")?;
        info!("Generated new key pair");
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use uc_core::crypto::KeyKind;
    use uc_core::ports::KeyPairStoreError;

    mock! {
        pub KeyPairStore {}

        impl SecureKeyPairStorePort for KeyPairStore {
            fn load_secret(&self) -> Result<Option<Vec<u8>>, KeyPairStoreError>;
            fn store_secret(&self, secret: &[u8]) -> Result<(), KeyPairStoreError>;
        }
    }

    #[test]
    fn test_first_run_generates_and_stores() {
        let mut store = MockKeyPairStore::new();
        store.expect_load_secret().times(1).returning(|| Ok(None));
        store
            .expect_store_secret()
            .times(1)
            .withf(|secret| secret.len() == 64)
            .returning(|_| Ok(()));

        LoadOrGenerateKeyPair::new(Arc::new(store)).execute().unwrap();
    }

    #[test]
    fn test_later_run_reloads_same_keys() {
        let existing = SecureKeyPair::generate();
        let secret = existing.to_secret_bytes().to_vec();

        let mut store = MockKeyPairStore::new();
        store
            .expect_load_secret()
            .returning(move || Ok(Some(secret.clone())));
        store.expect_store_secret().never();

        let loaded = LoadOrGenerateKeyPair::new(Arc::new(store)).execute().unwrap();
        assert_eq!(
            loaded.serialize_public_key(KeyKind::Crypt),
            existing.serialize_public_key(KeyKind::Crypt)
        );
    }

    #[test]
    fn test_corrupt_secret_is_error() {
        let mut store = MockKeyPairStore::new();
        store
            .expect_load_secret()
            .returning(|| Ok(Some(vec![1, 2, 3])));

        assert!(LoadOrGenerateKeyPair::new(Arc::new(store)).execute().is_err());
    }
}
