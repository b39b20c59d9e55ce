use std::sync::Arc;

use tracing::{debug, warn};
use uc_core::crypto::{decode_crypt_public_key, SecureKeyPair, SessionCipher};
use uc_core::ports::TrustStorePort;
use uc_core::AppInstanceId;

use super::SecureChannelError;

const AAD_DOMAIN: &[u8] = b"uc-secure-channel-v1";

/// Authenticated encryption keyed by peer identity.
///
/// The trust store is the only authority on whether a peer may exchange
/// payloads with us: no stored key, no channel.
pub struct SecureChannel {
    local_id: AppInstanceId,
    key_pair: Arc<SecureKeyPair>,
    trust_store: Arc<dyn TrustStorePort>,
}

impl SecureChannel {
    pub fn new(
        local_id: AppInstanceId,
        key_pair: Arc<SecureKeyPair>,
        trust_store: Arc<dyn TrustStorePort>,
    ) -> Self {
        Self {
            local_id,
            key_pair,
            trust_store,
        }
    }

    /// First write wins; see [`TrustStorePort::save_key`].
    pub async fn save_key(
        &self,
        peer_id: &AppInstanceId,
        public_key: &[u8],
    ) -> Result<bool, SecureChannelError> {
        let saved = self.trust_store.save_key(peer_id, public_key).await?;
        if !saved {
            debug!(peer_id = %peer_id, "Trust key already present, keeping existing");
        }
        Ok(saved)
    }

    pub async fn exists(&self, peer_id: &AppInstanceId) -> Result<bool, SecureChannelError> {
        Ok(self.trust_store.exists(peer_id).await?)
    }

    pub async fn get_key(
        &self,
        peer_id: &AppInstanceId,
    ) -> Result<Option<Vec<u8>>, SecureChannelError> {
        Ok(self.trust_store.get_key(peer_id).await?)
    }

    pub async fn delete(&self, peer_id: &AppInstanceId) -> Result<(), SecureChannelError> {
        Ok(self.trust_store.delete(peer_id).await?)
    }

    pub async fn encrypt_for(
        &self,
        peer_id: &AppInstanceId,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, SecureChannelError> {
        let cipher = self.cipher_for(peer_id).await?;
        let aad = channel_aad(&self.local_id, peer_id);
        Ok(cipher.seal(plaintext, &aad)?)
    }

    pub async fn decrypt_from(
        &self,
        peer_id: &AppInstanceId,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, SecureChannelError> {
        let cipher = self.cipher_for(peer_id).await?;
        let aad = channel_aad(peer_id, &self.local_id);
        cipher.open(ciphertext, &aad).map_err(|err| {
            warn!(peer_id = %peer_id, "Rejected payload that failed authentication");
            SecureChannelError::from(err)
        })
    }

    async fn cipher_for(&self, peer_id: &AppInstanceId) -> Result<SessionCipher, SecureChannelError> {
        let stored = self
            .trust_store
            .get_key(peer_id)
            .await?
            .ok_or_else(|| SecureChannelError::UntrustedPeer(peer_id.to_string()))?;

        let peer_key = decode_crypt_public_key(&stored)?;
        let shared = self.key_pair.diffie_hellman(&peer_key)?;
        Ok(SessionCipher::from_shared_secret(&shared))
    }
}

/// Binds a ciphertext to its direction so it cannot be reflected back.
fn channel_aad(sender: &AppInstanceId, recipient: &AppInstanceId) -> Vec<u8> {
    let mut aad = Vec::with_capacity(AAD_DOMAIN.len() + sender.as_str().len() + recipient.as_str().len() + 2);
    aad.extend_from_slice(AAD_DOMAIN);
    aad.push(0);
    aad.extend_from_slice(sender.as_str().as_bytes());
    aad.push(0);
    aad.extend_from_slice(recipient.as_str().as_bytes());
    aad
}
