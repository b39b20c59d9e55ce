//! Authenticated encryption keyed by an ECDH shared secret.
//!
//! The session key is `BLAKE3-derive_key(SESSION_CONTEXT, shared_secret)` and
//! payloads are sealed with XChaCha20-Poly1305 as `nonce(24) || ciphertext`.

use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use x25519_dalek::SharedSecret;
use zeroize::Zeroizing;

use super::CryptoError;

const SESSION_CONTEXT: &str = "uniclipboard 2024 secure-channel session key v1";

pub const NONCE_LEN: usize = 24;

pub struct SessionCipher {
    key: Zeroizing<[u8; 32]>,
}

impl SessionCipher {
    pub fn from_shared_secret(shared: &SharedSecret) -> Self {
        Self {
            key: Zeroizing::new(blake3::derive_key(SESSION_CONTEXT, shared.as_bytes())),
        }
    }

    fn cipher(&self) -> Result<XChaCha20Poly1305, CryptoError> {
        XChaCha20Poly1305::new_from_slice(self.key.as_ref()).map_err(|_| CryptoError::EncryptFailed)
    }

    pub fn seal(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher()?
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::EncryptFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    pub fn open(&self, sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if sealed.len() < NONCE_LEN {
            return Err(CryptoError::AuthenticationFailed);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        self.cipher()
            .map_err(|_| CryptoError::AuthenticationFailed)?
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}
