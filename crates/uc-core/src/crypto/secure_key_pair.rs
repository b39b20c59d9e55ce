//! Local key material: one signing key pair plus one key-exchange key pair.
//!
//! ```text
//! SecureKeyPair
//!   ├── sign:  Ed25519  (SigningKey / VerifyingKey)
//!   └── crypt: X25519   (StaticSecret / PublicKey)
//! ```
//!
//! Public keys travel on the wire and rest in the trust store as their raw
//! 32-byte encodings. Secret material is only exposed through
//! [`SecureKeyPair::to_secret_bytes`] inside a zeroizing buffer.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey as CryptPublicKey, SharedSecret, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use super::CryptoError;

/// Length of both raw public key encodings.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Length of the serialized secret material (sign secret || crypt secret).
pub const SECRET_BYTES_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Sign,
    Crypt,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Sign => write!(f, "sign"),
            KeyKind::Crypt => write!(f, "crypt"),
        }
    }
}

/// A decoded peer public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
    Sign(VerifyingKey),
    Crypt(CryptPublicKey),
}

impl PublicKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            PublicKey::Sign(_) => KeyKind::Sign,
            PublicKey::Crypt(_) => KeyKind::Crypt,
        }
    }

    /// Canonical wire/at-rest encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Sign(key) => key.to_bytes().to_vec(),
            PublicKey::Crypt(key) => key.as_bytes().to_vec(),
        }
    }
}

/// Decodes raw public key bytes of the given kind.
pub fn deserialize_public_key(bytes: &[u8], kind: KeyKind) -> Result<PublicKey, CryptoError> {
    match kind {
        KeyKind::Sign => decode_sign_public_key(bytes).map(PublicKey::Sign),
        KeyKind::Crypt => decode_crypt_public_key(bytes).map(PublicKey::Crypt),
    }
}

pub fn decode_sign_public_key(bytes: &[u8]) -> Result<VerifyingKey, CryptoError> {
    let raw = fixed_len(bytes, KeyKind::Sign)?;
    VerifyingKey::from_bytes(&raw)
        .map_err(|_| CryptoError::malformed(KeyKind::Sign, "not a valid curve point"))
}

pub fn decode_crypt_public_key(bytes: &[u8]) -> Result<CryptPublicKey, CryptoError> {
    let raw = fixed_len(bytes, KeyKind::Crypt)?;
    if raw.iter().all(|b| *b == 0) {
        return Err(CryptoError::malformed(KeyKind::Crypt, "identity point"));
    }
    Ok(CryptPublicKey::from(raw))
}

fn fixed_len(bytes: &[u8], kind: KeyKind) -> Result<[u8; PUBLIC_KEY_LEN], CryptoError> {
    bytes.try_into().map_err(|_| {
        CryptoError::malformed(
            kind,
            format!("expected {} bytes, got {}", PUBLIC_KEY_LEN, bytes.len()),
        )
    })
}

/// Verifies `signature` over `message` with a raw signing public key.
pub fn verify_signature(
    sign_public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let key = decode_sign_public_key(sign_public_key)?;
    let signature = Signature::from_slice(signature).map_err(|_| CryptoError::MalformedSignature)?;
    key.verify(message, &signature)
        .map_err(|_| CryptoError::BadSignature)
}

/// The local instance's long-term key material.
///
/// Immutable once generated; owned by the local application instance.
#[derive(Clone)]
pub struct SecureKeyPair {
    sign_key: SigningKey,
    crypt_secret: StaticSecret,
    crypt_public: CryptPublicKey,
}

impl SecureKeyPair {
    /// Generates fresh signing and key-exchange key pairs from the OS-seeded RNG.
    pub fn generate() -> Self {
        let mut sign_seed = [0u8; 32];
        let mut crypt_seed = [0u8; 32];
        let mut rng = rand::rng();
        rng.fill_bytes(&mut sign_seed);
        rng.fill_bytes(&mut crypt_seed);

        let pair = Self::from_seeds(sign_seed, crypt_seed);
        sign_seed.zeroize();
        crypt_seed.zeroize();
        pair
    }

    fn from_seeds(sign_seed: [u8; 32], crypt_seed: [u8; 32]) -> Self {
        let sign_key = SigningKey::from_bytes(&sign_seed);
        let crypt_secret = StaticSecret::from(crypt_seed);
        let crypt_public = CryptPublicKey::from(&crypt_secret);
        Self {
            sign_key,
            crypt_secret,
            crypt_public,
        }
    }

    pub fn sign_public_key(&self) -> VerifyingKey {
        self.sign_key.verifying_key()
    }

    pub fn crypt_public_key(&self) -> CryptPublicKey {
        self.crypt_public
    }

    pub fn public_key(&self, kind: KeyKind) -> PublicKey {
        match kind {
            KeyKind::Sign => PublicKey::Sign(self.sign_public_key()),
            KeyKind::Crypt => PublicKey::Crypt(self.crypt_public),
        }
    }

    /// Raw encoding of one of the local public keys.
    pub fn serialize_public_key(&self, kind: KeyKind) -> Vec<u8> {
        self.public_key(kind).to_bytes()
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.sign_key.sign(message).to_bytes().to_vec()
    }

    /// Elliptic-curve Diffie-Hellman against a peer key-exchange public key.
    ///
    /// Rejects low-order peer keys.
    pub fn diffie_hellman(&self, peer: &CryptPublicKey) -> Result<SharedSecret, CryptoError> {
        let shared = self.crypt_secret.diffie_hellman(peer);
        if !shared.was_contributory() {
            return Err(CryptoError::NonContributory);
        }
        Ok(shared)
    }

    /// Serializes both secrets for an encrypted-at-rest store.
    pub fn to_secret_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::with_capacity(SECRET_BYTES_LEN));
        out.extend_from_slice(&self.sign_key.to_bytes());
        out.extend_from_slice(self.crypt_secret.as_bytes());
        out
    }

    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SECRET_BYTES_LEN {
            return Err(CryptoError::MalformedSecret(format!(
                "expected {} bytes, got {}",
                SECRET_BYTES_LEN,
                bytes.len()
            )));
        }
        let mut sign_seed = [0u8; 32];
        let mut crypt_seed = [0u8; 32];
        sign_seed.copy_from_slice(&bytes[..32]);
        crypt_seed.copy_from_slice(&bytes[32..]);

        let pair = Self::from_seeds(sign_seed, crypt_seed);
        sign_seed.zeroize();
        crypt_seed.zeroize();
        Ok(pair)
    }
}

impl fmt::Debug for SecureKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureKeyPair")
            .field("sign_public_key", &self.sign_public_key())
            .field("crypt_public_key", &self.crypt_public)
            .field("secrets", &"[REDACTED]")
            .finish()
    }
}
