//! Cryptographic primitives
//!
//! - **Key material**: Ed25519 signing + X25519 key-exchange pairs
//! - **Pairing token**: short numeric code derived from the ECDH shared secret
//! - **Session cipher**: XChaCha20-Poly1305 keyed from the shared secret
//! - **Identity fingerprint**: human-comparable rendering of a public key

mod error;
pub mod identity_fingerprint;
pub mod pairing_token;
pub mod secure_key_pair;
pub mod session_cipher;

pub use error::CryptoError;
pub use identity_fingerprint::{FingerprintError, IdentityFingerprint};
pub use pairing_token::{PairingToken, DEFAULT_TOKEN_DIGITS};
pub use secure_key_pair::{
    decode_crypt_public_key, decode_sign_public_key, deserialize_public_key, verify_signature,
    KeyKind, PublicKey, SecureKeyPair, PUBLIC_KEY_LEN,
};
pub use session_cipher::SessionCipher;
