//! Pairing wire messages.
//!
//! Both messages carry the sender's raw signing public key, raw key-exchange
//! public key and a millisecond timestamp. On the wire they travel as JSON
//! with base64 key fields, wrapped in [`PairingMessage`].

use serde::{Deserialize, Serialize};

use super::PairingError;
use crate::crypto::{decode_crypt_public_key, decode_sign_public_key};

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

macro_rules! pairing_key_message {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            #[serde(with = "base64_bytes")]
            pub sign_public_key: Vec<u8>,
            #[serde(with = "base64_bytes")]
            pub crypt_public_key: Vec<u8>,
            pub timestamp: i64,
        }

        impl $name {
            pub fn new(sign_public_key: Vec<u8>, crypt_public_key: Vec<u8>, timestamp: i64) -> Self {
                Self {
                    sign_public_key,
                    crypt_public_key,
                    timestamp,
                }
            }

            /// Checks that both keys decode to valid curve points.
            pub fn validate_keys(&self) -> Result<(), PairingError> {
                decode_sign_public_key(&self.sign_public_key)?;
                decode_crypt_public_key(&self.crypt_public_key)?;
                Ok(())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("sign_public_key_len", &self.sign_public_key.len())
                    .field("crypt_public_key_len", &self.crypt_public_key.len())
                    .field("timestamp", &self.timestamp)
                    .finish()
            }
        }
    };
}

pairing_key_message!(
    /// Step 1: sent by the initiator.
    PairingRequest
);

pairing_key_message!(
    /// Step 2: the responder's reply once the request passed validation.
    PairingResponse
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body")]
pub enum PairingMessage {
    Request(PairingRequest),
    Response(PairingResponse),
}

impl PairingMessage {
    pub fn encode(&self) -> Result<Vec<u8>, PairingError> {
        serde_json::to_vec(self).map_err(|e| PairingError::ProtocolViolation(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PairingError> {
        serde_json::from_slice(bytes).map_err(|e| PairingError::ProtocolViolation(e.to_string()))
    }
}

/// Rejects timestamps further than `max_skew_ms` from `now_ms` in either direction.
pub fn validate_timestamp(now_ms: i64, timestamp: i64, max_skew_ms: i64) -> Result<(), PairingError> {
    let skew_ms = now_ms.saturating_sub(timestamp).saturating_abs();
    if skew_ms > max_skew_ms {
        return Err(PairingError::StalePairing { timestamp, skew_ms });
    }
    Ok(())
}
