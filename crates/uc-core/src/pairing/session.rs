use super::{PairingRole, PairingState};
use crate::crypto::PairingToken;
use crate::ids::AppInstanceId;

/// Pending pairing session held by the engine between key exchange and
/// user confirmation. Peer keys are not trusted until the session reaches
/// [`PairingState::Trusted`].
#[derive(Debug, Clone)]
pub struct PairingSession {
    pub peer_id: AppInstanceId,
    pub role: PairingRole,
    pub peer_sign_public_key: Vec<u8>,
    pub peer_crypt_public_key: Vec<u8>,
    pub token: PairingToken,
    pub created_at_ms: i64,
    pub state: PairingState,
}

impl PairingSession {
    pub fn new(
        peer_id: AppInstanceId,
        role: PairingRole,
        peer_sign_public_key: Vec<u8>,
        peer_crypt_public_key: Vec<u8>,
        token: PairingToken,
        created_at_ms: i64,
    ) -> Self {
        Self {
            peer_id,
            role,
            peer_sign_public_key,
            peer_crypt_public_key,
            token,
            created_at_ms,
            state: PairingState::AwaitingConfirm,
        }
    }

    pub fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.state.is_active() && now_ms.saturating_sub(self.created_at_ms) > ttl_ms
    }
}
