use super::PairingRole;
use crate::ids::AppInstanceId;

/// Notifications published by the pairing engine to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingEvent {
    /// Keys exchanged; show this zero-padded token to the local user.
    ShowToken {
        peer_id: AppInstanceId,
        role: PairingRole,
        token: String,
    },

    /// Peer key promoted to a trust record.
    Trusted { peer_id: AppInstanceId },

    /// User reported a token mismatch.
    Rejected { peer_id: AppInstanceId },

    /// Handshake aborted (timeout, malformed input, storage failure).
    Failed {
        peer_id: AppInstanceId,
        reason: String,
    },
}

impl PairingEvent {
    pub fn peer_id(&self) -> &AppInstanceId {
        match self {
            Self::ShowToken { peer_id, .. }
            | Self::Trusted { peer_id }
            | Self::Rejected { peer_id }
            | Self::Failed { peer_id, .. } => peer_id,
        }
    }
}
