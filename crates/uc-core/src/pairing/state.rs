use serde::{Deserialize, Serialize};

/// Per-peer pairing session state
///
/// Pure state definitions and transition helpers. Timeouts and the actual
/// promotion of keys into the trust store are driven by the application layer.
///
/// ```text
/// AwaitingConfirm
///  ├── confirm(match=true)  ──► Trusted
///  ├── confirm(match=false) ──► Rejected
///  ├── timeout              ──► Expired
///  └── storage/transport    ──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairingState {
    /// Keys exchanged and token shown; waiting for the user to compare tokens
    AwaitingConfirm,

    /// Token confirmed and the peer key was promoted to a trust record
    Trusted,

    /// User reported a token mismatch; pending keys discarded
    Rejected,

    /// Confirmation did not arrive in time
    Expired,

    /// Handshake aborted by an error after keys were exchanged
    Failed,
}

impl PairingState {
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::AwaitingConfirm)
    }

    pub fn on_confirm(self, tokens_match: bool) -> Self {
        match self {
            Self::AwaitingConfirm if tokens_match => Self::Trusted,
            Self::AwaitingConfirm => Self::Rejected,
            _ => self,
        }
    }

    pub fn on_failure(self) -> Self {
        if self.is_active() {
            Self::Failed
        } else {
            self
        }
    }

    pub fn expire(self) -> Self {
        if self.is_active() {
            Self::Expired
        } else {
            self
        }
    }
}

/// Which side of the handshake the local instance played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairingRole {
    Initiator,
    Responder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_awaiting_confirm_is_active() {
        assert!(PairingState::AwaitingConfirm.is_active());
        for state in [
            PairingState::Trusted,
            PairingState::Rejected,
            PairingState::Expired,
            PairingState::Failed,
        ] {
            assert!(state.is_terminal(), "{state:?} should be terminal");
        }
    }

    #[test]
    fn test_on_confirm() {
        assert_eq!(PairingState::AwaitingConfirm.on_confirm(true), PairingState::Trusted);
        assert_eq!(PairingState::AwaitingConfirm.on_confirm(false), PairingState::Rejected);

        // terminal states stay put
        assert_eq!(PairingState::Expired.on_confirm(true), PairingState::Expired);
        assert_eq!(PairingState::Rejected.on_confirm(true), PairingState::Rejected);
    }

    #[test]
    fn test_expire_and_failure_only_from_active() {
        assert_eq!(PairingState::AwaitingConfirm.expire(), PairingState::Expired);
        assert_eq!(PairingState::Trusted.expire(), PairingState::Trusted);

        assert_eq!(PairingState::AwaitingConfirm.on_failure(), PairingState::Failed);
        assert_eq!(PairingState::Rejected.on_failure(), PairingState::Rejected);
    }
}
