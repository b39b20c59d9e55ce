use async_trait::async_trait;

use crate::ids::AppInstanceId;
use crate::pairing::{PairingError, PairingRequest, PairingResponse};

/// Delivers a pairing request to a peer and returns its response. The
/// transport protocol and framing are the implementation's concern.
#[async_trait]
pub trait PairingTransportPort: Send + Sync {
    async fn send_request(
        &self,
        peer_id: &AppInstanceId,
        request: PairingRequest,
    ) -> Result<PairingResponse, PairingError>;
}
