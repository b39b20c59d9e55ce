use async_trait::async_trait;
use tracing::warn;
use uc_core::pairing::{PairingError, PairingRequest, PairingResponse};
use uc_core::ports::PairingTransportPort;
use uc_core::AppInstanceId;

/// Placeholder transport for processes without a network stack; every
/// pairing attempt fails with a transport error.
#[derive(Debug, Default)]
pub struct PlaceholderPairingTransport;

#[async_trait]
impl PairingTransportPort for PlaceholderPairingTransport {
    async fn send_request(
        &self,
        peer_id: &AppInstanceId,
        _request: PairingRequest,
    ) -> Result<PairingResponse, PairingError> {
        warn!(peer_id = %peer_id, "Pairing requested but no transport is attached");
        Err(PairingError::Transport(format!(
            "no pairing transport attached, cannot reach {peer_id}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_transport_always_fails() {
        let request = PairingRequest::new(vec![1; 32], vec![2; 32], 0);
        let err = PlaceholderPairingTransport
            .send_request(&AppInstanceId::new("peer"), request)
            .await
            .unwrap_err();
        assert!(matches!(err, PairingError::Transport(_)));
    }
}
