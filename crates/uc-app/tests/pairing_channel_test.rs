use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tempfile::TempDir;
use uc_app::usecases::pairing::{PairingEngine, PairingEngineConfig};
use uc_app::{SecureChannel, SecureChannelError};
use uc_core::crypto::{KeyKind, SecureKeyPair};
use uc_core::pairing::{PairingError, PairingEvent, PairingRequest, PairingResponse};
use uc_core::ports::{PairingTransportPort, TrustStorePort};
use uc_core::{AppInstanceId, PairingState};
use uc_infra::db::executor::DieselSqliteExecutor;
use uc_infra::db::pool::init_db_pool;
use uc_infra::db::repositories::DieselTrustKeyRepository;
use uc_infra::SystemClock;

struct LoopbackTransport {
    local_id: AppInstanceId,
    remote: OnceLock<Arc<PairingEngine>>,
}

#[async_trait]
impl PairingTransportPort for LoopbackTransport {
    async fn send_request(
        &self,
        _peer_id: &AppInstanceId,
        request: PairingRequest,
    ) -> Result<PairingResponse, PairingError> {
        let remote = self
            .remote
            .get()
            .ok_or_else(|| PairingError::Transport("no route".to_string()))?;
        remote.handle_request(&self.local_id, request).await
    }
}

struct Device {
    id: AppInstanceId,
    engine: Arc<PairingEngine>,
    trust: Arc<dyn TrustStorePort>,
    channel: SecureChannel,
    transport: Arc<LoopbackTransport>,
}

fn device(dir: &TempDir, name: &str) -> Device {
    let db_path = dir.path().join(format!("{name}.db"));
    let pool = init_db_pool(db_path.to_str().unwrap()).expect("Failed to init db");
    let trust: Arc<dyn TrustStorePort> = Arc::new(DieselTrustKeyRepository::new(
        DieselSqliteExecutor::new(pool),
        Arc::new(SystemClock),
    ));

    let id = AppInstanceId::new(name);
    let keys = Arc::new(SecureKeyPair::generate());
    let transport = Arc::new(LoopbackTransport {
        local_id: id.clone(),
        remote: OnceLock::new(),
    });
    let engine = Arc::new(PairingEngine::new(
        PairingEngineConfig::default(),
        keys.clone(),
        transport.clone(),
        trust.clone(),
        Arc::new(SystemClock),
    ));
    let channel = SecureChannel::new(id.clone(), keys, trust.clone());

    Device {
        id,
        engine,
        trust,
        channel,
        transport,
    }
}

fn linked(dir: &TempDir) -> (Device, Device) {
    let a = device(dir, "laptop");
    let b = device(dir, "desktop");
    let _ = a.transport.remote.set(b.engine.clone());
    let _ = b.transport.remote.set(a.engine.clone());
    (a, b)
}

#[tokio::test]
async fn paired_devices_exchange_authenticated_payloads() {
    let dir = TempDir::new().unwrap();
    let (a, b) = linked(&dir);
    let mut b_events = b.engine.subscribe().await;

    let token = a.engine.initiate(&b.id).await.unwrap();
    match b_events.recv().await.unwrap() {
        PairingEvent::ShowToken { token: shown, .. } => assert_eq!(shown, token.to_string()),
        other => panic!("unexpected event {other:?}"),
    }

    // each user types the token shown on the other screen
    b.engine.trust_by_token(&a.id, token.value()).await.unwrap();
    a.engine.confirm(&b.id, true).await.unwrap();

    assert_eq!(a.engine.state(&b.id).await, Some(PairingState::Trusted));
    assert!(a.channel.exists(&b.id).await.unwrap());
    assert!(b.channel.exists(&a.id).await.unwrap());

    let sealed = a.channel.encrypt_for(&b.id, b"clipboard: hello").await.unwrap();
    let opened = b.channel.decrypt_from(&a.id, &sealed).await.unwrap();
    assert_eq!(opened, b"clipboard: hello");

    // reflecting A's own payload back to A fails authentication
    assert_eq!(
        a.channel.decrypt_from(&b.id, &sealed).await,
        Err(SecureChannelError::AuthenticationFailed)
    );
}

#[tokio::test]
async fn rejected_pairing_leaves_devices_untrusted() {
    let dir = TempDir::new().unwrap();
    let (a, b) = linked(&dir);

    let token = a.engine.initiate(&b.id).await.unwrap();
    let wrong = (token.value() + 1) % 1_000_000;
    let err = b.engine.trust_by_token(&a.id, wrong).await.unwrap_err();

    assert!(matches!(err, PairingError::TrustRejected(_)));
    assert_eq!(b.engine.state(&a.id).await, Some(PairingState::Rejected));
    assert_eq!(
        b.channel.encrypt_for(&a.id, b"secret").await,
        Err(SecureChannelError::UntrustedPeer(a.id.to_string()))
    );
}

#[tokio::test]
async fn stored_key_is_first_write_wins() {
    let dir = TempDir::new().unwrap();
    let a = device(&dir, "phone");
    let peer = AppInstanceId::new("peerA");
    let first = SecureKeyPair::generate().serialize_public_key(KeyKind::Crypt);
    let second = SecureKeyPair::generate().serialize_public_key(KeyKind::Crypt);

    assert!(a.trust.save_key(&peer, &first).await.unwrap());
    assert!(!a.trust.save_key(&peer, &second).await.unwrap());
    assert_eq!(a.trust.get_key(&peer).await.unwrap(), Some(first.clone()));

    a.trust.delete(&peer).await.unwrap();
    assert!(a.trust.save_key(&peer, &second).await.unwrap());
    assert_eq!(a.trust.get_key(&peer).await.unwrap(), Some(second));
}

#[tokio::test]
async fn re_pairing_replaces_previous_trust_record() {
    let dir = TempDir::new().unwrap();
    let (a, b) = linked(&dir);
    let stale = SecureKeyPair::generate().serialize_public_key(KeyKind::Crypt);
    a.trust.save_key(&b.id, &stale).await.unwrap();

    a.engine.initiate(&b.id).await.unwrap();
    a.engine.confirm(&b.id, true).await.unwrap();

    let stored = a.trust.get_key(&b.id).await.unwrap().unwrap();
    assert_ne!(stored, stale);
    assert_eq!(stored.len(), 32);
}
