use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use uc_app::usecases::pairing::{PairingEngine, PairingEngineConfig};
use uc_app::{AnnouncementOutcome, BlacklistService, SyncManager, SyncRuntimeRegistry};
use uc_core::crypto::SecureKeyPair;
use uc_core::pairing::{PairingError, PairingRequest, PairingResponse};
use uc_core::ports::{ClockPort, PairingTransportPort, TrustStorePort};
use uc_core::sync::{AppInfo, EndpointInfo, HostInfo, Platform, SyncState, VersionRelation};
use uc_core::{AppInstanceId, SyncInfo};
use uc_infra::db::executor::DieselSqliteExecutor;
use uc_infra::db::mappers::SyncRuntimeInfoRowMapper;
use uc_infra::db::pool::init_db_pool;
use uc_infra::db::repositories::{DieselSyncRuntimeInfoRepository, DieselTrustKeyRepository};
use uc_infra::{FileConfigStore, NoopDiscoveryRefresh};

struct ManualClock(AtomicI64);

impl ManualClock {
    fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

struct UnreachableTransport;

#[async_trait]
impl PairingTransportPort for UnreachableTransport {
    async fn send_request(
        &self,
        peer_id: &AppInstanceId,
        _request: PairingRequest,
    ) -> Result<PairingResponse, PairingError> {
        Err(PairingError::Transport(format!("{peer_id} unreachable")))
    }
}

struct Harness {
    _dir: TempDir,
    clock: Arc<ManualClock>,
    registry: Arc<SyncRuntimeRegistry>,
    trust: Arc<dyn TrustStorePort>,
    manager: SyncManager,
}

fn harness(marketing_mode: bool) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("uniclipboard.db");
    let pool = init_db_pool(db_path.to_str().unwrap()).expect("Failed to init db");
    let executor = DieselSqliteExecutor::new(pool);

    let clock = Arc::new(ManualClock(AtomicI64::new(1_700_000_000_000)));
    let registry = Arc::new(SyncRuntimeRegistry::new(
        Arc::new(DieselSyncRuntimeInfoRepository::new(
            executor.clone(),
            SyncRuntimeInfoRowMapper,
        )),
        clock.clone(),
    ));
    let trust: Arc<dyn TrustStorePort> =
        Arc::new(DieselTrustKeyRepository::new(executor, clock.clone()));
    let blacklist = Arc::new(BlacklistService::new(
        Arc::new(FileConfigStore::new(dir.path().join("config_store.json"))),
        Arc::new(NoopDiscoveryRefresh),
    ));
    let engine = Arc::new(PairingEngine::new(
        PairingEngineConfig::default(),
        Arc::new(SecureKeyPair::generate()),
        Arc::new(UnreachableTransport),
        trust.clone(),
        clock.clone(),
    ));

    let manager = SyncManager::new(
        "1.1.0",
        marketing_mode,
        blacklist,
        registry.clone(),
        trust.clone(),
        engine,
    );

    Harness {
        _dir: dir,
        clock,
        registry,
        trust,
        manager,
    }
}

fn announcement(id: &str, version: &str) -> SyncInfo {
    SyncInfo {
        app_info: AppInfo {
            app_instance_id: AppInstanceId::new(id),
            app_version: version.to_string(),
            user_name: "erin".to_string(),
        },
        endpoint_info: EndpointInfo {
            device_id: format!("device-{id}"),
            device_name: "Erin's MacBook".to_string(),
            platform: Platform {
                name: "macOS".to_string(),
                version: "14.5".to_string(),
                arch: "aarch64".to_string(),
                bit_mode: 64,
            },
            host_list: vec![HostInfo {
                network_prefix_length: 24,
                host_address: "10.0.0.7".to_string(),
            }],
            port: 13129,
        },
    }
}

#[tokio::test]
async fn version_bump_while_connected_updates_record() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-x");

    let outcome = h.manager.on_announcement(announcement("peer-x", "1.0")).await;
    assert_eq!(outcome, AnnouncementOutcome::Updated { changed: true });
    let created = h.registry.get(&id).await.unwrap().unwrap();
    assert_eq!(created.app_version, "1.0");
    assert_eq!(created.connect_state, SyncState::Disconnected);

    h.clock.advance(1_000);
    let handler = h.manager.handler(&id).await.unwrap();
    handler.update_connect_state(SyncState::Connected).await.unwrap();
    let connected = h.registry.get(&id).await.unwrap().unwrap();

    h.clock.advance(1_000);
    let outcome = h.manager.on_announcement(announcement("peer-x", "1.1")).await;
    assert_eq!(outcome, AnnouncementOutcome::Updated { changed: true });

    let updated = h.registry.get(&id).await.unwrap().unwrap();
    assert_eq!(updated.app_version, "1.1");
    assert_eq!(updated.connect_state, SyncState::Connected);
    assert!(updated.modify_time > connected.modify_time);
    assert_eq!(updated.create_time, created.create_time);
}

#[tokio::test]
async fn identical_announcement_leaves_connected_record_untouched() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-y");

    h.manager.on_announcement(announcement("peer-y", "1.0")).await;
    h.registry
        .update_connect_state(&id, SyncState::Connected)
        .await
        .unwrap();
    let before = h.registry.get(&id).await.unwrap().unwrap();

    h.clock.advance(5_000);
    let first = h.manager.on_announcement(announcement("peer-y", "1.0")).await;
    let second = h.manager.on_announcement(announcement("peer-y", "1.0")).await;

    assert_eq!(first, AnnouncementOutcome::Updated { changed: false });
    assert_eq!(second, AnnouncementOutcome::Updated { changed: false });
    assert_eq!(h.registry.get(&id).await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn disconnected_peer_is_freshened_without_changes() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-z");

    h.manager.on_announcement(announcement("peer-z", "1.0")).await;
    let before = h.registry.get(&id).await.unwrap().unwrap();

    let outcome = h.manager.on_announcement(announcement("peer-z", "1.0")).await;
    assert_eq!(outcome, AnnouncementOutcome::Updated { changed: false });

    let after = h.registry.get(&id).await.unwrap().unwrap();
    assert!(after.modify_time > before.modify_time);
    assert_eq!(after.app_version, before.app_version);
    assert_eq!(after.host_list, before.host_list);
}

#[tokio::test]
async fn blacklisted_peer_announcements_are_dropped() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-b");

    h.manager.on_announcement(announcement("peer-b", "1.0")).await;
    assert!(h.manager.block_device(&id).await.unwrap());
    assert!(h.manager.handler(&id).await.is_none());

    let outcome = h.manager.on_announcement(announcement("peer-b", "2.0")).await;
    assert_eq!(outcome, AnnouncementOutcome::Blocked);
    assert!(h.manager.handler(&id).await.is_none());
    let stored = h.registry.get(&id).await.unwrap().unwrap();
    assert_eq!(stored.app_version, "1.0");

    assert!(h.manager.blacklist().remove(&id).await.unwrap());
    let outcome = h.manager.on_announcement(announcement("peer-b", "2.0")).await;
    assert_eq!(outcome, AnnouncementOutcome::Updated { changed: true });
}

#[tokio::test]
async fn remove_device_forgets_trust_and_record() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-r");

    h.manager.on_announcement(announcement("peer-r", "1.0")).await;
    let peer_keys = SecureKeyPair::generate();
    h.trust
        .save_key(
            &id,
            &peer_keys.serialize_public_key(uc_core::crypto::KeyKind::Crypt),
        )
        .await
        .unwrap();
    assert!(h.manager.handler(&id).await.unwrap().is_trusted().await);

    h.manager.remove_device(&id).await.unwrap();

    assert!(!h.trust.exists(&id).await.unwrap());
    assert!(h.registry.get(&id).await.unwrap().is_none());
    assert!(h.manager.handler(&id).await.is_none());
    // second removal is a no-op
    h.manager.remove_device(&id).await.unwrap();
}

#[tokio::test]
async fn general_handler_reports_version_and_pairing_failure() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-v");
    h.manager.on_announcement(announcement("peer-v", "1.0.3")).await;

    let handler = h.manager.handler(&id).await.unwrap();
    assert_eq!(handler.version_relation().await, Some(VersionRelation::LowerThan));
    assert!(!handler.is_trusted().await);
    assert!(matches!(
        handler.try_pair().await,
        Err(PairingError::Transport(_))
    ));
}

#[tokio::test]
async fn general_handler_has_no_relation_for_unparseable_version() {
    let h = harness(false);
    let id = AppInstanceId::new("peer-g");
    h.manager.on_announcement(announcement("peer-g", "nightly")).await;

    let handler = h.manager.handler(&id).await.unwrap();
    assert_eq!(handler.version_relation().await, None);
}

#[tokio::test]
async fn marketing_handler_is_a_connected_no_op() {
    let h = harness(true);
    let id = AppInstanceId::new("peer-m");
    h.manager.on_announcement(announcement("peer-m", "0.9")).await;

    let handler = h.manager.handler(&id).await.unwrap();
    assert!(handler.is_trusted().await);
    assert_eq!(handler.version_relation().await, Some(VersionRelation::EqualTo));
    assert_eq!(handler.try_pair().await, Ok(None));
    handler.update_connect_state(SyncState::Disconnected).await.unwrap();

    let shown = handler.sync_runtime_info().await.unwrap();
    assert_eq!(shown.connect_state, SyncState::Connected);
    // the stored record is not driven by the demo handler
    let stored = h.registry.get(&id).await.unwrap().unwrap();
    assert_eq!(stored.connect_state, SyncState::Disconnected);
}

#[tokio::test]
async fn registry_lists_newest_first() {
    let h = harness(false);
    h.manager.on_announcement(announcement("first", "1.0")).await;
    h.clock.advance(10);
    h.manager.on_announcement(announcement("second", "1.0")).await;

    let ids: Vec<String> = h
        .registry
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|info| info.app_instance_id.to_string())
        .collect();
    assert_eq!(ids, vec!["second".to_string(), "first".to_string()]);
}
