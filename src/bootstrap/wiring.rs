//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on `uc-infra` and `uc-app` at once. It
//! assembles adapters into services and makes no decisions of its own.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::info;
use uc_app::usecases::pairing::{PairingEngine, PairingEngineConfig};
use uc_app::{
    BlacklistService, LoadOrGenerateKeyPair, PasteSyncProcessManager, SecureChannel, SyncManager,
    SyncRuntimeRegistry,
};
use uc_core::config::AppConfig;
use uc_core::crypto::SecureKeyPair;
use uc_core::ports::{ClockPort, PairingTransportPort, TrustStorePort};
use uc_core::AppInstanceId;
use uc_infra::db::executor::DieselSqliteExecutor;
use uc_infra::db::mappers::SyncRuntimeInfoRowMapper;
use uc_infra::db::pool::init_db_pool;
use uc_infra::db::repositories::{DieselSyncRuntimeInfoRepository, DieselTrustKeyRepository};
use uc_infra::{
    FileConfigStore, FileKeyPairStore, NoopDiscoveryRefresh, PlaceholderPairingTransport,
    SystemClock,
};

pub type WiringResult<T> = Result<T, WiringError>;

/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    #[error("Key material initialization failed: {0}")]
    KeyMaterial(String),

    #[error("Configuration is missing the app instance id")]
    MissingInstanceId,
}

/// Fully assembled services for one process.
pub struct AppServices {
    pub config: AppConfig,
    pub local_id: AppInstanceId,
    pub key_pair: Arc<SecureKeyPair>,
    pub trust_store: Arc<dyn TrustStorePort>,
    pub registry: Arc<SyncRuntimeRegistry>,
    pub blacklist: Arc<BlacklistService>,
    pub pairing: Arc<PairingEngine>,
    pub channel: Arc<SecureChannel>,
    pub sync_manager: Arc<SyncManager>,
    pub process_manager: Arc<PasteSyncProcessManager<u64>>,
}

/// Wires services with no pairing transport attached; pairing attempts
/// fail with a transport error. Enough for local administration.
pub fn wire_services(config: AppConfig) -> WiringResult<AppServices> {
    wire_services_with_transport(config, Arc::new(PlaceholderPairingTransport))
}

pub fn wire_services_with_transport(
    config: AppConfig,
    transport: Arc<dyn PairingTransportPort>,
) -> WiringResult<AppServices> {
    let local_id = config
        .app_instance_id
        .clone()
        .ok_or(WiringError::MissingInstanceId)?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WiringError::DatabaseInit(e.to_string()))?;
    }
    let database_url = config.database_path.to_string_lossy().to_string();
    let pool = init_db_pool(&database_url).map_err(|e| WiringError::DatabaseInit(e.to_string()))?;
    let executor = DieselSqliteExecutor::new(pool);

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let key_pair = LoadOrGenerateKeyPair::new(Arc::new(FileKeyPairStore::new(
        config.key_pair_path.clone(),
    )))
        .execute()
        .map_err(|e| WiringError::KeyMaterial(e.to_string()))?;
    let key_pair = Arc::new(key_pair);

    let trust_store: Arc<dyn TrustStorePort> =
        Arc::new(DieselTrustKeyRepository::new(executor.clone(), clock.clone()));
    let registry = Arc::new(SyncRuntimeRegistry::new(
        Arc::new(DieselSyncRuntimeInfoRepository::new(
            executor,
            SyncRuntimeInfoRowMapper,
        )),
        clock.clone(),
    ));
    let blacklist = Arc::new(BlacklistService::new(
        Arc::new(FileConfigStore::new(config.config_store_path.clone())),
        Arc::new(NoopDiscoveryRefresh),
    ));

    let pairing = Arc::new(PairingEngine::new(
        PairingEngineConfig::from_config(&config.pairing),
        key_pair.clone(),
        transport,
        trust_store.clone(),
        clock,
    ));
    let channel = Arc::new(SecureChannel::new(
        local_id.clone(),
        key_pair.clone(),
        trust_store.clone(),
    ));
    let sync_manager = Arc::new(SyncManager::new(
        config.app_version.clone(),
        config.marketing_mode,
        blacklist.clone(),
        registry.clone(),
        trust_store.clone(),
        pairing.clone(),
    ));
    let process_manager = Arc::new(PasteSyncProcessManager::new(Arc::new(Semaphore::new(
        config.sync.max_concurrent_tasks.max(1),
    ))));

    info!(
        app_instance_id = %local_id,
        database = %database_url,
        marketing_mode = config.marketing_mode,
        "Services wired"
    );

    Ok(AppServices {
        config,
        local_id,
        key_pair,
        trust_store,
        registry,
        blacklist,
        pairing,
        channel,
        sync_manager,
        process_manager,
    })
}
