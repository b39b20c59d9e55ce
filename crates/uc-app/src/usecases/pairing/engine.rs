//! Pairing protocol engine
//!
//! 配对引擎: drives the key-exchange handshake with one peer at a time per
//! instance identifier and promotes confirmed keys into the trust store.
//!
//! ```text
//! Initiator                                   Responder
//!   initiate(peer) ── PairingRequest ──────────► handle_request(from, req)
//!                                                 validate keys + timestamp
//!                  ◄────────────── PairingResponse  store pending session
//!   validate keys + timestamp
//!   derive token (ECDH)                         derive token (ECDH)
//!   ShowToken                                   ShowToken
//!        └──── user compares tokens on both devices ────┘
//!   confirm(peer, match) / trust_by_token(peer, entered)
//!        ├── match    → save peer key-exchange key → Trusted
//!        └── mismatch → discard pending keys       → Rejected
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, info, info_span, warn, Instrument};

use uc_core::config::PairingConfig;
use uc_core::crypto::{
    decode_crypt_public_key, decode_sign_public_key, KeyKind, PairingToken, SecureKeyPair,
};
use uc_core::pairing::{
    validate_timestamp, PairingError, PairingEvent, PairingRequest, PairingResponse, PairingRole,
    PairingSession, PairingState,
};
use uc_core::ports::{ClockPort, PairingTransportPort, TrustStorePort};
use uc_core::AppInstanceId;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Runtime settings of the engine.
#[derive(Debug, Clone)]
pub struct PairingEngineConfig {
    pub response_timeout: Duration,
    pub confirm_timeout_ms: i64,
    pub max_clock_skew_ms: i64,
    pub token_digits: u32,
    pub auto_trust: bool,
}

impl Default for PairingEngineConfig {
    fn default() -> Self {
        Self::from_config(&PairingConfig::default())
    }
}

impl PairingEngineConfig {
    pub fn from_config(config: &PairingConfig) -> Self {
        let secs_to_ms = |secs: u64| i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX);

        Self {
            response_timeout: Duration::from_secs(config.response_timeout_secs.max(1)),
            confirm_timeout_ms: secs_to_ms(config.confirm_timeout_secs.max(1)),
            max_clock_skew_ms: secs_to_ms(config.max_clock_skew_secs),
            token_digits: config.token_digits,
            auto_trust: config.auto_trust,
        }
    }
}

pub struct PairingEngine {
    config: PairingEngineConfig,
    key_pair: Arc<SecureKeyPair>,
    transport: Arc<dyn PairingTransportPort>,
    trust_store: Arc<dyn TrustStorePort>,
    clock: Arc<dyn ClockPort>,
    /// Sessions per peer, active or terminal
    sessions: Arc<RwLock<HashMap<AppInstanceId, PairingSession>>>,
    event_senders: Arc<Mutex<Vec<mpsc::Sender<PairingEvent>>>>,
}

impl PairingEngine {
    pub fn new(
        config: PairingEngineConfig,
        key_pair: Arc<SecureKeyPair>,
        transport: Arc<dyn PairingTransportPort>,
        trust_store: Arc<dyn TrustStorePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            config,
            key_pair,
            transport,
            trust_store,
            clock,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            event_senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Step 1 (initiator). Returns the locally derived token once the
    /// responder answered; trust is only established after [`Self::confirm`].
    pub async fn initiate(&self, peer_id: &AppInstanceId) -> Result<PairingToken, PairingError> {
        let span = info_span!("pairing.initiate", peer_id = %peer_id);
        async {
            let request = PairingRequest::new(
                self.key_pair.serialize_public_key(KeyKind::Sign),
                self.key_pair.serialize_public_key(KeyKind::Crypt),
                self.clock.now_ms(),
            );

            let response = match tokio::time::timeout(
                self.config.response_timeout,
                self.transport.send_request(peer_id, request),
            )
            .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(err)) => return Err(self.fail(peer_id, err).await),
                Err(_) => {
                    let err = PairingError::PairingTimeout(format!(
                        "no response from {} within {:?}",
                        peer_id, self.config.response_timeout
                    ));
                    return Err(self.fail(peer_id, err).await);
                }
            };

            let token = match self.accept_peer_keys(
                peer_id,
                PairingRole::Initiator,
                &response.sign_public_key,
                &response.crypt_public_key,
                response.timestamp,
            )
            .await
            {
                Ok(token) => token,
                Err(err) => return Err(self.fail(peer_id, err).await),
            };

            if self.config.auto_trust {
                self.confirm(peer_id, true).await?;
            }
            Ok(token)
        }
        .instrument(span)
        .await
    }

    /// Step 2 (responder). Validates the request, stores the offered keys as
    /// pending and returns the local response.
    pub async fn handle_request(
        &self,
        from: &AppInstanceId,
        request: PairingRequest,
    ) -> Result<PairingResponse, PairingError> {
        let span = info_span!("pairing.handle_request", peer_id = %from);
        async {
            if let Err(err) = self
                .accept_peer_keys(
                    from,
                    PairingRole::Responder,
                    &request.sign_public_key,
                    &request.crypt_public_key,
                    request.timestamp,
                )
                .await
            {
                return Err(self.fail(from, err).await);
            }

            if self.config.auto_trust {
                self.confirm(from, true).await?;
            }

            Ok(PairingResponse::new(
                self.key_pair.serialize_public_key(KeyKind::Sign),
                self.key_pair.serialize_public_key(KeyKind::Crypt),
                self.clock.now_ms(),
            ))
        }
        .instrument(span)
        .await
    }

    /// Step 4. The user reports whether the tokens shown on both devices
    /// match.
    pub async fn confirm(
        &self,
        peer_id: &AppInstanceId,
        tokens_match: bool,
    ) -> Result<(), PairingError> {
        let span = info_span!("pairing.confirm", peer_id = %peer_id, tokens_match);
        async {
            let now = self.clock.now_ms();
            let (peer_key, created_at_ms) = {
                let mut sessions = self.sessions.write().await;
                let session = sessions
                    .get_mut(peer_id)
                    .filter(|s| s.state.is_active())
                    .ok_or_else(|| PairingError::SessionNotFound(peer_id.to_string()))?;

                if session.is_expired(now, self.config.confirm_timeout_ms) {
                    session.state = session.state.expire();
                    discard_keys(session);
                    drop(sessions);
                    let err = PairingError::PairingTimeout(format!(
                        "confirmation for {peer_id} arrived after the session expired"
                    ));
                    return Err(self.fail(peer_id, err).await);
                }

                if !tokens_match {
                    session.state = session.state.on_confirm(false);
                    discard_keys(session);
                    drop(sessions);
                    info!("Pairing rejected by user");
                    self.emit(PairingEvent::Rejected {
                        peer_id: peer_id.clone(),
                    })
                    .await;
                    return Err(PairingError::TrustRejected(peer_id.to_string()));
                }

                (session.peer_crypt_public_key.clone(), session.created_at_ms)
            };

            // Trust store I/O runs without the sessions lock held.
            let promoted = self.promote(peer_id, &peer_key).await;

            {
                let mut sessions = self.sessions.write().await;
                match sessions
                    .get_mut(peer_id)
                    .filter(|s| s.created_at_ms == created_at_ms && s.state.is_active())
                {
                    Some(session) if promoted.is_ok() => {
                        session.state = session.state.on_confirm(true);
                    }
                    Some(session) => {
                        session.state = session.state.on_failure();
                        discard_keys(session);
                    }
                    None => debug!("Pairing session changed while promoting the peer key"),
                }
            }

            if let Err(err) = promoted {
                return Err(self.fail(peer_id, err).await);
            }

            info!("Peer trusted");
            self.emit(PairingEvent::Trusted {
                peer_id: peer_id.clone(),
            })
            .await;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Confirms by the token the user typed in from the other device.
    pub async fn trust_by_token(
        &self,
        peer_id: &AppInstanceId,
        entered: u32,
    ) -> Result<(), PairingError> {
        let token = self
            .pending_token(peer_id)
            .await
            .ok_or_else(|| PairingError::SessionNotFound(peer_id.to_string()))?;
        self.confirm(peer_id, token.matches(entered)).await
    }

    pub async fn state(&self, peer_id: &AppInstanceId) -> Option<PairingState> {
        self.sessions.read().await.get(peer_id).map(|s| s.state)
    }

    pub async fn pending_token(&self, peer_id: &AppInstanceId) -> Option<PairingToken> {
        self.sessions
            .read()
            .await
            .get(peer_id)
            .filter(|s| s.state.is_active())
            .map(|s| s.token)
    }

    pub async fn subscribe(&self) -> mpsc::Receiver<PairingEvent> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.event_senders.lock().await.push(event_tx);
        event_rx
    }

    /// Expires pending sessions past the confirmation window and drops
    /// terminal sessions older than it. Returns how many sessions expired.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let ttl = self.config.confirm_timeout_ms;
        let mut expired = Vec::new();

        {
            let mut sessions = self.sessions.write().await;
            sessions.retain(|peer_id, session| {
                if session.is_expired(now, ttl) {
                    session.state = session.state.expire();
                    discard_keys(session);
                    expired.push(peer_id.clone());
                    return true;
                }
                session.state.is_active() || now.saturating_sub(session.created_at_ms) <= ttl
            });
        }

        for peer_id in &expired {
            debug!(peer_id = %peer_id, "Pairing session expired");
            self.emit(PairingEvent::Failed {
                peer_id: peer_id.clone(),
                reason: "pairing session expired".to_string(),
            })
            .await;
        }
        expired.len()
    }

    /// Forgets any session with `peer_id`, e.g. after the device was removed.
    pub async fn forget(&self, peer_id: &AppInstanceId) {
        self.sessions.write().await.remove(peer_id);
    }

    async fn accept_peer_keys(
        &self,
        peer_id: &AppInstanceId,
        role: PairingRole,
        sign_public_key: &[u8],
        crypt_public_key: &[u8],
        timestamp: i64,
    ) -> Result<PairingToken, PairingError> {
        let now = self.clock.now_ms();
        validate_timestamp(now, timestamp, self.config.max_clock_skew_ms)?;

        decode_sign_public_key(sign_public_key)?;
        let peer_crypt = decode_crypt_public_key(crypt_public_key)?;
        let shared = self.key_pair.diffie_hellman(&peer_crypt)?;
        let token = PairingToken::derive(shared.as_bytes(), self.config.token_digits);

        let session = PairingSession::new(
            peer_id.clone(),
            role,
            sign_public_key.to_vec(),
            crypt_public_key.to_vec(),
            token,
            now,
        );
        if let Some(previous) = self.sessions.write().await.insert(peer_id.clone(), session) {
            if previous.state.is_active() {
                debug!(peer_id = %peer_id, "Replacing pending pairing session");
            }
        }

        info!(role = ?role, "Keys exchanged, awaiting token confirmation");
        self.emit(PairingEvent::ShowToken {
            peer_id: peer_id.clone(),
            role,
            token: token.to_string(),
        })
        .await;
        Ok(token)
    }

    /// Writes the peer key to the trust store. A different key already on
    /// record is replaced, since re-pairing is an explicit user action.
    async fn promote(&self, peer_id: &AppInstanceId, peer_key: &[u8]) -> Result<(), PairingError> {
        let storage = |e: uc_core::ports::TrustStoreError| PairingError::Storage(e.to_string());

        if self.trust_store.save_key(peer_id, peer_key).await.map_err(storage)? {
            return Ok(());
        }

        let existing = self.trust_store.get_key(peer_id).await.map_err(storage)?;
        if existing.as_deref() == Some(peer_key) {
            return Ok(());
        }

        warn!(peer_id = %peer_id, "Re-pairing replaces the stored trust key");
        self.trust_store.delete(peer_id).await.map_err(storage)?;
        if !self.trust_store.save_key(peer_id, peer_key).await.map_err(storage)? {
            return Err(PairingError::Storage(format!(
                "trust key for {peer_id} was written concurrently"
            )));
        }
        Ok(())
    }

    async fn fail(&self, peer_id: &AppInstanceId, err: PairingError) -> PairingError {
        warn!(peer_id = %peer_id, error = %err, "Pairing failed");
        self.emit(PairingEvent::Failed {
            peer_id: peer_id.clone(),
            reason: err.to_string(),
        })
        .await;
        err
    }

    /// Never waits on a subscriber: a full queue drops the event.
    async fn emit(&self, event: PairingEvent) {
        let mut senders = self.event_senders.lock().await;
        senders.retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(peer_id = %event.peer_id(), "Pairing event subscriber is full, event dropped");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Pairing event receiver dropped");
                false
            }
        });
    }
}

fn discard_keys(session: &mut PairingSession) {
    session.peer_sign_public_key.clear();
    session.peer_crypt_public_key.clear();
}
