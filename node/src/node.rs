//! The HushVote node: wires storage, the FHE capability and the voting
//! engine together and runs the decryption relay.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use hush_crypto::{DecryptionFulfillment, DecryptionRequestId, FheCapability, InputProof};
use hush_nullables::NullStore;
use hush_store::LedgerStore;
use hush_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use hush_types::{Clock, VoterAddress, VotingId};
use hush_voting::{Ballot, VotingConfig, VotingEngine, VotingEvent};

use crate::config::{NodeConfig, StorageBackend};
use crate::decryption::DecryptionRelay;
use crate::error::NodeError;
use crate::events::{audit_listener, EventBus};
use crate::handle::EngineHandle;
use crate::metrics::NodeMetrics;
use crate::shutdown::ShutdownController;

/// Timeout for waiting on background tasks during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running HushVote node.
pub struct VotingNode {
    pub config: NodeConfig,
    pub metrics: Arc<NodeMetrics>,
    pub shutdown: Arc<ShutdownController>,
    handle: EngineHandle,
    fulfillment_tx: mpsc::Sender<DecryptionFulfillment>,
    /// Taken by [`start`](Self::start).
    fulfillment_rx: Option<mpsc::Receiver<DecryptionFulfillment>>,
    /// Handles for spawned background tasks (joined during shutdown).
    task_handles: Vec<JoinHandle<()>>,
}

impl VotingNode {
    /// Open the ledger and build the engine. Call [`start`](Self::start) to
    /// run the decryption relay.
    pub fn new(
        config: NodeConfig,
        fhe: Arc<dyn FheCapability>,
        clock: Arc<dyn Clock>,
        owner: VoterAddress,
    ) -> Result<Self, NodeError> {
        config.validate()?;

        let store: Arc<dyn LedgerStore> = match config.storage {
            StorageBackend::Lmdb => Arc::new(open_lmdb(&config)?),
            StorageBackend::Memory => {
                tracing::warn!("using in-memory storage, the ledger will not survive a restart");
                Arc::new(NullStore::new())
            }
        };

        let engine = VotingEngine::new(store, fhe, clock, config.protocol_limits(), owner)?;
        let metrics = Arc::new(NodeMetrics::new()?);
        metrics.voting_count.set(engine.voting_count()? as i64);
        metrics.paused.set(i64::from(engine.is_paused()?));

        let mut bus = EventBus::new();
        if config.audit_events {
            bus.subscribe(audit_listener());
        }

        let (fulfillment_tx, fulfillment_rx) = mpsc::channel(config.event_channel_capacity);

        tracing::info!(
            storage = ?config.storage,
            votings = engine.voting_count()?,
            "voting node initialised"
        );

        Ok(Self {
            handle: EngineHandle::new(engine, bus, Arc::clone(&metrics)),
            config,
            metrics,
            shutdown: Arc::new(ShutdownController::new()),
            fulfillment_tx,
            fulfillment_rx: Some(fulfillment_rx),
            task_handles: Vec::new(),
        })
    }

    /// Install the global tracing subscriber described by the config.
    pub fn init_logging(&self) -> Result<(), NodeError> {
        hush_utils::init_logging(self.config.log_format, &self.config.log_level)?;
        Ok(())
    }

    /// Spawn the fulfilment relay and the stale-decryption watchdog.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        let fulfillments = self
            .fulfillment_rx
            .take()
            .ok_or(NodeError::AlreadyStarted)?;

        self.task_handles.push(DecryptionRelay::spawn_fulfillments(
            self.handle.clone(),
            fulfillments,
            self.shutdown.subscribe(),
        ));
        self.task_handles.push(DecryptionRelay::spawn_watchdog(
            self.handle.clone(),
            Duration::from_secs(self.config.watchdog_interval_secs),
            self.shutdown.subscribe(),
        ));

        tracing::info!(
            watchdog_secs = self.config.watchdog_interval_secs,
            "voting node started"
        );
        Ok(())
    }

    /// Signal every task and wait for them to finish.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        tracing::info!("voting node stopping");
        self.shutdown.shutdown();

        let handles = std::mem::take(&mut self.task_handles);
        let joined = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "background task ended abnormally");
                }
            }
        })
        .await;

        match joined {
            Ok(()) => {
                tracing::info!("voting node stopped");
                Ok(())
            }
            Err(_) => Err(NodeError::ShutdownTimeout),
        }
    }

    /// Access to every engine operation not wrapped below.
    pub fn engine(&self) -> &EngineHandle {
        &self.handle
    }

    pub async fn subscribe(&self, listener: Box<dyn Fn(&VotingEvent) + Send + Sync>) {
        self.handle.subscribe(listener).await;
    }

    /// Sender the FHE coprocessor adapter uses to deliver callbacks.
    pub fn fulfillment_sender(&self) -> mpsc::Sender<DecryptionFulfillment> {
        self.fulfillment_tx.clone()
    }

    /// Queue one decryption callback for the relay.
    pub async fn deliver_fulfillment(
        &self,
        fulfillment: DecryptionFulfillment,
    ) -> Result<(), NodeError> {
        self.fulfillment_tx
            .send(fulfillment)
            .await
            .map_err(|_| NodeError::RelayClosed)
    }

    pub async fn create_voting(
        &self,
        creator: &VoterAddress,
        config: VotingConfig,
        option_names: &[String],
        option_descriptions: &[String],
    ) -> Result<VotingId, NodeError> {
        Ok(self
            .handle
            .write(|engine| {
                engine.create_voting(creator, config, option_names, option_descriptions)
            })
            .await?)
    }

    /// Submit a ballot, counting rejections and timing accepted ballots.
    pub async fn cast_ballot(
        &self,
        voter: &VoterAddress,
        id: VotingId,
        ballot: Ballot,
        proof: &InputProof,
    ) -> Result<(), NodeError> {
        let kind = ballot.kind();
        let start = Instant::now();
        let result = self
            .handle
            .write(|engine| engine.submit_ballot(voter, id, ballot, proof))
            .await;

        match result {
            Ok(()) => {
                self.metrics
                    .ballot_process_time_ms
                    .observe(start.elapsed().as_secs_f64() * 1_000.0);
                Ok(())
            }
            Err(e) => {
                self.metrics.ballots_rejected.inc();
                tracing::warn!(voting = %id, voter = %voter, ballot = %kind, error = %e, "ballot rejected");
                Err(e.into())
            }
        }
    }

    pub async fn request_decryption(
        &self,
        caller: &VoterAddress,
        id: VotingId,
    ) -> Result<DecryptionRequestId, NodeError> {
        Ok(self
            .handle
            .write(|engine| engine.request_decryption(caller, id))
            .await?)
    }

    pub async fn decrypted_results(&self, id: VotingId) -> Result<Vec<u64>, NodeError> {
        Ok(self
            .handle
            .read(|engine| engine.decrypted_results(id))
            .await?)
    }
}

/// Open the LMDB ledger under `data_dir` and refuse to run on a damaged one.
fn open_lmdb(config: &NodeConfig) -> Result<LmdbEnvironment, NodeError> {
    check_data_dir(&config.data_dir).map_err(NodeError::Integrity)?;
    let env = LmdbEnvironment::open(&config.data_dir, config.lmdb_map_size)?;

    let report = check_integrity(&env)?;
    if !report.is_healthy() {
        return Err(NodeError::Integrity(report.errors.join("; ")));
    }
    tracing::info!(
        path = %config.data_dir.display(),
        databases = report.databases_checked,
        entries = report.total_entries,
        "ledger integrity verified"
    );
    Ok(env)
}
