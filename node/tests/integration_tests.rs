//! Integration tests exercising the node end to end:
//! creation → encrypted ballots → decryption request → relayed fulfilment →
//! revealed results, over both storage backends.
//!
//! Ballots are encrypted with the plaintext-passthrough backend so each test
//! can predict the tally exactly.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hush_crypto::ProofContext;
use hush_node::{NodeConfig, NodeError, StorageBackend, VotingNode};
use hush_nullables::{NullClock, PlainFhe};
use hush_types::{Timestamp, VoterAddress, VotingId, VotingType};
use hush_voting::{Ballot, VotingConfig, VotingError, VotingEvent};

const T0: u64 = 1_700_000_000;
const START: u64 = T0 + 60;
const END: u64 = START + 7_200;

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn relayed_fulfilment_reveals_results() {
    let mut h = Harness::memory();
    h.node.start().await.unwrap();

    let tallied = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&tallied);
    h.node
        .subscribe(Box::new(move |event| {
            if let VotingEvent::VotingTallied { .. } = event {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }))
        .await;

    let id = h.create(VotingType::SingleChoice, 3).await;
    h.clock.set(START + 10);
    for (n, choice) in [(1, 2), (2, 2), (3, 0)] {
        h.vote_single(id, n, choice).await.unwrap();
    }

    h.clock.set(END + 1);
    let request = h.node.request_decryption(&creator(), id).await.unwrap();
    let fulfillment = h.fhe.fulfillment_for(request).unwrap().unwrap();
    h.node.deliver_fulfillment(fulfillment).await.unwrap();

    let results = wait_for_results(&h.node, id).await;
    assert_eq!(results, vec![1, 0, 2]);
    assert_eq!(tallied.load(Ordering::SeqCst), 1);

    assert_eq!(h.node.metrics.ballots_accepted.get(), 3);
    assert_eq!(h.node.metrics.votings_tallied.get(), 1);
    assert_eq!(h.node.metrics.pending_decryptions.get(), 0);

    h.node.stop().await.unwrap();
}

#[tokio::test]
async fn rejected_ballots_are_counted() {
    let h = Harness::memory();
    let id = h.create(VotingType::SingleChoice, 2).await;

    let err = h.vote_single(id, 1, 0).await.unwrap_err();
    assert!(matches!(
        err,
        NodeError::Voting(VotingError::OutsideVotingPeriod { .. })
    ));

    h.clock.set(START);
    h.vote_single(id, 1, 0).await.unwrap();
    let err = h.vote_single(id, 1, 1).await.unwrap_err();
    assert!(matches!(err, NodeError::Voting(VotingError::AlreadyVoted(_))));

    assert_eq!(h.node.metrics.ballots_rejected.get(), 2);
    assert_eq!(h.node.metrics.ballots_accepted.get(), 1);
    assert_eq!(h.node.metrics.ballot_process_time_ms.get_sample_count(), 1);
}

#[tokio::test]
async fn watchdog_reissues_then_stalls_until_renewed() {
    let mut config = NodeConfig::in_memory();
    config.decryption_timeout_secs = 30;
    config.watchdog_interval_secs = 1;
    config.max_decryption_attempts = 2;
    let mut h = Harness::with_config(config);
    h.node.start().await.unwrap();

    let id = h.create(VotingType::SingleChoice, 2).await;
    h.clock.set(END + 1);
    h.node.request_decryption(&creator(), id).await.unwrap();
    h.clock.advance(31);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while h.fhe.requests().len() < 2 {
        assert!(tokio::time::Instant::now() < deadline, "watchdog never re-requested");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(h.node.metrics.decryptions_reissued.get(), 1);

    // Attempts are exhausted; the watchdog stalls the voting once and keeps
    // quiet from here on.
    h.clock.advance(31);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while h.node.metrics.decryptions_stalled.get() < 1 {
        assert!(tokio::time::Instant::now() < deadline, "decryption never stalled");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(h.fhe.requests().len(), 2);
    assert_eq!(h.node.metrics.decryptions_stalled.get(), 1);

    // The creator renews and the renewed request reveals the tally.
    let renewed = h.node.request_decryption(&creator(), id).await.unwrap();
    assert_eq!(h.node.metrics.decryptions_reissued.get(), 2);
    let fulfillment = h.fhe.fulfillment_for(renewed).unwrap().unwrap();
    h.node.deliver_fulfillment(fulfillment).await.unwrap();
    assert_eq!(wait_for_results(&h.node, id).await, vec![0, 0]);
    assert_eq!(h.node.metrics.pending_decryptions.get(), 0);

    h.node.stop().await.unwrap();
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lmdb_ledger_survives_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = NodeConfig::default();
    config.storage = StorageBackend::Lmdb;
    config.data_dir = dir.path().join("ledger");
    config.lmdb_map_size = 64 * 1024 * 1024;

    let fhe = Arc::new(PlainFhe::new());
    let clock = Arc::new(NullClock::new(T0));

    let id = {
        let h = Harness::from_parts(config.clone(), fhe.clone(), clock.clone());
        let id = h.create(VotingType::Quadratic, 2).await;
        h.clock.set(START);
        let voter = test_voter(4);
        let (votes, proof) = h
            .fhe
            .encrypt_input(&[3, 1], &ProofContext::new(id, voter.clone()));
        h.node
            .cast_ballot(
                &voter,
                id,
                Ballot::Quadratic {
                    votes,
                    credits: vec![9, 1],
                },
                &proof,
            )
            .await
            .unwrap();
        id
    };

    let h = Harness::from_parts(config, fhe, clock);
    let voter = test_voter(4);
    let (count, voted, credits, owner) = h
        .node
        .engine()
        .read(|engine| {
            (
                engine.voting_count().unwrap(),
                engine.has_voted(id, &voter).unwrap(),
                engine.voter_credits(id, &voter).unwrap(),
                engine.owner().unwrap(),
            )
        })
        .await;
    assert_eq!(count, 1);
    assert!(voted);
    assert_eq!(credits, 90);
    assert_eq!(owner, test_owner());
    assert_eq!(h.node.metrics.voting_count.get(), 1);
}

#[tokio::test]
async fn damaged_data_dir_is_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = NodeConfig::default();
    config.data_dir = dir.path().to_path_buf();

    let result = VotingNode::new(
        config,
        Arc::new(PlainFhe::new()),
        Arc::new(NullClock::new(T0)),
        test_owner(),
    );
    assert!(matches!(result, Err(NodeError::Integrity(_))));
}

// ---------------------------------------------------------------------------
// Lifecycle of the node itself
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_twice_is_rejected() {
    let mut h = Harness::memory();
    h.node.start().await.unwrap();
    assert!(matches!(h.node.start().await, Err(NodeError::AlreadyStarted)));
    h.node.stop().await.unwrap();
    assert!(h.node.shutdown.is_shutting_down());
}

#[tokio::test]
async fn config_from_toml_builds_memory_node() {
    let config = NodeConfig::from_toml_str(
        r#"
            storage = "memory"
            watchdog_interval_secs = 5
        "#,
    )
    .unwrap();
    let h = Harness::with_config(config);
    assert_eq!(h.node.config.storage, StorageBackend::Memory);
    let text = h.node.metrics.encode().unwrap();
    assert!(text.contains("hushvote_voting_count 0"));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    node: VotingNode,
    fhe: Arc<PlainFhe>,
    clock: Arc<NullClock>,
}

impl Harness {
    fn memory() -> Self {
        Self::with_config(NodeConfig::in_memory())
    }

    fn with_config(config: NodeConfig) -> Self {
        Self::from_parts(
            config,
            Arc::new(PlainFhe::new()),
            Arc::new(NullClock::new(T0)),
        )
    }

    fn from_parts(config: NodeConfig, fhe: Arc<PlainFhe>, clock: Arc<NullClock>) -> Self {
        let node = VotingNode::new(config, fhe.clone(), clock.clone(), test_owner())
            .expect("node should open");
        Self { node, fhe, clock }
    }

    async fn create(&self, voting_type: VotingType, options: usize) -> VotingId {
        let names: Vec<String> = (0..options).map(|i| format!("option {i}")).collect();
        let config = VotingConfig {
            name: "Integration".into(),
            description: "node-level test".into(),
            voting_type,
            start_time: Timestamp::new(START),
            end_time: Timestamp::new(END),
            quorum: 1,
            whitelist_enabled: false,
            max_voters: 100,
        };
        self.node
            .create_voting(&creator(), config, &names, &names)
            .await
            .expect("create voting")
    }

    async fn vote_single(&self, id: VotingId, n: u8, choice: u64) -> Result<(), NodeError> {
        let voter = test_voter(n);
        let (mut cts, proof) = self
            .fhe
            .encrypt_input(&[choice], &ProofContext::new(id, voter.clone()));
        self.node
            .cast_ballot(&voter, id, Ballot::Single { choice: cts.remove(0) }, &proof)
            .await
    }
}

async fn wait_for_results(node: &VotingNode, id: VotingId) -> Vec<u64> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(results) = node.decrypted_results(id).await {
            return results;
        }
        assert!(tokio::time::Instant::now() < deadline, "results never revealed");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn test_voter(n: u8) -> VoterAddress {
    VoterAddress::from_bytes([n; 20])
}

fn test_owner() -> VoterAddress {
    VoterAddress::from_bytes([0xAA; 20])
}

fn creator() -> VoterAddress {
    VoterAddress::from_bytes([0xCC; 20])
}
