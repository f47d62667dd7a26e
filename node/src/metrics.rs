//! Prometheus metrics for the HushVote node.
//!
//! Counters are driven by the engine's event stream, so they only move when
//! a state change actually committed. [`NodeMetrics`] owns a dedicated
//! [`Registry`] that [`NodeMetrics::encode`] renders in the text exposition
//! format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use hush_voting::VotingEvent;

use crate::NodeError;

/// Central collection of all node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub votings_created: IntCounter,
    pub ballots_accepted: IntCounter,
    /// Ballots refused by validation, eligibility or proof checks.
    pub ballots_rejected: IntCounter,
    pub decryptions_requested: IntCounter,
    /// Automatic re-requests plus creator renewals.
    pub decryptions_reissued: IntCounter,
    /// Decryptions that used up every automatic attempt.
    pub decryptions_stalled: IntCounter,
    pub votings_tallied: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Number of votings ever created.
    pub voting_count: IntGauge,
    /// Votings whose decryption was requested but not yet fulfilled.
    pub pending_decryptions: IntGauge,
    /// 1 while the engine is paused.
    pub paused: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent applying one ballot, in milliseconds.
    pub ballot_process_time_ms: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Result<Self, NodeError> {
        let registry = Registry::new();

        // Counters
        let votings_created = register_int_counter_with_registry!(
            Opts::new("hushvote_votings_created_total", "Total votings created"),
            registry
        )?;

        let ballots_accepted = register_int_counter_with_registry!(
            Opts::new(
                "hushvote_ballots_accepted_total",
                "Total ballots folded into encrypted tallies"
            ),
            registry
        )?;

        let ballots_rejected = register_int_counter_with_registry!(
            Opts::new("hushvote_ballots_rejected_total", "Total ballots rejected"),
            registry
        )?;

        let decryptions_requested = register_int_counter_with_registry!(
            Opts::new(
                "hushvote_decryptions_requested_total",
                "Total public decryption requests issued"
            ),
            registry
        )?;

        let decryptions_reissued = register_int_counter_with_registry!(
            Opts::new(
                "hushvote_decryptions_reissued_total",
                "Total decryption requests re-issued after a timeout"
            ),
            registry
        )?;

        let decryptions_stalled = register_int_counter_with_registry!(
            Opts::new(
                "hushvote_decryptions_stalled_total",
                "Total decryptions left unanswered after the final automatic attempt"
            ),
            registry
        )?;

        let votings_tallied = register_int_counter_with_registry!(
            Opts::new("hushvote_votings_tallied_total", "Total votings tallied"),
            registry
        )?;

        // Gauges
        let voting_count = register_int_gauge_with_registry!(
            Opts::new("hushvote_voting_count", "Current number of votings"),
            registry
        )?;

        let pending_decryptions = register_int_gauge_with_registry!(
            Opts::new(
                "hushvote_pending_decryptions",
                "Votings awaiting a decryption callback"
            ),
            registry
        )?;

        let paused = register_int_gauge_with_registry!(
            Opts::new("hushvote_paused", "Whether ballot intake is paused"),
            registry
        )?;

        // Histograms – exponential buckets covering 0.1 ms → ~1.6 s.
        let ballot_process_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "hushvote_ballot_process_time_ms",
                "Ballot processing time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            votings_created,
            ballots_accepted,
            ballots_rejected,
            decryptions_requested,
            decryptions_reissued,
            decryptions_stalled,
            votings_tallied,
            voting_count,
            pending_decryptions,
            paused,
            ballot_process_time_ms,
        })
    }

    /// Update counters and gauges for one committed event.
    pub fn observe(&self, event: &VotingEvent) {
        match event {
            VotingEvent::VotingCreated { .. } => {
                self.votings_created.inc();
                self.voting_count.inc();
            }
            VotingEvent::VoteCast { .. } => self.ballots_accepted.inc(),
            VotingEvent::DecryptionRequested { .. } => {
                self.decryptions_requested.inc();
                self.pending_decryptions.inc();
            }
            VotingEvent::DecryptionReissued { .. } | VotingEvent::DecryptionRenewed { .. } => {
                self.decryptions_reissued.inc()
            }
            VotingEvent::DecryptionStalled { .. } => self.decryptions_stalled.inc(),
            VotingEvent::VotingTallied { .. } => {
                self.votings_tallied.inc();
                self.pending_decryptions.dec();
            }
            VotingEvent::Paused { .. } => self.paused.set(1),
            VotingEvent::Unpaused { .. } => self.paused.set(0),
            _ => {}
        }
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| NodeError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_crypto::DecryptionRequestId;
    use hush_types::{VoterAddress, VotingId};

    #[test]
    fn events_drive_counters() {
        let metrics = NodeMetrics::new().unwrap();
        let id = VotingId::new(0);

        metrics.observe(&VotingEvent::DecryptionRequested {
            id,
            request_id: DecryptionRequestId::new(1),
        });
        assert_eq!(metrics.pending_decryptions.get(), 1);

        metrics.observe(&VotingEvent::DecryptionStalled { id, attempts: 3 });
        metrics.observe(&VotingEvent::DecryptionRenewed {
            id,
            request_id: DecryptionRequestId::new(4),
        });
        assert_eq!(metrics.decryptions_stalled.get(), 1);
        assert_eq!(metrics.decryptions_reissued.get(), 1);
        assert_eq!(metrics.pending_decryptions.get(), 1);

        metrics.observe(&VotingEvent::VotingTallied {
            id,
            results: vec![0, 1],
        });
        assert_eq!(metrics.votings_tallied.get(), 1);
        assert_eq!(metrics.pending_decryptions.get(), 0);

        metrics.observe(&VotingEvent::Paused {
            by: VoterAddress::from_bytes([1; 20]),
        });
        assert_eq!(metrics.paused.get(), 1);
    }

    #[test]
    fn encode_includes_registered_names() {
        let metrics = NodeMetrics::new().unwrap();
        metrics.ballots_rejected.inc();
        let text = metrics.encode().unwrap();
        assert!(text.contains("hushvote_ballots_rejected_total 1"));
        assert!(text.contains("hushvote_voting_count"));
    }

    #[test]
    fn independent_registries_do_not_collide() {
        assert!(NodeMetrics::new().is_ok());
        assert!(NodeMetrics::new().is_ok());
    }
}
