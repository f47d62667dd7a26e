//! The voting engine: every protocol operation, from creation to tally.
//!
//! Each mutating operation loads the records it needs, validates, computes
//! the new state on owned copies, and commits exactly one [`WriteBatch`].
//! A rejected operation therefore leaves no trace in the store. Mutations
//! take `&mut self`, so a single engine is a single writer; the node wraps it
//! in a mutex to serialise concurrent callers.

use std::sync::Arc;

use hush_crypto::{
    Ciphertext, DecryptionFulfillment, DecryptionRequestId, FheCapability, InputProof,
    ProofContext,
};
use hush_store::meta::{NEXT_VOTING_ID_KEY, OWNER_KEY, PAUSED_KEY};
use hush_store::{LedgerStore, StoreError, WriteBatch};
use hush_types::{Clock, ProtocolLimits, Timestamp, VoterAddress, VotingId, VotingStatus, VotingType};
use hush_utils::format_duration;

use crate::ballot::{Ballot, BallotProcessor};
use crate::config::VotingConfig;
use crate::credits::{CreditLedger, QuadraticStats};
use crate::eligibility::EligibilityGuard;
use crate::error::VotingError;
use crate::events::VotingEvent;
use crate::records::{decode, encode, CreditBalance, VoteAllocation, VoterRecord};
use crate::registry::VotingRegistry;
use crate::tally::{FulfillOutcome, ReissueDecision, TallyCoordinator};
use crate::voting::{Voting, VotingFull, VotingOption, VotingSummary};

pub struct VotingEngine {
    store: Arc<dyn LedgerStore>,
    fhe: Arc<dyn FheCapability>,
    clock: Arc<dyn Clock>,
    limits: ProtocolLimits,
    pub registry: VotingRegistry,
    pub eligibility: EligibilityGuard,
    pub ballots: BallotProcessor,
    pub credits: CreditLedger,
    pub tally: TallyCoordinator,
    /// Pending events for the node to process.
    pending_events: Vec<VotingEvent>,
}

impl VotingEngine {
    /// Open an engine over `store`.
    ///
    /// `owner` is recorded only when the store has no owner yet; a reopened
    /// ledger keeps the owner it already has.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        fhe: Arc<dyn FheCapability>,
        clock: Arc<dyn Clock>,
        limits: ProtocolLimits,
        owner: VoterAddress,
    ) -> Result<Self, VotingError> {
        if store.get_meta(OWNER_KEY)?.is_none() {
            if owner.is_zero() {
                return Err(VotingError::ZeroAddress);
            }
            let mut batch = WriteBatch::new();
            batch.put_meta(OWNER_KEY, owner.as_str().as_bytes());
            store.commit(batch)?;
            tracing::info!(owner = %owner, "ledger owner initialised");
        }

        Ok(Self {
            store,
            fhe,
            clock,
            limits,
            registry: VotingRegistry,
            eligibility: EligibilityGuard,
            ballots: BallotProcessor,
            credits: CreditLedger,
            tally: TallyCoordinator,
            pending_events: Vec::new(),
        })
    }

    pub fn limits(&self) -> &ProtocolLimits {
        &self.limits
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<VotingEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Registry ────────────────────────────────────────────────────────

    /// Create a voting in `NotStarted` with encrypted-zero accumulators.
    pub fn create_voting(
        &mut self,
        creator: &VoterAddress,
        config: VotingConfig,
        option_names: &[impl AsRef<str>],
        option_descriptions: &[impl AsRef<str>],
    ) -> Result<VotingId, VotingError> {
        self.registry
            .validate(&config, option_names, option_descriptions, &self.limits)?;

        let id = VotingId::new(self.voting_count()?);
        let next = id
            .next()
            .ok_or_else(|| StoreError::Corruption("voting counter overflow".to_string()))?;

        let voting = self.registry.build(
            id,
            config,
            option_names,
            option_descriptions,
            creator.clone(),
            &*self.fhe,
            &self.limits,
            self.now(),
        )?;

        let mut batch = WriteBatch::new();
        batch.put_voting(id, &encode(&voting)?);
        batch.put_meta(NEXT_VOTING_ID_KEY, &next.as_u64().to_be_bytes());
        self.store.commit(batch)?;

        tracing::info!(
            voting = %id,
            creator = %creator,
            voting_type = %voting.voting_type(),
            options = voting.option_count(),
            window = %format_duration(voting.config.duration_secs()),
            "voting created"
        );
        self.pending_events.push(VotingEvent::VotingCreated {
            id,
            creator: creator.clone(),
            voting_type: voting.voting_type(),
            start_time: voting.config.start_time,
            end_time: voting.config.end_time,
        });
        Ok(id)
    }

    /// Number of votings ever created (also the next id to be assigned).
    pub fn voting_count(&self) -> Result<u64, VotingError> {
        match self.store.get_meta(NEXT_VOTING_ID_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption("next_voting_id has unexpected byte length".to_string())
                })?;
                Ok(u64::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }

    pub fn get_voting(&self, id: VotingId) -> Result<Voting, VotingError> {
        let bytes = self
            .store
            .get_voting(id)?
            .ok_or(VotingError::VotingNotFound(id))?;
        decode(&bytes)
    }

    pub fn voting_config(&self, id: VotingId) -> Result<VotingConfig, VotingError> {
        Ok(self.get_voting(id)?.config)
    }

    pub fn voting_options(&self, id: VotingId) -> Result<Vec<VotingOption>, VotingError> {
        Ok(self.get_voting(id)?.options)
    }

    pub fn voting_full(&self, id: VotingId) -> Result<VotingFull, VotingError> {
        let voting = self.get_voting(id)?;
        let status = self.tally.status(&voting, self.now());
        Ok(VotingFull::of(&voting, status))
    }

    /// Summaries of every voting, in creation order.
    pub fn voting_summaries(&self) -> Result<Vec<VotingSummary>, VotingError> {
        let now = self.now();
        self.load_all()?
            .iter()
            .map(|voting| Ok(VotingSummary::of(voting, self.tally.status(voting, now))))
            .collect()
    }

    /// Full projections of every voting, in creation order.
    pub fn all_votings_full(&self) -> Result<Vec<VotingFull>, VotingError> {
        let now = self.now();
        self.load_all()?
            .iter()
            .map(|voting| Ok(VotingFull::of(voting, self.tally.status(voting, now))))
            .collect()
    }

    /// Votings are permanent; removal is always refused.
    pub fn remove_voting(&self, id: VotingId) -> Result<(), VotingError> {
        tracing::warn!(voting = %id, "refused to delete voting");
        Err(VotingError::DeletionUnsupported(id))
    }

    // ── Eligibility ─────────────────────────────────────────────────────

    /// Upsert whitelist entries. Owner or creator only.
    pub fn whitelist_voters(
        &mut self,
        caller: &VoterAddress,
        id: VotingId,
        voters: &[VoterAddress],
        powers: &[u32],
    ) -> Result<(), VotingError> {
        let voting = self.get_voting(id)?;
        self.require_admin(caller, &voting)?;
        self.eligibility.validate_whitelist(voters, powers)?;

        let mut batch = WriteBatch::new();
        for (voter, &power) in voters.iter().zip(powers) {
            let record = self.eligibility.whitelist(self.load_record(id, voter)?, power);
            batch.put_voter(id, voter, &encode(&record)?);
        }
        self.store.commit(batch)?;

        tracing::info!(voting = %id, count = voters.len(), "voters whitelisted");
        self.pending_events.push(VotingEvent::VotersWhitelisted {
            id,
            count: voters.len(),
        });
        Ok(())
    }

    /// Would a ballot from `voter` be authorized right now?
    pub fn authorize(&self, id: VotingId, voter: &VoterAddress) -> Result<(), VotingError> {
        let voting = self.get_voting(id)?;
        let record = self.load_record(id, voter)?;
        self.eligibility
            .authorize(&voting, voter, record.as_ref(), self.is_paused()?, self.now())
    }

    pub fn has_voted(&self, id: VotingId, voter: &VoterAddress) -> Result<bool, VotingError> {
        Ok(self.voter_record(id, voter)?.is_some_and(|r| r.has_voted))
    }

    pub fn batch_has_voted(
        &self,
        ids: &[VotingId],
        voter: &VoterAddress,
    ) -> Result<Vec<bool>, VotingError> {
        ids.iter().map(|&id| self.has_voted(id, voter)).collect()
    }

    /// Participation of `voter` in every voting, in creation order.
    pub fn all_user_vote_status(&self, voter: &VoterAddress) -> Result<Vec<bool>, VotingError> {
        (0..self.voting_count()?)
            .map(|n| self.has_voted(VotingId::new(n), voter))
            .collect()
    }

    pub fn voter_record(
        &self,
        id: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<VoterRecord>, VotingError> {
        self.ensure_exists(id)?;
        self.load_record(id, voter)
    }

    pub fn total_votes(&self, id: VotingId) -> Result<u32, VotingError> {
        Ok(self.get_voting(id)?.total_voters)
    }

    // ── Ballots ─────────────────────────────────────────────────────────

    /// Authorize, verify and apply one ballot.
    ///
    /// For quadratic ballots the credit debit and the accumulator update
    /// land in the same batch; if either fails, neither applies.
    pub fn submit_ballot(
        &mut self,
        voter: &VoterAddress,
        id: VotingId,
        ballot: Ballot,
        proof: &InputProof,
    ) -> Result<(), VotingError> {
        let now = self.now();
        let mut voting = self.get_voting(id)?;
        let record = self.load_record(id, voter)?;

        self.eligibility
            .authorize(&voting, voter, record.as_ref(), self.is_paused()?, now)?;
        self.ballots.check_shape(&voting, &ballot, record.as_ref())?;

        let context = ProofContext::new(id, voter.clone());
        if !self.fhe.verify(ballot.ciphertexts(), proof, &context) {
            return Err(VotingError::InvalidProof);
        }

        let mut batch = WriteBatch::new();
        let mut credits_spent = None;
        if let Ballot::Quadratic { credits, .. } = &ballot {
            let balance = self.credits.balance(&voting, self.load_balance(id, voter)?);
            let (after, allocation) = self.credits.spend(&balance, credits)?;
            batch.put_credit_balance(id, voter, &encode(&after)?);
            batch.put_allocation(id, voter, &encode(&allocation)?);
            credits_spent = Some(allocation.total_credits_used);
        }

        voting.accumulators = self.ballots.apply(&*self.fhe, &voting, &ballot)?;
        voting.total_voters += 1;
        let record = VoterRecord {
            has_voted: true,
            voted_at: Some(now),
            ..record.unwrap_or_default()
        };
        batch.put_voting(id, &encode(&voting)?);
        batch.put_voter(id, voter, &encode(&record)?);
        self.store.commit(batch)?;

        tracing::debug!(
            voting = %id,
            voter = %voter,
            ballot = %ballot.kind(),
            total_voters = voting.total_voters,
            "ballot accepted"
        );
        self.pending_events.push(VotingEvent::VoteCast {
            id,
            voter: voter.clone(),
            voting_type: voting.voting_type(),
        });
        if let Some(total_credits) = credits_spent {
            self.pending_events.push(VotingEvent::QuadraticVoteAllocated {
                id,
                voter: voter.clone(),
                total_credits,
            });
        }
        Ok(())
    }

    /// Single-choice ballot (also accepted by multiple-choice votings).
    pub fn cast_vote(
        &mut self,
        voter: &VoterAddress,
        id: VotingId,
        choice: Ciphertext,
        proof: &InputProof,
    ) -> Result<(), VotingError> {
        self.submit_ballot(voter, id, Ballot::Single { choice }, proof)
    }

    pub fn cast_multiple_choice_vote(
        &mut self,
        voter: &VoterAddress,
        id: VotingId,
        selections: Vec<Ciphertext>,
        proof: &InputProof,
    ) -> Result<(), VotingError> {
        self.submit_ballot(voter, id, Ballot::Multiple { selections }, proof)
    }

    pub fn cast_weighted_vote(
        &mut self,
        voter: &VoterAddress,
        id: VotingId,
        choice: Ciphertext,
        weight: u32,
        proof: &InputProof,
    ) -> Result<(), VotingError> {
        self.submit_ballot(voter, id, Ballot::Weighted { choice, weight }, proof)
    }

    pub fn cast_quadratic_vote(
        &mut self,
        voter: &VoterAddress,
        id: VotingId,
        votes: Vec<Ciphertext>,
        credits: Vec<u32>,
        proof: &InputProof,
    ) -> Result<(), VotingError> {
        self.submit_ballot(voter, id, Ballot::Quadratic { votes, credits }, proof)
    }

    // ── Credits ─────────────────────────────────────────────────────────

    pub fn set_default_credits(
        &mut self,
        caller: &VoterAddress,
        id: VotingId,
        amount: u32,
    ) -> Result<(), VotingError> {
        let mut voting = self.get_voting(id)?;
        self.require_admin(caller, &voting)?;
        require_quadratic(&voting)?;
        self.credits.validate_amount(&self.limits, amount)?;

        voting.default_credits = amount;
        let mut batch = WriteBatch::new();
        batch.put_voting(id, &encode(&voting)?);
        self.store.commit(batch)?;

        tracing::info!(voting = %id, amount, "default credits set");
        self.pending_events
            .push(VotingEvent::DefaultCreditsSet { id, amount });
        Ok(())
    }

    /// Give one voter a custom budget, replacing the default for them.
    pub fn allocate_credits(
        &mut self,
        caller: &VoterAddress,
        id: VotingId,
        voter: &VoterAddress,
        amount: u32,
    ) -> Result<(), VotingError> {
        let voting = self.get_voting(id)?;
        self.require_admin(caller, &voting)?;
        require_quadratic(&voting)?;
        self.credits.validate_amount(&self.limits, amount)?;
        if self.load_record(id, voter)?.is_some_and(|r| r.has_voted) {
            return Err(VotingError::AlreadyVoted(voter.clone()));
        }

        let mut batch = WriteBatch::new();
        batch.put_credit_balance(id, voter, &encode(&CreditBalance::custom(amount))?);
        self.store.commit(batch)?;

        tracing::info!(voting = %id, voter = %voter, amount, "credits allocated");
        self.pending_events.push(VotingEvent::CreditsAllocated {
            id,
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    /// Zero the voter's remaining balance once the voting has ended.
    /// Returns the amount refunded.
    pub fn refund_unused_credits(
        &mut self,
        id: VotingId,
        voter: &VoterAddress,
    ) -> Result<u32, VotingError> {
        let voting = self.get_voting(id)?;
        require_quadratic(&voting)?;
        if !self.tally.status(&voting, self.now()).is_closed() {
            return Err(VotingError::VotingNotEnded);
        }

        let balance = self.credits.balance(&voting, self.load_balance(id, voter)?);
        let (after, refunded) = self.credits.refund(&balance);
        let mut batch = WriteBatch::new();
        batch.put_credit_balance(id, voter, &encode(&after)?);
        self.store.commit(batch)?;

        tracing::info!(voting = %id, voter = %voter, refunded, "unused credits refunded");
        self.pending_events.push(VotingEvent::CreditsRefunded {
            id,
            voter: voter.clone(),
            amount: refunded,
        });
        Ok(refunded)
    }

    /// Remaining credits, applying the default lazily.
    pub fn voter_credits(&self, id: VotingId, voter: &VoterAddress) -> Result<u32, VotingError> {
        let voting = self.get_voting(id)?;
        require_quadratic(&voting)?;
        let stored = self.load_balance(id, voter)?;
        Ok(self.credits.balance(&voting, stored).remaining)
    }

    pub fn vote_allocation(
        &self,
        id: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<VoteAllocation>, VotingError> {
        self.ensure_exists(id)?;
        self.store
            .get_allocation(id, voter)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// `false` when the voter has no recorded allocation.
    pub fn verify_quadratic_allocation(
        &self,
        id: VotingId,
        voter: &VoterAddress,
    ) -> Result<bool, VotingError> {
        Ok(self
            .vote_allocation(id, voter)?
            .is_some_and(|a| self.credits.verify_allocation(&a)))
    }

    pub fn quadratic_stats(&self, id: VotingId) -> Result<QuadraticStats, VotingError> {
        let voting = self.get_voting(id)?;
        require_quadratic(&voting)?;
        let allocations = self
            .store
            .iter_allocations(id)?
            .into_iter()
            .map(|(_, bytes)| decode::<VoteAllocation>(&bytes))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.credits.stats(&allocations))
    }

    // ── Tally ───────────────────────────────────────────────────────────

    /// Derived from the clock; never touches the FHE capability.
    pub fn voting_status(&self, id: VotingId) -> Result<VotingStatus, VotingError> {
        let voting = self.get_voting(id)?;
        Ok(self.tally.status(&voting, self.now()))
    }

    /// Issue the public decryption of every accumulator. Creator only.
    ///
    /// Also renews a request the watchdog has given up on.
    pub fn request_decryption(
        &mut self,
        caller: &VoterAddress,
        id: VotingId,
    ) -> Result<DecryptionRequestId, VotingError> {
        let now = self.now();
        let mut voting = self.get_voting(id)?;
        self.tally.check_request(&voting, caller, now)?;
        let renewal = voting.is_stalled();

        let request_id = self.fhe.request_public_decryption(&voting.accumulators)?;
        self.tally.record_request(&mut voting, request_id, now);
        self.persist_decryption(&voting, Some(request_id))?;

        if renewal {
            tracing::info!(voting = %id, request = %request_id, "stalled decryption renewed");
            self.pending_events
                .push(VotingEvent::DecryptionRenewed { id, request_id });
        } else {
            tracing::info!(voting = %id, request = %request_id, "decryption requested");
            self.pending_events
                .push(VotingEvent::DecryptionRequested { id, request_id });
        }
        Ok(request_id)
    }

    /// Deliver a decryption callback. Duplicates for a tallied voting are no-ops.
    pub fn fulfill_decryption(
        &mut self,
        fulfillment: DecryptionFulfillment,
    ) -> Result<FulfillOutcome, VotingError> {
        let DecryptionFulfillment {
            request_id,
            plaintexts,
        } = fulfillment;
        let id = self
            .store
            .get_decryption_request(request_id.as_u64())?
            .ok_or(VotingError::UnknownDecryptionRequest(request_id))?;

        let mut voting = self.get_voting(id)?;
        let outcome = self
            .tally
            .fulfill(&mut voting, request_id, plaintexts, self.now())?;

        match &outcome {
            FulfillOutcome::Tallied(results) => {
                let mut batch = WriteBatch::new();
                batch.put_voting(id, &encode(&voting)?);
                self.store.commit(batch)?;

                tracing::info!(voting = %id, request = %request_id, "voting tallied");
                self.pending_events.push(VotingEvent::VotingTallied {
                    id,
                    results: results.clone(),
                });
            }
            FulfillOutcome::AlreadyTallied => {
                tracing::debug!(voting = %id, request = %request_id, "duplicate decryption fulfilment ignored");
            }
        }
        Ok(outcome)
    }

    /// Re-request every pending decryption older than the timeout, up to the
    /// attempt limit. Returns the requests issued by this sweep.
    ///
    /// A voting that fails to re-request or to record is skipped and retried
    /// on the next sweep.
    pub fn reissue_stale_decryptions(
        &mut self,
    ) -> Result<Vec<(VotingId, DecryptionRequestId)>, VotingError> {
        let now = self.now();
        let mut reissued = Vec::new();

        for mut voting in self.load_all()? {
            let id = voting.id;
            match self.tally.reissue_decision(&voting, now, &self.limits) {
                ReissueDecision::NotDue => {}
                ReissueDecision::Exhausted { attempts } => {
                    self.tally.mark_stalled(&mut voting);
                    if let Err(e) = self.persist_decryption(&voting, None) {
                        tracing::error!(voting = %id, error = %e, "failed to record stalled decryption");
                        continue;
                    }
                    tracing::warn!(voting = %id, attempts, "decryption stalled, awaiting renewal by the creator");
                    self.pending_events
                        .push(VotingEvent::DecryptionStalled { id, attempts });
                }
                ReissueDecision::Reissue { attempt } => {
                    let request_id = match self.fhe.request_public_decryption(&voting.accumulators) {
                        Ok(request_id) => request_id,
                        Err(e) => {
                            tracing::warn!(voting = %id, error = %e, "decryption re-request failed");
                            continue;
                        }
                    };
                    self.tally.record_request(&mut voting, request_id, now);
                    if let Err(e) = self.persist_decryption(&voting, Some(request_id)) {
                        tracing::error!(voting = %id, request = %request_id, error = %e, "failed to record re-requested decryption");
                        continue;
                    }

                    tracing::warn!(voting = %id, request = %request_id, attempt, "decryption re-requested after timeout");
                    self.pending_events.push(VotingEvent::DecryptionReissued {
                        id,
                        request_id,
                        attempt,
                    });
                    reissued.push((id, request_id));
                }
            }
        }
        Ok(reissued)
    }

    pub fn decrypted_results(&self, id: VotingId) -> Result<Vec<u64>, VotingError> {
        let voting = self.get_voting(id)?;
        Ok(self.tally.results(&voting)?.to_vec())
    }

    // ── Administration ──────────────────────────────────────────────────

    pub fn owner(&self) -> Result<VoterAddress, VotingError> {
        let bytes = self
            .store
            .get_meta(OWNER_KEY)?
            .ok_or_else(|| StoreError::NotFound(OWNER_KEY.to_string()))?;
        let raw = std::str::from_utf8(&bytes).map_err(|e| VotingError::Codec(e.to_string()))?;
        VoterAddress::parse(raw).map_err(|e| VotingError::Codec(e.to_string()))
    }

    pub fn is_paused(&self) -> Result<bool, VotingError> {
        Ok(self
            .store
            .get_meta(PAUSED_KEY)?
            .is_some_and(|flag| flag.first() == Some(&1)))
    }

    /// Emergency stop: rejects every ballot until unpaused.
    pub fn pause(&mut self, caller: &VoterAddress) -> Result<(), VotingError> {
        self.set_paused(caller, true)?;
        tracing::warn!(by = %caller, "voting paused");
        self.pending_events.push(VotingEvent::Paused { by: caller.clone() });
        Ok(())
    }

    pub fn unpause(&mut self, caller: &VoterAddress) -> Result<(), VotingError> {
        self.set_paused(caller, false)?;
        tracing::info!(by = %caller, "voting unpaused");
        self.pending_events
            .push(VotingEvent::Unpaused { by: caller.clone() });
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &VoterAddress,
        new_owner: VoterAddress,
    ) -> Result<(), VotingError> {
        let previous = self.owner()?;
        if *caller != previous {
            return Err(VotingError::NotOwner);
        }
        if new_owner.is_zero() {
            return Err(VotingError::ZeroAddress);
        }

        let mut batch = WriteBatch::new();
        batch.put_meta(OWNER_KEY, new_owner.as_str().as_bytes());
        self.store.commit(batch)?;

        tracing::info!(previous = %previous, new_owner = %new_owner, "ownership transferred");
        self.pending_events
            .push(VotingEvent::OwnershipTransferred { previous, new_owner });
        Ok(())
    }

    /// Register (or replace) a user's encryption public key.
    pub fn register_public_key(
        &mut self,
        user: &VoterAddress,
        key: [u8; 32],
    ) -> Result<(), VotingError> {
        if key == [0u8; 32] {
            return Err(VotingError::InvalidPublicKey);
        }
        let mut batch = WriteBatch::new();
        batch.put_public_key(user, key);
        self.store.commit(batch)?;

        tracing::debug!(user = %user, "public key registered");
        self.pending_events
            .push(VotingEvent::PublicKeyRegistered { user: user.clone() });
        Ok(())
    }

    pub fn public_key(&self, user: &VoterAddress) -> Result<Option<[u8; 32]>, VotingError> {
        Ok(self.store.get_public_key(user)?)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Write a voting's decryption state, indexing `request` when one was issued.
    fn persist_decryption(
        &self,
        voting: &Voting,
        request: Option<DecryptionRequestId>,
    ) -> Result<(), VotingError> {
        let mut batch = WriteBatch::new();
        batch.put_voting(voting.id, &encode(voting)?);
        if let Some(request_id) = request {
            batch.put_decryption_request(request_id.as_u64(), voting.id);
        }
        self.store.commit(batch)?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Voting>, VotingError> {
        self.store
            .iter_votings()?
            .into_iter()
            .map(|(_, bytes)| decode(&bytes))
            .collect()
    }

    fn ensure_exists(&self, id: VotingId) -> Result<(), VotingError> {
        match self.store.get_voting(id)? {
            Some(_) => Ok(()),
            None => Err(VotingError::VotingNotFound(id)),
        }
    }

    fn load_record(
        &self,
        id: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<VoterRecord>, VotingError> {
        self.store
            .get_voter(id, voter)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn load_balance(
        &self,
        id: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<CreditBalance>, VotingError> {
        self.store
            .get_credit_balance(id, voter)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn require_owner(&self, caller: &VoterAddress) -> Result<(), VotingError> {
        if *caller == self.owner()? {
            Ok(())
        } else {
            Err(VotingError::NotOwner)
        }
    }

    fn require_admin(&self, caller: &VoterAddress, voting: &Voting) -> Result<(), VotingError> {
        if *caller == voting.creator || *caller == self.owner()? {
            Ok(())
        } else {
            Err(VotingError::Unauthorized)
        }
    }

    fn set_paused(&mut self, caller: &VoterAddress, paused: bool) -> Result<(), VotingError> {
        self.require_owner(caller)?;
        let mut batch = WriteBatch::new();
        batch.put_meta(PAUSED_KEY, &[u8::from(paused)]);
        self.store.commit(batch)?;
        Ok(())
    }
}

fn require_quadratic(voting: &Voting) -> Result<(), VotingError> {
    if voting.voting_type() == VotingType::Quadratic {
        Ok(())
    } else {
        Err(VotingError::NotQuadraticVoting(voting.id))
    }
}
