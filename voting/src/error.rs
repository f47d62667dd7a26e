use hush_crypto::{DecryptionRequestId, FheError};
use hush_store::StoreError;
use hush_types::{Timestamp, VoterAddress, VotingId, VotingType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    // ── Creation ────────────────────────────────────────────────────────
    #[error("invalid voting window: start {start}, end {end}")]
    InvalidTimeWindow { start: Timestamp, end: Timestamp },

    #[error("too many options: {0}")]
    TooManyOptions(usize),

    #[error("insufficient options: {0}")]
    InsufficientOptions(usize),

    #[error("invalid voter capacity: {0}")]
    InvalidVoterCapacity(u32),

    #[error("quorum {quorum} exceeds voter capacity {max_voters}")]
    InvalidQuorum { quorum: u32, max_voters: u32 },

    // ── Authorization ───────────────────────────────────────────────────
    #[error("voting {0} does not exist")]
    VotingNotFound(VotingId),

    #[error("outside voting period: now {now}, window {start}..={end}")]
    OutsideVotingPeriod {
        now: Timestamp,
        start: Timestamp,
        end: Timestamp,
    },

    #[error("voting is paused")]
    Paused,

    #[error("{0} has already voted")]
    AlreadyVoted(VoterAddress),

    #[error("{0} is not whitelisted")]
    NotWhitelisted(VoterAddress),

    #[error("voting is full: capacity {0} reached")]
    VotingFull(u32),

    #[error("invalid input proof")]
    InvalidProof,

    // ── Ballot shape ────────────────────────────────────────────────────
    #[error("array length mismatch: {left} != {right}")]
    ArrayLengthMismatch { left: usize, right: usize },

    #[error("invalid options count: expected {expected}, got {got}")]
    InvalidOptionsCount { expected: usize, got: usize },

    #[error("ballot of type {got} submitted to a {expected} voting")]
    WrongVotingType { expected: VotingType, got: VotingType },

    #[error("invalid weight: {0}")]
    InvalidWeight(u32),

    #[error("invalid voting power: {0}")]
    InvalidVotingPower(u32),

    // ── Credits ─────────────────────────────────────────────────────────
    #[error("insufficient credits: requested {requested}, available {available}")]
    InsufficientCredits { requested: u64, available: u32 },

    #[error("invalid credits amount: {0}")]
    InvalidCreditsAmount(u32),

    #[error("voting {0} is not a quadratic voting")]
    NotQuadraticVoting(VotingId),

    // ── Lifecycle ───────────────────────────────────────────────────────
    #[error("only the voting creator may request decryption")]
    NotVotingCreator,

    #[error("voting has not ended")]
    VotingNotEnded,

    #[error("decryption already requested")]
    AlreadyDecrypted,

    #[error("results not available")]
    ResultsNotAvailable,

    #[error("unknown decryption request {0}")]
    UnknownDecryptionRequest(DecryptionRequestId),

    #[error("decryption returned {got} values for {expected} options")]
    DecryptionLengthMismatch { expected: usize, got: usize },

    #[error("votings cannot be deleted (voting {0})")]
    DeletionUnsupported(VotingId),

    // ── Administration ──────────────────────────────────────────────────
    #[error("caller is not the owner")]
    NotOwner,

    #[error("caller is neither the owner nor the voting creator")]
    Unauthorized,

    #[error("the zero address cannot own the ledger")]
    ZeroAddress,

    #[error("invalid public key")]
    InvalidPublicKey,

    // ── Infrastructure ──────────────────────────────────────────────────
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("FHE error: {0}")]
    Fhe(#[from] FheError),

    #[error("codec error: {0}")]
    Codec(String),
}
