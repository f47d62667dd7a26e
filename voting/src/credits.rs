//! Quadratic-voting credit ledger.
//!
//! A voter spends credits across options; `v` votes on one option cost `v²`
//! credits. The ledger validates budgets on the plaintext side, while the
//! encrypted vote counts themselves go to the ballot processor.

use crate::error::VotingError;
use crate::records::{CreditBalance, VoteAllocation};
use crate::voting::Voting;
use hush_types::ProtocolLimits;
use serde::{Deserialize, Serialize};

/// Credits needed for `votes` votes on one option.
///
/// Computed in `u64`, so it cannot overflow for any `u32` input.
pub fn quadratic_cost(votes: u32) -> u64 {
    let v = u64::from(votes);
    v * v
}

/// Largest `r` with `r * r <= n`.
pub fn isqrt(n: u32) -> u32 {
    let n = u64::from(n);
    if n < 2 {
        return n as u32;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x as u32
}

/// Aggregate figures for one quadratic voting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadraticStats {
    /// Sum of the budgets of every voter who cast a ballot.
    pub total_allocated: u64,
    pub total_used: u64,
    /// `total_used / voters`, rounded down; 0 before the first ballot.
    pub average_per_voter: u64,
}

pub struct CreditLedger;

impl CreditLedger {
    pub fn validate_amount(&self, limits: &ProtocolLimits, amount: u32) -> Result<(), VotingError> {
        if limits.credits_in_range(amount) {
            Ok(())
        } else {
            Err(VotingError::InvalidCreditsAmount(amount))
        }
    }

    /// The voter's effective balance: the stored one, or the voting default.
    pub fn balance(&self, voting: &Voting, stored: Option<CreditBalance>) -> CreditBalance {
        stored.unwrap_or_else(|| CreditBalance::from_default(voting.default_credits))
    }

    /// Debit `credits` from `balance`, all or nothing.
    pub fn spend(
        &self,
        balance: &CreditBalance,
        credits: &[u32],
    ) -> Result<(CreditBalance, VoteAllocation), VotingError> {
        let requested: u64 = credits.iter().map(|&c| u64::from(c)).sum();
        if requested > u64::from(balance.remaining) {
            return Err(VotingError::InsufficientCredits {
                requested,
                available: balance.remaining,
            });
        }

        let after = CreditBalance {
            remaining: balance.remaining - requested as u32,
            ..*balance
        };
        let allocation = VoteAllocation {
            credits: credits.to_vec(),
            votes: credits.iter().map(|&c| isqrt(c)).collect(),
            total_credits_used: requested,
            credits_allocated: balance.allocated,
        };
        Ok((after, allocation))
    }

    /// Zero the balance. Returns the new balance and the refunded amount.
    pub fn refund(&self, balance: &CreditBalance) -> (CreditBalance, u32) {
        let refunded = balance.remaining;
        (
            CreditBalance {
                remaining: 0,
                ..*balance
            },
            refunded,
        )
    }

    /// Whether a recorded allocation is internally consistent and within budget.
    pub fn verify_allocation(&self, allocation: &VoteAllocation) -> bool {
        let sum: u64 = allocation.credits.iter().map(|&c| u64::from(c)).sum();
        allocation.credits.len() == allocation.votes.len()
            && sum == allocation.total_credits_used
            && sum <= u64::from(allocation.credits_allocated)
            && allocation
                .credits
                .iter()
                .zip(&allocation.votes)
                .all(|(&c, &v)| quadratic_cost(v) <= u64::from(c))
    }

    pub fn stats(&self, allocations: &[VoteAllocation]) -> QuadraticStats {
        if allocations.is_empty() {
            return QuadraticStats::default();
        }
        let total_allocated = allocations
            .iter()
            .map(|a| u64::from(a.credits_allocated))
            .sum();
        let total_used: u64 = allocations.iter().map(|a| a.total_credits_used).sum();
        QuadraticStats {
            total_allocated,
            total_used,
            average_per_voter: total_used / allocations.len() as u64,
        }
    }
}
