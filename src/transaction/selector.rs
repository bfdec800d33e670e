//! Coin selection over the wallet's spendable outputs.
//!
//! Candidates are visited in a uniformly shuffled order (Fisher–Yates via
//! [`SliceRandom::shuffle`]) so the same outputs are not always spent
//! first. Selection is first-fit over that order: not minimal-count and not
//! fee-optimal.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{WalletError, WalletResult};
use crate::transaction::amount::Amount;
use crate::transaction::types::{OutputTarget, SpendableOutput};

/// Inputs chosen to fund a transfer, with the resulting change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub inputs: Vec<SpendableOutput>,
    pub total: Amount,
    pub change: Amount,
}

impl Selection {
    /// Outputs for a transfer: change back to `owner` first (only when
    /// non-zero), then the destination credit.
    pub fn outputs(&self, owner: &str, destination: &str, amount: Amount) -> Vec<OutputTarget> {
        let mut outputs = Vec::with_capacity(2);
        if !self.change.is_zero() {
            outputs.push(OutputTarget {
                address: owner.to_string(),
                amount: self.change,
            });
        }
        outputs.push(OutputTarget {
            address: destination.to_string(),
            amount,
        });
        outputs
    }
}

/// Randomized UTXO selector.
pub struct CoinSelector<R = StdRng> {
    rng: R,
}

impl CoinSelector<StdRng> {
    /// Selector seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for CoinSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CoinSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// First output, in shuffled order, whose amount strictly exceeds `min_amount`.
    pub fn select_one(
        &mut self,
        mut candidates: Vec<SpendableOutput>,
        min_amount: Amount,
    ) -> WalletResult<SpendableOutput> {
        candidates.shuffle(&mut self.rng);

        let largest = candidates.iter().map(|c| c.amount).max().unwrap_or(Amount::ZERO);
        candidates
            .into_iter()
            .find(|c| c.amount > min_amount)
            .ok_or(WalletError::InsufficientFunds {
                required: min_amount,
                available: largest,
            })
    }

    /// Accumulate shuffled candidates until they cover `amount + fee`.
    pub fn select_many(
        &mut self,
        mut candidates: Vec<SpendableOutput>,
        amount: Amount,
        fee: Amount,
    ) -> WalletResult<Selection> {
        let required = amount
            .checked_add(fee)
            .ok_or_else(|| WalletError::Invariant("amount plus fee overflows".into()))?;

        candidates.shuffle(&mut self.rng);

        let mut inputs = Vec::new();
        let mut total = Amount::ZERO;
        for candidate in candidates {
            total = total
                .checked_add(candidate.amount)
                .ok_or_else(|| WalletError::Invariant("input total overflows".into()))?;
            inputs.push(candidate);
            if total >= required {
                break;
            }
        }

        if inputs.is_empty() || total < required {
            return Err(WalletError::InsufficientFunds {
                required,
                available: total,
            });
        }

        let change = total.checked_sub(required).ok_or_else(|| {
            WalletError::Invariant(format!(
                "selected {} does not cover required {}",
                total, required
            ))
        })?;

        Ok(Selection {
            inputs,
            total,
            change,
        })
    }
}
