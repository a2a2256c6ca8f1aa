use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Unique drop identifier (row id in the authoritative store).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DropId(pub String);

/// A group-buy drop: a funding target and the running total committed so far.
///
/// `raised` may briefly exceed `target` in data written by older clients;
/// display math clamps instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drop {
    pub id: DropId,
    pub slug: String,
    pub title: String,
    /// Funding goal in minor units.
    pub target: u64,
    /// Cumulative committed total in minor units.
    pub raised: u64,
    #[serde(default)]
    pub closes_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub currency: Currency,
}

/// Result of committing a join against a drop's running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    /// Portion of the requested amount actually added (clamped at the target).
    pub accepted: u64,
    pub new_raised: u64,
    /// True once the total has reached the target.
    pub funded: bool,
}

impl Drop {
    /// Percentage of the target raised, clamped to 0..=100.
    pub fn percent(&self) -> u8 {
        percent(self.raised, self.target)
    }

    /// Amount still needed to reach the target, floored at zero.
    pub fn remaining(&self) -> u64 {
        remaining(self.raised, self.target)
    }

    pub fn is_funded(&self) -> bool {
        self.raised >= self.target
    }

    /// The increment-with-clamp every join goes through, server-side and in
    /// the demo flow alike: `new_raised = min(raised + amount, target)`.
    ///
    /// A zero amount or an already-funded drop is a no-op, not an error.
    pub fn apply_join(&mut self, amount: u64) -> JoinOutcome {
        if amount == 0 || self.is_funded() {
            return JoinOutcome {
                accepted: 0,
                new_raised: self.raised,
                funded: self.is_funded(),
            };
        }
        let new_raised = self.raised.saturating_add(amount).min(self.target);
        let accepted = new_raised - self.raised;
        self.raised = new_raised;
        JoinOutcome {
            accepted,
            new_raised,
            funded: self.is_funded(),
        }
    }
}

/// `clamp(round(raised / target * 100), 0, 100)`, in integer arithmetic
/// (round half-up). Total: returns 0 when `target` is 0.
pub fn percent(raised: u64, target: u64) -> u8 {
    if target == 0 {
        return 0;
    }
    if raised >= target {
        return 100;
    }
    let target = target as u128;
    (((raised as u128) * 100 + target / 2) / target) as u8
}

/// `max(target - raised, 0)`.
pub fn remaining(raised: u64, target: u64) -> u64 {
    target.saturating_sub(raised)
}
