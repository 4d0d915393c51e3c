//! Per-run context: the seed and the issue date.
//!
//! The random generator is derived from the seed here and nowhere else.
//! Callers build it once per run with [`RunContext::rng`] and pass it down;
//! there is no process-wide generator.

use chrono::{Datelike, NaiveDate, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SEED: u64 = 42;

/// The generator every seeded stage draws from.
pub type PlanRng = ChaCha8Rng;

/// Calendar date stamped into title blocks. Serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueDate(NaiveDate);

impl IssueDate {
    /// `None` if the triple is not a real calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl From<NaiveDate> for IssueDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for IssueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Everything a run needs besides its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub seed: u64,
    pub issue_date: IssueDate,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl RunContext {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            issue_date: IssueDate::today(),
        }
    }

    /// Pin the issue date so the whole output is reproducible.
    pub fn dated(mut self, date: IssueDate) -> Self {
        self.issue_date = date;
        self
    }

    /// A fresh generator positioned at the start of this seed's sequence.
    pub fn rng(&self) -> PlanRng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}
