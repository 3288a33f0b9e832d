//! Random walk statistics.
use serde::Serialize;
use std::cmp::max;
use std::ops::{Add, AddAssign};

/// Statistics about the random walks behind one (or several) samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// The number of loop-erased random walks started.
    pub walks: u64,
    /// The total number of random walk steps.
    pub steps: u64,
    /// Steps taken from a vertex already visited in the same walk.
    /// Each one overwrites a successor, erasing a loop.
    pub revisits: u64,
    /// The number of vertices added to trees by walks (roots excluded).
    pub committed: u64,
    /// The length of the longest loop-erased path added in one walk.
    pub longest_branch: u64,
}

impl Add for WalkStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        WalkStats {
            walks: self.walks + other.walks,
            steps: self.steps + other.steps,
            revisits: self.revisits + other.revisits,
            committed: self.committed + other.committed,
            longest_branch: max(self.longest_branch, other.longest_branch),
        }
    }
}

impl AddAssign for WalkStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl WalkStats {
    /// The fraction of steps that were later erased.
    pub fn erased_fraction(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        1.0 - (self.committed as f64 / self.steps as f64)
    }
}
