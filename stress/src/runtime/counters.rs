//! Trial counters
//!
//! Each runner owns one `RunCounters` value and is its only writer. The
//! driver sees copies: live snapshots over a watch channel and the final
//! value in the worker report. Aggregation is plain addition of copies.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Trials that completed, successfully or not
    pub runs: u64,
    /// Trials whose action body returned an error
    pub fails: u64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&mut self) {
        self.runs += 1;
    }

    pub fn record_failure(&mut self) {
        self.fails += 1;
    }

    pub fn successes(&self) -> u64 {
        self.runs.saturating_sub(self.fails)
    }
}

impl Add for RunCounters {
    type Output = RunCounters;

    fn add(self, other: RunCounters) -> RunCounters {
        RunCounters {
            runs: self.runs + other.runs,
            fails: self.fails + other.fails,
        }
    }
}

impl AddAssign for RunCounters {
    fn add_assign(&mut self, other: RunCounters) {
        *self = *self + other;
    }
}

impl std::iter::Sum for RunCounters {
    fn sum<I: Iterator<Item = RunCounters>>(iter: I) -> Self {
        iter.fold(RunCounters::default(), Add::add)
    }
}

impl std::fmt::Display for RunCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} runs ({} failed)", self.runs, self.fails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_successes() {
        let mut counters = RunCounters::new();
        counters.record_run();
        counters.record_failure();
        counters.record_run();
        counters.record_run();

        assert_eq!(counters, RunCounters { runs: 3, fails: 1 });
        assert_eq!(counters.successes(), 2);
        assert_eq!(counters.to_string(), "3 runs (1 failed)");
    }

    #[test]
    fn test_aggregation() {
        let workers = vec![
            RunCounters { runs: 4, fails: 0 },
            RunCounters { runs: 2, fails: 2 },
            RunCounters { runs: 1, fails: 1 },
        ];

        let total: RunCounters = workers.iter().copied().sum();
        assert_eq!(total, RunCounters { runs: 7, fails: 3 });

        let mut acc = RunCounters::default();
        acc += workers[0];
        acc += workers[1];
        assert_eq!(acc, RunCounters { runs: 6, fails: 2 });
    }
}
