use crate::error::{Result, ZstatesError};
use crate::types::ZState;
use rayon::prelude::*;
use std::collections::HashSet;

/// Output of one expansion round
#[derive(Debug, Clone)]
pub struct Expansion {
    pub states: Vec<ZState>,
    pub considered: usize, // leader/item pairs tried
    pub duplicates: usize, // pairs whose state an earlier leader already produced
}

/// Grows a set of leaders of norm k into every distinct state of norm k + 1.
///
/// Two leaders yield a common candidate only when they share k - 1 items,
/// e.g. [2,4,5,8] comes from any of [2,4,5], [2,4,8], [2,5,8] or [4,5,8].
/// Candidates are produced leader by leader, each in increasing order of the
/// added item, and a candidate is kept the first time it shows up.
pub struct LevelExpander {
    n_items: usize,
    parallel: bool,
    capacity: Option<usize>,
}

impl LevelExpander {
    pub fn new(n_items: usize) -> Self {
        Self {
            n_items,
            parallel: false,
            capacity: None,
        }
    }

    /// Generate per-leader candidates on the rayon pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Refuse to build a level holding more than `capacity` states
    pub fn with_capacity_limit(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Upper bound on candidates before deduplication
    pub fn worst_case(&self, leaders: &[&ZState]) -> usize {
        leaders
            .iter()
            .map(|leader| self.n_items.saturating_sub(leader.norm()))
            .sum()
    }

    pub fn expand(&self, leaders: &[&ZState]) -> Result<Expansion> {
        let level = leaders.first().map_or(0, |leader| leader.norm() + 1);
        debug_assert!(leaders.iter().all(|leader| leader.norm() + 1 == level));

        let per_leader: Vec<Vec<ZState>> = if self.parallel {
            leaders
                .par_iter()
                .map(|leader| leader.extensions(self.n_items))
                .collect()
        } else {
            leaders
                .iter()
                .map(|leader| leader.extensions(self.n_items))
                .collect()
        };

        let worst_case = self.worst_case(leaders);
        let mut keep = Vec::with_capacity(worst_case);
        let mut considered = 0;
        let mut duplicates = 0;

        let mut seen: HashSet<&ZState> = HashSet::with_capacity(worst_case);
        for candidate in per_leader.iter().flatten() {
            considered += 1;
            if !seen.insert(candidate) {
                duplicates += 1;
                keep.push(false);
                continue;
            }
            if let Some(capacity) = self.capacity {
                if seen.len() > capacity {
                    return Err(ZstatesError::CapacityExceeded {
                        level,
                        capacity,
                        required: seen.len(),
                    });
                }
            }
            keep.push(true);
        }
        drop(seen);

        let states: Vec<ZState> = per_leader
            .into_iter()
            .flatten()
            .zip(keep)
            .filter_map(|(candidate, kept)| kept.then_some(candidate))
            .collect();

        Ok(Expansion {
            states,
            considered,
            duplicates,
        })
    }
}
