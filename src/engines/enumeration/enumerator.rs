use super::expansion::LevelExpander;
use super::progress::{NoProgress, SearchProgress};
use super::selection::select_leaders;
use crate::config::traits::ConfigSection;
use crate::config::SearchConfig;
use crate::engines::scoring::Scorer;
use crate::error::{Result, ZstatesError};
use crate::types::{Collection, Locus, ZState};
use serde::{Deserialize, Serialize};

/// Why a search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Covariate locus: one all-inclusive state, nothing scored
    Covariate,
    /// Reached `cmax`, or the universe has no items left to add
    MaxNorm,
    /// Mass of level `norm` fell below `1 - target` of the level before it
    MassCollapsed { norm: usize },
    /// No prefix of level `norm` crossed the selection threshold
    DegenerateScores { norm: usize },
}

/// Score mass of one scored level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelMass {
    pub norm: usize,
    pub size: usize,
    pub probsum: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub collection: Collection,
    pub stop_reason: StopReason,
    pub level_mass: Vec<LevelMass>,
    pub scorer_calls: usize,
}

impl SearchOutcome {
    pub fn into_states(self) -> Vec<ZState> {
        self.collection.into_states()
    }
}

/// Values carried from one level to the next
struct LoopState {
    norm: usize,
    scores: Vec<f64>, // Scores of the newest level only
    probsum: f64,
    old_probsum: f64,
}

impl LoopState {
    /// `all_scores` covers levels 0 and 1; the empty state is the first baseline
    fn initial(all_scores: Vec<f64>, level_len: usize) -> Self {
        let old_probsum = all_scores.first().copied().unwrap_or(0.0);
        let scores = newest(all_scores, level_len);
        Self {
            norm: 1,
            probsum: scores.iter().sum(),
            scores,
            old_probsum,
        }
    }

    fn advance(self, all_scores: Vec<f64>, level_len: usize) -> Self {
        let scores = newest(all_scores, level_len);
        Self {
            norm: self.norm + 1,
            probsum: scores.iter().sum(),
            scores,
            old_probsum: self.probsum,
        }
    }

    fn mass_collapsed(&self, target: f64) -> bool {
        self.probsum < (1.0 - target) * self.old_probsum
    }
}

fn newest(mut all_scores: Vec<f64>, level_len: usize) -> Vec<f64> {
    let start = all_scores.len() - level_len;
    all_scores.split_off(start)
}

/// Branch-and-bound search over causal configurations of a locus.
///
/// Levels are built in increasing norm. After each level is scored, the
/// states holding `target` of its score mass become leaders and are grown
/// into the next level. The search stops at `cmax`, when a level's mass
/// collapses relative to the previous one, or when scores degenerate to zero.
pub struct Enumerator<S> {
    config: SearchConfig,
    scorer: S,
}

impl<S> Enumerator<S> {
    pub fn new(config: SearchConfig, scorer: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, scorer })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn run<H>(&self, locus: &Locus, hyperparameters: &H) -> Result<SearchOutcome>
    where
        H: ?Sized,
        S: Scorer<H>,
    {
        self.run_with_progress(locus, hyperparameters, &mut NoProgress)
    }

    pub fn run_with_progress<H, P>(
        &self,
        locus: &Locus,
        hyperparameters: &H,
        progress: &mut P,
    ) -> Result<SearchOutcome>
    where
        H: ?Sized,
        S: Scorer<H>,
        P: SearchProgress,
    {
        let n_items = locus.n_items;

        if locus.is_covariate {
            let mut collection = Collection::new();
            collection.push_level(vec![ZState::all(n_items)]);
            return Ok(finish(collection, StopReason::Covariate, Vec::new(), 0, progress));
        }

        // Initialize for norm 0 and 1
        let mut collection = Collection::new();
        collection.push_level(vec![ZState::empty()]);
        collection.push_level((0..n_items).map(ZState::singleton).collect());

        let mut scorer_calls = 0;
        let mut level_mass = Vec::new();

        if self.config.cmax == 1 {
            return Ok(finish(collection, StopReason::MaxNorm, level_mass, 0, progress));
        }

        let scores = self.score(&collection, hyperparameters, 1, &mut scorer_calls)?;
        let mut state = LoopState::initial(scores, n_items);
        level_mass.push(LevelMass {
            norm: 1,
            size: n_items,
            probsum: state.probsum,
        });
        progress.on_level_scored(1, n_items, state.probsum);

        let target = self.config.target;
        let expander = LevelExpander::new(n_items)
            .parallel(self.config.parallel_expansion)
            .with_capacity_limit(self.config.max_level_size);

        let stop_reason = loop {
            if state.norm >= self.config.cmax || state.norm >= n_items {
                break StopReason::MaxNorm;
            }
            if state.mass_collapsed(target) {
                break StopReason::MassCollapsed { norm: state.norm };
            }

            let norm = state.norm + 1;
            let level = collection.last_level();
            let Some(selected) = select_leaders(level, &state.scores, state.probsum, target) else {
                log::warn!(
                    "No state of level {} crosses {} of probsum {:e}; stopping",
                    state.norm, target, state.probsum
                );
                break StopReason::DegenerateScores { norm: state.norm };
            };

            let leaders: Vec<&ZState> = selected.iter().map(|&i| &level[i]).collect();
            progress.on_level_start(norm, leaders.len());

            let expansion = expander.expand(&leaders)?;
            log::debug!(
                "Level {}: {} leaders, {} pairs, {} duplicates, {} states",
                norm,
                leaders.len(),
                expansion.considered,
                expansion.duplicates,
                expansion.states.len()
            );

            let size = expansion.states.len();
            collection.push_level(expansion.states);

            let scores = self.score(&collection, hyperparameters, norm, &mut scorer_calls)?;
            state = state.advance(scores, size);
            level_mass.push(LevelMass {
                norm,
                size,
                probsum: state.probsum,
            });
            log::debug!(
                "Level {} probsum {:e} (previous {:e})",
                norm, state.probsum, state.old_probsum
            );
            progress.on_level_scored(norm, size, state.probsum);
        };

        Ok(finish(collection, stop_reason, level_mass, scorer_calls, progress))
    }

    /// Score the whole collection, `level` being the newest level in it
    fn score<H>(
        &self,
        collection: &Collection,
        hyperparameters: &H,
        level: usize,
        scorer_calls: &mut usize,
    ) -> Result<Vec<f64>>
    where
        H: ?Sized,
        S: Scorer<H>,
    {
        *scorer_calls += 1;
        let scores = self
            .scorer
            .score(collection.states(), hyperparameters)
            .map_err(|source| ZstatesError::Scoring { level, source })?;

        if scores.len() != collection.len() {
            return Err(ZstatesError::ScoreCount {
                level,
                expected: collection.len(),
                actual: scores.len(),
            });
        }
        Ok(scores)
    }
}

fn finish<P: SearchProgress>(
    collection: Collection,
    stop_reason: StopReason,
    level_mass: Vec<LevelMass>,
    scorer_calls: usize,
    progress: &mut P,
) -> SearchOutcome {
    log::info!(
        "Search stopped ({:?}): {} states over {} levels",
        stop_reason,
        collection.len(),
        collection.num_levels()
    );
    progress.on_search_complete(stop_reason, collection.len());
    SearchOutcome {
        collection,
        stop_reason,
        level_mass,
        scorer_calls,
    }
}
