use crate::types::ZState;

/// Error raised by a scorer. Kept boxed so the search can hand it back untouched.
pub type ScoreError = Box<dyn std::error::Error + Send + Sync>;

/// Scores every state of a collection under a set of hyperparameters.
///
/// Implementations must return exactly one score per input state, in input
/// order, and must be deterministic. The enumerator never inspects `H`.
pub trait Scorer<H: ?Sized> {
    fn score(&self, states: &[ZState], hyperparameters: &H) -> Result<Vec<f64>, ScoreError>;
}

impl<H, F> Scorer<H> for F
where
    H: ?Sized,
    F: Fn(&[ZState], &H) -> Result<Vec<f64>, ScoreError>,
{
    fn score(&self, states: &[ZState], hyperparameters: &H) -> Result<Vec<f64>, ScoreError> {
        self(states, hyperparameters)
    }
}
