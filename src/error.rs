use thiserror::Error;

use crate::engines::scoring::ScoreError;

#[derive(Error, Debug)]
pub enum ZstatesError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Scoring failed at level {level}: {source}")]
    Scoring {
        level: usize,
        #[source]
        source: ScoreError,
    },

    #[error("Scorer returned {actual} scores for {expected} states at level {level}")]
    ScoreCount {
        level: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Level {level} needs more than {capacity} states (at least {required})")]
    CapacityExceeded {
        level: usize,
        capacity: usize,
        required: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ZstatesError>;
