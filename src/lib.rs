pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use crate::config::{AppConfig, ConfigManager, Hyperparameters, SearchConfig};
pub use crate::engines::enumeration::{Enumerator, SearchOutcome, StopReason};
pub use crate::engines::scoring::{ScoreError, Scorer};
pub use crate::error::{Result, ZstatesError};
pub use crate::types::{Collection, Item, Locus, ZState};
