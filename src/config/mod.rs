pub mod traits;
pub mod search;
pub mod hyperparameters;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use search::SearchConfig;
pub use hyperparameters::Hyperparameters;
