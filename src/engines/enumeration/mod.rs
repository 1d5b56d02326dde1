pub mod enumerator;
pub mod expansion;
pub mod progress;
pub mod selection;

pub use enumerator::{Enumerator, LevelMass, SearchOutcome, StopReason};
pub use expansion::{Expansion, LevelExpander};
pub use progress::{ChannelProgress, LogProgress, NoProgress, ProgressMessage, SearchProgress};
pub use selection::select_leaders;
