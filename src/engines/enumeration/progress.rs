use super::enumerator::StopReason;

pub trait SearchProgress {
    fn on_level_start(&mut self, norm: usize, leaders: usize);
    fn on_level_scored(&mut self, norm: usize, size: usize, probsum: f64);
    fn on_search_complete(&mut self, reason: StopReason, total_states: usize);
}

/// Ignores every event
pub struct NoProgress;

impl SearchProgress for NoProgress {
    fn on_level_start(&mut self, _norm: usize, _leaders: usize) {}

    fn on_level_scored(&mut self, _norm: usize, _size: usize, _probsum: f64) {}

    fn on_search_complete(&mut self, _reason: StopReason, _total_states: usize) {}
}

pub struct LogProgress;

impl SearchProgress for LogProgress {
    fn on_level_start(&mut self, norm: usize, leaders: usize) {
        log::info!("Level {} starting from {} leaders", norm, leaders);
    }

    fn on_level_scored(&mut self, norm: usize, size: usize, probsum: f64) {
        log::info!(
            "Level {} scored: {} states, probsum {:.6e}",
            norm, size, probsum
        );
    }

    fn on_search_complete(&mut self, reason: StopReason, total_states: usize) {
        log::info!("Search finished ({:?}) with {} states", reason, total_states);
    }
}

// For reporting to another thread
pub struct ChannelProgress {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    LevelStart { norm: usize, leaders: usize },
    LevelScored { norm: usize, size: usize, probsum: f64 },
    Complete { reason: StopReason, total_states: usize },
}

impl ChannelProgress {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl SearchProgress for ChannelProgress {
    fn on_level_start(&mut self, norm: usize, leaders: usize) {
        let _ = self.sender.send(ProgressMessage::LevelStart { norm, leaders });
    }

    fn on_level_scored(&mut self, norm: usize, size: usize, probsum: f64) {
        let _ = self.sender.send(ProgressMessage::LevelScored {
            norm,
            size,
            probsum,
        });
    }

    fn on_search_complete(&mut self, reason: StopReason, total_states: usize) {
        let _ = self.sender.send(ProgressMessage::Complete {
            reason,
            total_states,
        });
    }
}
