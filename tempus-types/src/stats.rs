use serde::{Deserialize, Serialize};

/// Store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of attribute names ever written
    pub key_count: usize,
    /// Number of stored time windows across all timelines
    pub window_count: usize,
    /// Number of windows with no known end
    pub open_window_count: usize,
    /// Number of attribute names whose timeline holds no window
    pub empty_timelines: usize,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one timeline with `windows` entries, `open` of them unbounded.
    pub fn record_timeline(&mut self, windows: usize, open: usize) {
        self.key_count += 1;
        self.window_count += windows;
        self.open_window_count += open;
        if windows == 0 {
            self.empty_timelines += 1;
        }
    }
}
