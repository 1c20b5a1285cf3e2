use std::collections::VecDeque;

/// 生検出結果の有界FIFO (容量10) と直近窓 (5) の一致率
pub struct GestureHistory {
    entries: VecDeque<bool>,
    capacity: usize,
    window: usize,
}

impl GestureHistory {
    pub const DEFAULT_CAPACITY: usize = 10;
    pub const DEFAULT_WINDOW: usize = 5;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY, Self::DEFAULT_WINDOW)
    }

    pub fn with_capacity(capacity: usize, window: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            window: window.max(1),
        }
    }

    pub fn push(&mut self, detected: bool) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(detected);
    }

    /// 直近 window 件に占める検出の割合。履歴が空なら 0
    pub fn consistency(&self) -> f32 {
        let len = self.entries.len().min(self.window);
        if len == 0 {
            return 0.0;
        }
        let positives = self
            .entries
            .iter()
            .rev()
            .take(len)
            .filter(|&&d| d)
            .count();
        positives as f32 / len as f32
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl Default for GestureHistory {
    fn default() -> Self {
        Self::new()
    }
}
