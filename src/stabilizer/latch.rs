/// 非対称ヒステリシスラッチ
///
/// ONには on_frames 回の連続検出、OFFには off_frames 回の連続非検出が必要。
/// 単発フレームのちらつきを吸収する最終段
pub struct GestureLatch {
    active: bool,
    on_frames: u32,
    off_frames: u32,
    active_streak: u32,
    inactive_streak: u32,
}

impl GestureLatch {
    pub fn new(on_frames: u32, off_frames: u32) -> Self {
        Self {
            active: false,
            on_frames: on_frames.max(1),
            off_frames: off_frames.max(1),
            active_streak: 0,
            inactive_streak: 0,
        }
    }

    pub fn update(&mut self, condition: bool) -> bool {
        if condition {
            self.active_streak += 1;
            self.inactive_streak = 0;
            if !self.active && self.active_streak >= self.on_frames {
                self.active = true;
            }
        } else {
            self.inactive_streak += 1;
            self.active_streak = 0;
            if self.active && self.inactive_streak >= self.off_frames {
                self.active = false;
            }
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn streaks(&self) -> (u32, u32) {
        (self.active_streak, self.inactive_streak)
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.active_streak = 0;
        self.inactive_streak = 0;
    }
}
