mod history;
mod latch;
mod smoother;

pub use history::GestureHistory;
pub use latch::GestureLatch;
pub use smoother::GestureSmoother;

use crate::config::{GestureParams, StabilizerConfig};
use crate::face::FaceSignals;
use crate::fusion::FusedGestures;

/// 安定化済みジェスチャー一式（ラッチ出力）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StabilizedGestures {
    pub open_hand: bool,
    pub fist: bool,
    pub pointer: bool,
    pub pinch: bool,
    pub wink: bool,
    pub smile: bool,
    pub frown: bool,
}

/// 1ジェスチャー分の安定化チェーン
///
/// 生検出 → 履歴の一致率 → EMA平滑化 → ヒステリシスラッチ の直列
struct Channel {
    history: GestureHistory,
    smoother: GestureSmoother,
    latch: GestureLatch,
    consistency: f32,
}

impl Channel {
    fn new(params: GestureParams) -> Self {
        Self {
            history: GestureHistory::new(),
            smoother: GestureSmoother::new(params.alpha),
            latch: GestureLatch::new(params.on_frames, params.off_frames),
            consistency: params.consistency,
        }
    }

    fn update(&mut self, detected: bool) -> bool {
        self.history.push(detected);
        let consistent = self.history.consistency() >= self.consistency;
        let smoothed = self.smoother.update(consistent);
        self.latch.update(smoothed)
    }

    fn reset(&mut self) {
        self.history.reset();
        self.smoother.reset();
        self.latch.reset();
    }

    fn debug(&self) -> ChannelDebug {
        ChannelDebug {
            consistency: self.history.consistency(),
            smoothed: self.smoother.value(),
            active: self.latch.is_active(),
        }
    }
}

/// デバッグ表示用のチャンネル内部値
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelDebug {
    pub consistency: f32,
    pub smoothed: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StabilizerDebug {
    pub open_hand: ChannelDebug,
    pub fist: ChannelDebug,
    pub pointer: ChannelDebug,
    pub pinch: ChannelDebug,
    pub wink: ChannelDebug,
    pub smile: ChannelDebug,
    pub frown: ChannelDebug,
}

/// 全ジェスチャーの安定化器
///
/// 手・顔が見えないフレームでも false を流し込んで更新する。
/// こうするとロスト中もラッチのOFFカウントが進み、復帰時に
/// 古い状態が残らない
pub struct GestureStabilizer {
    open_hand: Channel,
    fist: Channel,
    pointer: Channel,
    pinch: Channel,
    wink: Channel,
    smile: Channel,
    frown: Channel,
}

impl GestureStabilizer {
    pub fn new(config: &StabilizerConfig) -> Self {
        Self {
            open_hand: Channel::new(config.open_hand),
            fist: Channel::new(config.fist),
            pointer: Channel::new(config.pointer),
            pinch: Channel::new(config.pinch),
            wink: Channel::new(config.wink),
            smile: Channel::new(config.smile),
            frown: Channel::new(config.frown),
        }
    }

    /// 手信号は入力が無いフレームでは FusedGestures::default() を渡す
    pub fn update(&mut self, hand: FusedGestures, face: FaceSignals) -> StabilizedGestures {
        StabilizedGestures {
            open_hand: self.open_hand.update(hand.open_hand),
            fist: self.fist.update(hand.fist),
            pointer: self.pointer.update(hand.pointer),
            pinch: self.pinch.update(hand.pinch),
            wink: self.wink.update(face.wink),
            smile: self.smile.update(face.smile),
            frown: self.frown.update(face.frown),
        }
    }

    pub fn reset(&mut self) {
        self.open_hand.reset();
        self.fist.reset();
        self.pointer.reset();
        self.pinch.reset();
        self.wink.reset();
        self.smile.reset();
        self.frown.reset();
    }

    pub fn debug(&self) -> StabilizerDebug {
        StabilizerDebug {
            open_hand: self.open_hand.debug(),
            fist: self.fist.debug(),
            pointer: self.pointer.debug(),
            pinch: self.pinch.debug(),
            wink: self.wink.debug(),
            smile: self.smile.debug(),
            frown: self.frown.debug(),
        }
    }
}
