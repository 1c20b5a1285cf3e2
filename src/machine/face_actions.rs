use crate::config::MachineConfig;
use crate::machine::scene::LabScene;
use crate::machine::GestureSet;

/// 表情による補助アクション
///
/// 主ステートとは独立に毎ティック評価する。デバウンス済みの
/// 真偽値の立ち上がりだけで発火するエッジトリガで、ラッチが
/// 落ちて再度立つまで同じアクションは繰り返さない
pub struct FaceActionDriver {
    config: MachineConfig,
    prev_smile: bool,
    prev_wink: bool,
    prev_frown: bool,
    last_assist_ms: Option<f64>,
}

impl FaceActionDriver {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            config,
            prev_smile: false,
            prev_wink: false,
            prev_frown: false,
            last_assist_ms: None,
        }
    }

    pub fn update<S: LabScene>(&mut self, set: &GestureSet, scene: &mut S) {
        let g = set.gestures;
        let now = set.timestamp_ms;

        if g.smile && !self.prev_smile {
            scene.evaluate(true);
        }
        if g.wink && !self.prev_wink {
            scene.toggle_switch();
        }
        if g.frown && !self.prev_frown {
            // ヒント要求は連発させない
            let allowed = match self.last_assist_ms {
                None => true,
                Some(last) => now - last >= self.config.assist_cooldown_ms,
            };
            if allowed {
                scene.request_assistance();
                self.last_assist_ms = Some(now);
            }
        }

        self.prev_smile = g.smile;
        self.prev_wink = g.wink;
        self.prev_frown = g.frown;
    }

    pub fn reset(&mut self) {
        self.prev_smile = false;
        self.prev_wink = false;
        self.prev_frown = false;
    }
}
