/// 座標範囲キャリブレーション
///
/// ウォームアップ中に観測した正規化座標の min/max を記録し、
/// 規定サンプル数で範囲を確定する。確定後は観測範囲を中点周りに
/// 少し広げた区間から [0,1] へ線形に写像する。腕の可動域が
/// 画面全体に届かない着座姿勢への対策
pub struct RangeCalibration {
    samples_needed: usize,
    overscale: f32,
    samples_seen: usize,
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    frozen: bool,
}

impl RangeCalibration {
    pub fn new(samples_needed: usize, overscale: f32) -> Self {
        Self {
            samples_needed: samples_needed.max(1),
            overscale: overscale.max(1.0),
            samples_seen: 0,
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
            frozen: false,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.frozen
    }

    /// ウォームアップ中は入力をそのまま返し、確定後は写像する
    pub fn map(&mut self, x: f32, y: f32) -> (f32, f32) {
        if !self.frozen {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
            self.samples_seen += 1;
            if self.samples_seen >= self.samples_needed {
                self.freeze();
            }
            return (x, y);
        }

        (
            Self::normalize(x, self.min_x, self.max_x),
            Self::normalize(y, self.min_y, self.max_y),
        )
    }

    fn freeze(&mut self) {
        // 範囲を中点周りに overscale 倍へ拡大してから確定する。
        // 端の取りこぼしで範囲が狭く確定するのを防ぐ
        let cx = (self.min_x + self.max_x) / 2.0;
        let cy = (self.min_y + self.max_y) / 2.0;
        let hx = (self.max_x - self.min_x) / 2.0 * self.overscale;
        let hy = (self.max_y - self.min_y) / 2.0 * self.overscale;
        self.min_x = cx - hx;
        self.max_x = cx + hx;
        self.min_y = cy - hy;
        self.max_y = cy + hy;
        self.frozen = true;
    }

    fn normalize(v: f32, min: f32, max: f32) -> f32 {
        let span = max - min;
        if span <= f32::EPSILON {
            return 0.5;
        }
        ((v - min) / span).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.samples_needed, self.overscale);
    }
}
