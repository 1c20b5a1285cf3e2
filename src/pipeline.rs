use crate::config::Config;
use crate::face::FaceExtractor;
use crate::filter::{AngleFilter, Point, PointerFilter, RangeCalibration};
use crate::fusion::{FusedGestures, ScoreFusion};
use crate::geometry::{FeatureExtractor, GeometricSignals};
use crate::landmark::{Frame, HandLandmarkIndex};
use crate::machine::GestureSet;
use crate::stabilizer::{GestureStabilizer, StabilizedGestures, StabilizerDebug};

/// デバッグ表示用の内部状態スナップショット
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugSnapshot {
    pub timestamp_ms: Option<f64>,
    pub hand_present: bool,
    /// 融合直後・安定化前の瞬時値
    pub raw: FusedGestures,
    pub channels: StabilizerDebug,
    pub stabilized: StabilizedGestures,
    pub cursor: Option<Point>,
    pub angle_deg: Option<f32>,
}

/// ジェスチャーパイプライン本体
///
/// 1ティックにつき1フレームを消費し、抽出 → 融合 → 安定化 →
/// カーソル/角度フィルタ を直列に通して GestureSet を組み立てる。
/// 全状態はこの構造体が単独で所有し、process_frame 以外から
/// 変化することはない
pub struct GesturePipeline {
    config: Config,
    features: FeatureExtractor,
    face: FaceExtractor,
    fusion: ScoreFusion,
    stabilizer: GestureStabilizer,
    pointer: PointerFilter,
    angle: AngleFilter,
    calibration: Option<RangeCalibration>,
    last_timestamp_ms: Option<f64>,
    last_fused: FusedGestures,
    last_set: GestureSet,
}

impl GesturePipeline {
    pub fn new(config: Config) -> Self {
        let calibration = if config.calibration.enabled {
            Some(RangeCalibration::new(
                config.calibration.samples,
                config.calibration.overscale,
            ))
        } else {
            None
        };
        Self {
            features: FeatureExtractor::from_config(&config.geometry),
            face: FaceExtractor::from_config(&config.face),
            fusion: ScoreFusion::from_config(&config.fusion),
            stabilizer: GestureStabilizer::new(&config.stabilizer),
            pointer: PointerFilter::new(
                config.pointer.clone(),
                config.canvas.width,
                config.canvas.height,
            ),
            angle: AngleFilter::new(config.angle.clone()),
            calibration,
            last_timestamp_ms: None,
            last_fused: FusedGestures::default(),
            last_set: GestureSet::default(),
            config,
        }
    }

    /// 1フレーム処理する。同じメディアタイムスタンプの再入は
    /// 二重処理せず None を返す
    pub fn process_frame(&mut self, frame: &Frame) -> Option<GestureSet> {
        if self.last_timestamp_ms == Some(frame.timestamp_ms) {
            return None;
        }
        self.last_timestamp_ms = Some(frame.timestamp_ms);

        let (fused, signals, cursor, angle_deg) = match &frame.hand {
            Some(hand) => {
                let signals = self.features.extract(hand);
                let fused = self.fusion.fuse(&signals, hand);

                let tip = hand.get(HandLandmarkIndex::IndexTip);
                let cursor = if tip.is_finite() {
                    let (tx, ty) = match &mut self.calibration {
                        Some(cal) => cal.map(tip.x, tip.y),
                        None => (tip.x, tip.y),
                    };
                    self.pointer.update(tx, ty)
                } else {
                    self.pointer.position()
                };

                // ポインタ姿勢の角度が出ているときだけフィルタを進める
                let angle_deg = match signals.pointing_angle_deg {
                    Some(raw) => Some(self.angle.update(raw)),
                    None => self.angle.angle(),
                };

                (fused, signals, cursor, angle_deg)
            }
            None => {
                // 手のロスト: フィルタは未準備へ戻し、再捕捉時はスナップ
                self.pointer.reset();
                self.angle.reset();
                (
                    FusedGestures::default(),
                    GeometricSignals::default(),
                    None,
                    None,
                )
            }
        };

        let face_signals = frame
            .face
            .as_ref()
            .map(|face| self.face.extract(face))
            .unwrap_or_default();

        let stabilized = self.stabilizer.update(fused, face_signals);
        let hand_present = frame.hand.is_some();

        let set = GestureSet {
            timestamp_ms: frame.timestamp_ms,
            hand_present,
            gestures: stabilized,
            cursor,
            angle_deg,
            pinch_position: signals.is_pinch.then(|| self.to_canvas(signals.pinch_position)),
            pinch_distance: signals.is_pinch.then_some(signals.pinch_distance),
            index_distance: hand_present.then_some(signals.index_distance),
        };

        self.last_fused = fused;
        self.last_set = set;
        Some(set)
    }

    /// 正規化座標をミラーしてキャンバス座標へ
    fn to_canvas(&self, (x, y): (f32, f32)) -> Point {
        Point::new(
            (1.0 - x) * self.config.canvas.width,
            y * self.config.canvas.height,
        )
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            timestamp_ms: self.last_timestamp_ms,
            hand_present: self.last_set.hand_present,
            raw: self.last_fused,
            channels: self.stabilizer.debug(),
            stabilized: self.last_set.gestures,
            cursor: self.last_set.cursor,
            angle_deg: self.last_set.angle_deg,
        }
    }

    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.pointer.reset();
        self.angle.reset();
        if let Some(cal) = &mut self.calibration {
            cal.reset();
        }
        self.last_timestamp_ms = None;
        self.last_fused = FusedGestures::default();
        self.last_set = GestureSet::default();
    }
}
