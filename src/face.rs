use crate::config::FaceConfig;
use crate::landmark::FaceFrame;

// MediaPipe FaceLandmarker の関連インデックス
const LEFT_EYE_TOP: usize = 159;
const LEFT_EYE_BOTTOM: usize = 145;
const RIGHT_EYE_TOP: usize = 386;
const RIGHT_EYE_BOTTOM: usize = 374;
const MOUTH_LEFT: usize = 61;
const MOUTH_RIGHT: usize = 291;
const MOUTH_TOP: usize = 13;
const MOUTH_BOTTOM: usize = 14;
const LEFT_BROW: usize = 70;
const RIGHT_BROW: usize = 105;

/// 1フレーム分の表情信号
/// 必要なランドマークが欠けた表情は false に縮退
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceSignals {
    pub wink: bool,
    pub smile: bool,
    pub frown: bool,
}

/// 顔ランドマークから表情信号を導出
pub struct FaceExtractor {
    config: FaceConfig,
}

impl FaceExtractor {
    pub fn new(config: FaceConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &FaceConfig) -> Self {
        Self::new(config.clone())
    }

    pub fn extract(&self, face: &FaceFrame) -> FaceSignals {
        FaceSignals {
            wink: self.detect_wink(face),
            smile: self.detect_smile(face),
            frown: self.detect_frown(face),
        }
    }

    /// ウィンク: 片目だけが大きく閉じている（両目閉じは除外）
    fn detect_wink(&self, face: &FaceFrame) -> bool {
        let (Some(lt), Some(lb), Some(rt), Some(rb)) = (
            face.get(LEFT_EYE_TOP),
            face.get(LEFT_EYE_BOTTOM),
            face.get(RIGHT_EYE_TOP),
            face.get(RIGHT_EYE_BOTTOM),
        ) else {
            return false;
        };

        let left_gap = (lt.y - lb.y).abs();
        let right_gap = (rt.y - rb.y).abs();
        let max_gap = left_gap.max(right_gap);
        if max_gap <= 0.0 {
            return false;
        }
        let ratio = left_gap.min(right_gap) / max_gap;

        let both_open = left_gap > self.config.eye_open_min && right_gap > self.config.eye_open_min;
        ratio < self.config.wink_ratio && both_open
    }

    /// 笑顔: 口が横に広く、わずかに開いている
    fn detect_smile(&self, face: &FaceFrame) -> bool {
        let (Some(ml), Some(mr), Some(mt), Some(mb)) = (
            face.get(MOUTH_LEFT),
            face.get(MOUTH_RIGHT),
            face.get(MOUTH_TOP),
            face.get(MOUTH_BOTTOM),
        ) else {
            return false;
        };

        let wide = (ml.x - mr.x).abs();
        let tall = (mt.y - mb.y).abs();
        let open = tall > self.config.mouth_open_min;
        wide / tall.max(0.001) > self.config.smile_aspect && open
    }

    /// しかめ面: 眉が水平に寄り、かつ眉が目の上に正しく見えている
    fn detect_frown(&self, face: &FaceFrame) -> bool {
        let (Some(lb), Some(rb), Some(le), Some(re)) = (
            face.get(LEFT_BROW),
            face.get(RIGHT_BROW),
            face.get(LEFT_EYE_TOP),
            face.get(RIGHT_EYE_TOP),
        ) else {
            return false;
        };

        let brow_gap = (lb.y - rb.y).abs();
        let brow_height = ((lb.y - le.y).abs() + (rb.y - re.y).abs()) / 2.0;
        brow_gap < self.config.frown_brow_gap && brow_height > self.config.brow_height_min
    }
}
