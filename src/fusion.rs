use crate::config::FusionConfig;
use crate::geometry::GeometricSignals;
use crate::landmark::HandFrame;

// 外部分類器のカテゴリ名
const OPEN_CATEGORIES: [&str; 1] = ["Open_Palm"];
const FIST_CATEGORIES: [&str; 1] = ["Closed_Fist"];
const POINTER_CATEGORIES: [&str; 1] = ["Pointing_Up"];

/// 1フレーム分の融合済み瞬時ジェスチャー
/// 優先順位 pinch > fist > openHand > pointer を適用済み
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FusedGestures {
    pub pinch: bool,
    pub fist: bool,
    pub open_hand: bool,
    pub pointer: bool,
}

/// 幾何判定と分類器スコアの融合
///
/// 判定は次の論理和:
/// - 幾何テスト成立 かつ 分類器スコアが低い裏付け閾値以上
///   （カテゴリ不在 = None の場合は幾何のみで成立）
/// - 分類器スコア単独で高い閾値以上
///
/// これにより弱い分類器を幾何が補い、逆もまた成立する
pub struct ScoreFusion {
    config: FusionConfig,
}

impl ScoreFusion {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &FusionConfig) -> Self {
        Self::new(config.clone())
    }

    pub fn fuse(&self, signals: &GeometricSignals, hand: &HandFrame) -> FusedGestures {
        let open_score = hand.score_for(&OPEN_CATEGORIES);
        let fist_score = hand.score_for(&FIST_CATEGORIES);
        let pointer_score = hand.score_for(&POINTER_CATEGORIES);

        // ピンチには分類器カテゴリがないため幾何のみ
        let pinch = signals.is_pinch;
        let fist = self.accept(signals.is_fist, fist_score, self.config.solo_score);
        let open_hand = self.accept(signals.is_open_hand, open_score, self.config.solo_score);
        // pointer は fist スコアが高いと棄却（握りかけの拳の誤検出対策）
        let pointer = self.accept(
            signals.is_pointer(),
            pointer_score,
            self.config.pointer_solo_score,
        ) && fist_score.map_or(true, |s| s < self.config.pointer_fist_veto);

        // 優先順位の適用: 上位が立ったら下位は落とす
        if pinch {
            FusedGestures {
                pinch: true,
                ..Default::default()
            }
        } else if fist {
            FusedGestures {
                fist: true,
                ..Default::default()
            }
        } else if open_hand {
            FusedGestures {
                open_hand: true,
                ..Default::default()
            }
        } else {
            FusedGestures {
                pointer,
                ..Default::default()
            }
        }
    }

    fn accept(&self, geometric: bool, score: Option<f32>, solo_threshold: f32) -> bool {
        let corroborated =
            geometric && score.map_or(true, |s| s >= self.config.corroborating_score);
        let solo = score.map_or(false, |s| s >= solo_threshold);
        corroborated || solo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{CategoryScore, HandLandmarkIndex, Landmark};

    fn empty_hand() -> HandFrame {
        HandFrame::new([Landmark::default(); HandLandmarkIndex::COUNT])
    }

    fn hand_with_scores(scores: &[(&str, f32)]) -> HandFrame {
        let mut hand = empty_hand();
        hand.categories = scores
            .iter()
            .map(|(name, score)| CategoryScore::new(*name, *score))
            .collect();
        hand
    }

    fn fusion() -> ScoreFusion {
        ScoreFusion::new(FusionConfig::default())
    }

    #[test]
    fn test_classifier_alone_above_solo_threshold() {
        let hand = hand_with_scores(&[("Closed_Fist", 0.7)]);
        let signals = GeometricSignals::default();
        let fused = fusion().fuse(&signals, &hand);
        assert!(fused.fist);
    }

    #[test]
    fn test_classifier_alone_below_solo_threshold() {
        let hand = hand_with_scores(&[("Closed_Fist", 0.4)]);
        let signals = GeometricSignals::default();
        let fused = fusion().fuse(&signals, &hand);
        assert!(!fused.fist);
    }

    #[test]
    fn test_geometry_with_corroborating_score() {
        let hand = hand_with_scores(&[("Closed_Fist", 0.2)]);
        let signals = GeometricSignals {
            is_fist: true,
            ..Default::default()
        };
        let fused = fusion().fuse(&signals, &hand);
        assert!(fused.fist);
    }

    #[test]
    fn test_geometry_rejected_by_contradicting_score() {
        // 幾何は成立だが分類器が強く否定（裏付け閾値未満）
        let hand = hand_with_scores(&[("Closed_Fist", 0.05)]);
        let signals = GeometricSignals {
            is_fist: true,
            ..Default::default()
        };
        let fused = fusion().fuse(&signals, &hand);
        assert!(!fused.fist);
    }

    #[test]
    fn test_geometry_alone_when_category_absent() {
        // カテゴリ不在（None）はスコア0とは違い、幾何のみで成立する
        let hand = empty_hand();
        let signals = GeometricSignals {
            is_fist: true,
            ..Default::default()
        };
        let fused = fusion().fuse(&signals, &hand);
        assert!(fused.fist);
    }

    #[test]
    fn test_pinch_priority_over_fist() {
        let hand = hand_with_scores(&[("Closed_Fist", 0.9)]);
        let signals = GeometricSignals {
            is_pinch: true,
            is_fist: true,
            ..Default::default()
        };
        let fused = fusion().fuse(&signals, &hand);
        assert!(fused.pinch);
        assert!(!fused.fist);
        assert!(!fused.open_hand);
        assert!(!fused.pointer);
    }

    #[test]
    fn test_fist_priority_over_open_hand() {
        let hand = hand_with_scores(&[("Closed_Fist", 0.6), ("Open_Palm", 0.6)]);
        let signals = GeometricSignals::default();
        let fused = fusion().fuse(&signals, &hand);
        assert!(fused.fist);
        assert!(!fused.open_hand);
    }

    #[test]
    fn test_pointer_vetoed_by_fist_score() {
        let hand = hand_with_scores(&[("Pointing_Up", 0.6), ("Closed_Fist", 0.45)]);
        let signals = GeometricSignals::default();
        let fused = fusion().fuse(&signals, &hand);
        // fist 単独閾値には届かないが、pointer は棄却される
        assert!(!fused.pointer);
        assert!(!fused.fist);
    }

    #[test]
    fn test_pointer_accepted_with_low_fist_score() {
        let hand = hand_with_scores(&[("Pointing_Up", 0.5), ("Closed_Fist", 0.1)]);
        let signals = GeometricSignals::default();
        let fused = fusion().fuse(&signals, &hand);
        assert!(fused.pointer);
    }
}
