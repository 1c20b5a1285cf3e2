use crate::config::GeometryConfig;
use crate::landmark::{HandFrame, HandLandmarkIndex, Landmark};

/// 1フレーム分の幾何導出値
/// 毎フレームゼロから再計算する。状態は持たない
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricSignals {
    pub index_extended: bool,
    pub others_retracted: bool,
    pub thumb_ok: bool,
    pub index_straight: bool,
    pub is_pinch: bool,
    pub is_fist: bool,
    pub is_open_hand: bool,
    /// 手首→人差し指先の角度（度）。指先か手首が無効なら None
    pub pointing_angle_deg: Option<f32>,
    /// 親指先と人差し指先の中点（正規化座標）
    pub pinch_position: (f32, f32),
    /// 親指先と人差し指先の距離（正規化座標）
    pub pinch_distance: f32,
    /// 手首→人差し指先の距離（正規化座標）
    pub index_distance: f32,
}

impl GeometricSignals {
    /// ポインタ姿勢: 人差し指だけが真っ直ぐ伸びている
    pub fn is_pointer(&self) -> bool {
        self.index_extended && self.others_retracted && self.thumb_ok && self.index_straight
    }
}

/// 各指の (指先, 近位関節) ペア
/// 親指はIP関節、他の指はPIP関節を近位とする
const DIGITS: [(HandLandmarkIndex, HandLandmarkIndex); 5] = [
    (HandLandmarkIndex::ThumbTip, HandLandmarkIndex::ThumbIp),
    (HandLandmarkIndex::IndexTip, HandLandmarkIndex::IndexPip),
    (HandLandmarkIndex::MiddleTip, HandLandmarkIndex::MiddlePip),
    (HandLandmarkIndex::RingTip, HandLandmarkIndex::RingPip),
    (HandLandmarkIndex::PinkyTip, HandLandmarkIndex::PinkyPip),
];

/// ランドマーク集合から幾何ジェスチャー信号を導出する純粋関数群
/// 無効な点（非有限座標）は該当する信号だけを否定側デフォルトに縮退させ、
/// フレーム全体は失敗させない
pub struct FeatureExtractor {
    config: GeometryConfig,
}

impl FeatureExtractor {
    pub fn new(config: GeometryConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &GeometryConfig) -> Self {
        Self::new(config.clone())
    }

    pub fn extract(&self, hand: &HandFrame) -> GeometricSignals {
        let wrist = hand.get(HandLandmarkIndex::Wrist);
        if !wrist.is_finite() {
            // 手首なしでは距離基準が成立しない
            return GeometricSignals::default();
        }

        let mut signals = GeometricSignals::default();

        // 指ごとの開閉カウント
        let mut closed_count = 0;
        let mut open_count = 0;
        for (tip_idx, prox_idx) in DIGITS {
            let tip = hand.get(tip_idx);
            let prox = hand.get(prox_idx);
            if !tip.is_finite() || !prox.is_finite() {
                continue;
            }
            let tip_dist = tip.distance(wrist);
            let prox_dist = prox.distance(wrist);
            if tip_dist < prox_dist * self.config.retracted_ratio {
                closed_count += 1;
            }
            if tip_dist > prox_dist * self.config.open_ratio {
                open_count += 1;
            }
        }
        signals.is_fist = closed_count >= 4;

        signals.is_pinch = self.detect_pinch(hand, wrist, &mut signals);

        // openHand: 4本以上開いていて、閉じは1本以下、かつピンチではない
        signals.is_open_hand = open_count >= 4 && closed_count <= 1 && !signals.is_pinch;

        self.detect_pointer(hand, wrist, &mut signals);

        signals
    }

    /// ピンチ: 親指先と人差し指先が適応閾値より近く、かつ互いに向き合っている
    /// 向き合い条件（指方向と指先間ベクトルの内積が両方正）は
    /// 偶然の重なりを棄却するために必須
    fn detect_pinch(
        &self,
        hand: &HandFrame,
        wrist: &Landmark,
        signals: &mut GeometricSignals,
    ) -> bool {
        let thumb_tip = hand.get(HandLandmarkIndex::ThumbTip);
        let thumb_ip = hand.get(HandLandmarkIndex::ThumbIp);
        let index_tip = hand.get(HandLandmarkIndex::IndexTip);
        let index_pip = hand.get(HandLandmarkIndex::IndexPip);
        if !thumb_tip.is_finite()
            || !thumb_ip.is_finite()
            || !index_tip.is_finite()
            || !index_pip.is_finite()
        {
            return false;
        }

        let distance = thumb_tip.distance(index_tip);
        signals.pinch_distance = distance;
        signals.pinch_position = (
            (thumb_tip.x + index_tip.x) / 2.0,
            (thumb_tip.y + index_tip.y) / 2.0,
        );

        // 手のサイズに適応する閾値（固定下限つき）
        let hand_size = thumb_tip.distance(wrist).max(index_tip.distance(wrist));
        let threshold = self
            .config
            .pinch_floor
            .max(self.config.pinch_fraction * hand_size);
        if distance >= threshold {
            return false;
        }

        let thumb_dir = (thumb_tip.x - thumb_ip.x, thumb_tip.y - thumb_ip.y);
        let index_dir = (index_tip.x - index_pip.x, index_tip.y - index_pip.y);
        let tip_to_tip = (index_tip.x - thumb_tip.x, index_tip.y - thumb_tip.y);

        let thumb_toward = dot(thumb_dir, tip_to_tip) > 0.0;
        let index_toward = dot(index_dir, (-tip_to_tip.0, -tip_to_tip.1)) > 0.0;
        thumb_toward && index_toward
    }

    fn detect_pointer(&self, hand: &HandFrame, wrist: &Landmark, signals: &mut GeometricSignals) {
        let index_tip = hand.get(HandLandmarkIndex::IndexTip);
        let index_pip = hand.get(HandLandmarkIndex::IndexPip);
        let index_mcp = hand.get(HandLandmarkIndex::IndexMcp);

        if index_tip.is_finite() && index_pip.is_finite() {
            let tip_dist = index_tip.distance(wrist);
            signals.index_distance = tip_dist;
            signals.index_extended =
                tip_dist > index_pip.distance(wrist) * self.config.extended_ratio;
        }

        // 中指・薬指・小指がすべて曲がっているか
        signals.others_retracted = DIGITS[2..].iter().all(|(tip_idx, prox_idx)| {
            let tip = hand.get(*tip_idx);
            let prox = hand.get(*prox_idx);
            tip.is_finite()
                && prox.is_finite()
                && tip.distance(wrist) < prox.distance(wrist) * self.config.retracted_ratio
        });

        // 親指が強く突き出ていないこと
        let thumb_tip = hand.get(HandLandmarkIndex::ThumbTip);
        let thumb_ip = hand.get(HandLandmarkIndex::ThumbIp);
        if thumb_tip.is_finite() && thumb_ip.is_finite() {
            signals.thumb_ok = thumb_tip.distance(wrist)
                < thumb_ip.distance(wrist) * self.config.thumb_extended_ratio;
        }

        // 人差し指の直線性: tip-PIP と PIP-MCP の方向一致
        if index_tip.is_finite() && index_pip.is_finite() && index_mcp.is_finite() {
            let upper = (index_tip.x - index_pip.x, index_tip.y - index_pip.y);
            let lower = (index_pip.x - index_mcp.x, index_pip.y - index_mcp.y);
            let len = norm(upper) * norm(lower);
            if len > 1e-6 {
                signals.index_straight = dot(upper, lower) / len >= self.config.straight_min_cos;
            }
        }

        if index_tip.is_finite() {
            let angle = f32::atan2(index_tip.y - wrist.y, index_tip.x - wrist.x).to_degrees();
            signals.pointing_angle_deg = Some(angle);
        }
    }
}

fn dot(a: (f32, f32), b: (f32, f32)) -> f32 {
    a.0 * b.0 + a.1 * b.1
}

fn norm(a: (f32, f32)) -> f32 {
    (a.0 * a.0 + a.1 * a.1).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    const WRIST: (f32, f32) = (0.5, 0.9);

    /// 指定方向に関節を並べた手を作る
    /// radii: 各指の関節半径 [付け根..指先]
    fn build_hand(digit_dirs: [(f32, f32); 5], digit_radii: [[f32; 4]; 5]) -> HandFrame {
        let mut lms = [Landmark::default(); HandLandmarkIndex::COUNT];
        lms[0] = Landmark::new(WRIST.0, WRIST.1);
        for digit in 0..5 {
            let (dx, dy) = digit_dirs[digit];
            for joint in 0..4 {
                let r = digit_radii[digit][joint];
                lms[1 + digit * 4 + joint] = Landmark::new(WRIST.0 + dx * r, WRIST.1 + dy * r);
            }
        }
        HandFrame::new(lms)
    }

    const SPREAD_DIRS: [(f32, f32); 5] = [
        (-0.8, -0.6),
        (-0.4, -0.9),
        (0.0, -1.0),
        (0.4, -0.9),
        (0.8, -0.6),
    ];

    fn spread_hand() -> HandFrame {
        // 全指が真っ直ぐ伸びた手
        build_hand(SPREAD_DIRS, [[0.08, 0.14, 0.20, 0.26]; 5])
    }

    fn fist_hand() -> HandFrame {
        // 指先が手首側に曲がった手
        build_hand(SPREAD_DIRS, [[0.08, 0.14, 0.10, 0.06]; 5])
    }

    fn pointer_hand() -> HandFrame {
        // 人差し指だけ伸び、他は曲がり、親指は控えめ
        build_hand(
            SPREAD_DIRS,
            [
                [0.06, 0.08, 0.10, 0.12],
                [0.08, 0.14, 0.20, 0.26],
                [0.08, 0.14, 0.10, 0.06],
                [0.08, 0.14, 0.10, 0.06],
                [0.08, 0.14, 0.10, 0.06],
            ],
        )
    }

    fn pinch_hand() -> HandFrame {
        // 親指と人差し指の先が互いに向かって閉じる
        let mut lms = [Landmark::default(); HandLandmarkIndex::COUNT];
        lms[HandLandmarkIndex::Wrist as usize] = Landmark::new(0.5, 0.9);
        // 親指: 左下から右上へ
        lms[HandLandmarkIndex::ThumbCmc as usize] = Landmark::new(0.40, 0.80);
        lms[HandLandmarkIndex::ThumbMcp as usize] = Landmark::new(0.42, 0.75);
        lms[HandLandmarkIndex::ThumbIp as usize] = Landmark::new(0.44, 0.70);
        lms[HandLandmarkIndex::ThumbTip as usize] = Landmark::new(0.47, 0.65);
        // 人差し指: 右上から左下へ折れて親指に向かう
        lms[HandLandmarkIndex::IndexMcp as usize] = Landmark::new(0.58, 0.76);
        lms[HandLandmarkIndex::IndexPip as usize] = Landmark::new(0.56, 0.72);
        lms[HandLandmarkIndex::IndexDip as usize] = Landmark::new(0.53, 0.68);
        lms[HandLandmarkIndex::IndexTip as usize] = Landmark::new(0.50, 0.66);
        // 残りの指は適当に伸ばしておく
        for digit in 2..5 {
            let (dx, dy) = SPREAD_DIRS[digit];
            for (joint, r) in [0.08, 0.14, 0.20, 0.26].iter().enumerate() {
                lms[1 + digit * 4 + joint] =
                    Landmark::new(0.5 + dx * r, 0.9 + dy * r);
            }
        }
        HandFrame::new(lms)
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(GeometryConfig::default())
    }

    #[test]
    fn test_open_hand_detected() {
        let signals = extractor().extract(&spread_hand());
        assert!(signals.is_open_hand);
        assert!(!signals.is_fist);
        assert!(!signals.is_pinch);
    }

    #[test]
    fn test_fist_detected() {
        let signals = extractor().extract(&fist_hand());
        assert!(signals.is_fist);
        assert!(!signals.is_open_hand);
    }

    #[test]
    fn test_pointer_detected() {
        let signals = extractor().extract(&pointer_hand());
        assert!(signals.index_extended);
        assert!(signals.others_retracted);
        assert!(signals.thumb_ok);
        assert!(signals.index_straight);
        assert!(signals.is_pointer());
        assert!(!signals.is_fist);
    }

    #[test]
    fn test_pinch_detected() {
        let signals = extractor().extract(&pinch_hand());
        assert!(signals.is_pinch);
        // ピンチはopenHandと排他
        assert!(!signals.is_open_hand);
        assert!(signals.pinch_distance > 0.0);
        let (px, py) = signals.pinch_position;
        assert!((px - 0.485).abs() < 0.01);
        assert!((py - 0.655).abs() < 0.01);
    }

    #[test]
    fn test_pinch_rejects_accidental_overlap() {
        // 指先は近いが、両指とも同じ方向を向いている（向き合っていない）
        let mut lms = [Landmark::default(); HandLandmarkIndex::COUNT];
        lms[HandLandmarkIndex::Wrist as usize] = Landmark::new(0.5, 0.9);
        lms[HandLandmarkIndex::ThumbIp as usize] = Landmark::new(0.50, 0.75);
        lms[HandLandmarkIndex::ThumbTip as usize] = Landmark::new(0.50, 0.70);
        lms[HandLandmarkIndex::IndexPip as usize] = Landmark::new(0.51, 0.74);
        lms[HandLandmarkIndex::IndexTip as usize] = Landmark::new(0.51, 0.69);
        let hand = HandFrame::new(lms);

        let signals = extractor().extract(&hand);
        assert!(!signals.is_pinch);
    }

    #[test]
    fn test_pointing_angle() {
        let signals = extractor().extract(&pointer_hand());
        let angle = signals.pointing_angle_deg.unwrap();
        // 人差し指は左上方向 (-0.4, -0.9): atan2(-0.9, -0.4) ≈ -113.96°
        assert!((angle - (-113.96)).abs() < 1.0, "angle={}", angle);
    }

    #[test]
    fn test_invalid_wrist_degrades_all() {
        let mut hand = spread_hand();
        hand.landmarks[HandLandmarkIndex::Wrist as usize] = Landmark::new(f32::NAN, 0.5);
        let signals = extractor().extract(&hand);
        assert!(!signals.is_open_hand);
        assert!(!signals.is_fist);
        assert!(!signals.is_pinch);
        assert!(!signals.is_pointer());
        assert!(signals.pointing_angle_deg.is_none());
    }

    #[test]
    fn test_invalid_fingertip_degrades_only_that_signal() {
        let mut hand = pointer_hand();
        // 中指先が無効 → others_retracted だけが落ちる
        hand.landmarks[HandLandmarkIndex::MiddleTip as usize] = Landmark::new(f32::NAN, f32::NAN);
        let signals = extractor().extract(&hand);
        assert!(signals.index_extended);
        assert!(!signals.others_retracted);
        assert!(!signals.is_pointer());
    }

    #[test]
    fn test_index_distance_reported() {
        let signals = extractor().extract(&pointer_hand());
        // 人差し指先は半径0.26の位置
        assert!((signals.index_distance - 0.26).abs() < 0.01);
    }
}
