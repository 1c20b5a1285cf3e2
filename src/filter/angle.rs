use std::collections::VecDeque;

use crate::config::AngleConfig;
use crate::filter::median;

const HISTORY_LEN: usize = 5;

/// 角度を (-180, 180] 度へ正規化
pub fn normalize_deg(deg: f32) -> f32 {
    let mut a = deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// from から to への最短経路の符号付き角度差
pub fn shortest_delta_deg(from: f32, to: f32) -> f32 {
    normalize_deg(to - from)
}

/// 手の回転角のフィルタ
///
/// ±180度の巻き戻りを意識した構成: 生角度の履歴をそのまま
/// 平均せず、現在値からの最短経路差分の中央値を取ってから
/// EMAで追従する。179度→-179度は2度の移動として扱われる
pub struct AngleFilter {
    config: AngleConfig,
    history: VecDeque<f32>,
    current: Option<f32>,
}

impl AngleFilter {
    pub fn new(config: AngleConfig) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(HISTORY_LEN),
            current: None,
        }
    }

    /// 生角度(度)を1サンプル取り込み、平滑化済み角度を返す
    pub fn update(&mut self, raw_deg: f32) -> f32 {
        if !raw_deg.is_finite() {
            return self.current.unwrap_or(0.0);
        }

        let raw = normalize_deg(raw_deg);
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(raw);

        let current = match self.current {
            None => {
                self.current = Some(raw);
                return raw;
            }
            Some(c) => c,
        };

        let mut deltas: Vec<f32> = self
            .history
            .iter()
            .map(|&h| shortest_delta_deg(current, h))
            .collect();
        let delta = median(&mut deltas);

        // 微小変化は無視して静止時のふらつきを抑える
        if delta.abs() < self.config.min_change_deg {
            return current;
        }

        let next = normalize_deg(current + delta * self.config.alpha);
        self.current = Some(next);
        next
    }

    pub fn angle(&self) -> Option<f32> {
        self.current
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> AngleFilter {
        AngleFilter::new(AngleConfig::default())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(180.0), 180.0);
        assert_eq!(normalize_deg(-180.0), 180.0);
        assert_eq!(normalize_deg(539.0), 179.0);
        assert_eq!(normalize_deg(-190.0), 170.0);
    }

    #[test]
    fn test_shortest_delta_wraps() {
        // 179 → -179 は +2 度であって -358 度ではない
        assert!((shortest_delta_deg(179.0, -179.0) - 2.0).abs() < 1e-4);
        assert!((shortest_delta_deg(-179.0, 179.0) + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_first_sample_snaps() {
        let mut f = filter();
        assert_eq!(f.update(42.0), 42.0);
        assert_eq!(f.angle(), Some(42.0));
    }

    #[test]
    fn test_constant_input_is_idempotent() {
        let mut f = filter();
        f.update(42.0);
        for _ in 0..10 {
            assert_eq!(f.update(42.0), 42.0);
        }
    }

    #[test]
    fn test_deadband_ignores_small_change() {
        let mut f = filter();
        f.update(10.0);
        // 中央値差分 0.25 度 < 1 度 → 不変
        assert_eq!(f.update(10.5), 10.0);
    }

    #[test]
    fn test_crosses_wraparound_the_short_way() {
        let mut f = filter();
        f.update(179.0);
        // 2サンプル目: 差分中央値は (0 + 2)/2 = 1 度 → +0.2 度移動
        let second = f.update(-179.0);
        assert!(second > 179.0);

        let mut last = second;
        for _ in 0..200 {
            last = f.update(-179.0);
        }
        // デッドバンド幅の範囲内で -179 に収束し、0 側は通らない
        assert!(shortest_delta_deg(last, -179.0).abs() < 1.5);
        assert!(last.abs() > 170.0);
    }

    #[test]
    fn test_non_finite_keeps_previous() {
        let mut f = filter();
        f.update(30.0);
        assert_eq!(f.update(f32::NAN), 30.0);
        assert_eq!(f.angle(), Some(30.0));
    }

    #[test]
    fn test_reset() {
        let mut f = filter();
        f.update(90.0);
        f.reset();
        assert_eq!(f.angle(), None);
        assert_eq!(f.update(-90.0), -90.0);
    }
}
