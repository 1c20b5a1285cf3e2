use std::collections::VecDeque;

use crate::config::PointerConfig;
use crate::filter::{median, Point};

const HISTORY_LEN: usize = 5;

/// 人差し指カーソルのフィルタ
///
/// 正規化ランドマークをミラーしてキャンバス座標へ写し、
/// 直近5サンプルの軸別中央値を追う。中央値の移動が閾値未満の
/// ときは係数を落として静止時の震えを殺し、移動時は追従を優先する
pub struct PointerFilter {
    config: PointerConfig,
    width: f32,
    height: f32,
    history: VecDeque<Point>,
    current: Option<Point>,
}

impl PointerFilter {
    pub fn new(config: PointerConfig, width: f32, height: f32) -> Self {
        Self {
            config,
            width,
            height,
            history: VecDeque::with_capacity(HISTORY_LEN),
            current: None,
        }
    }

    /// 正規化座標 (x, y) を1サンプル取り込み、平滑化済みカーソルを返す。
    /// 非有限の入力は無視して前回値を維持する
    pub fn update(&mut self, x: f32, y: f32) -> Option<Point> {
        if !x.is_finite() || !y.is_finite() {
            return self.current;
        }

        // 自分撮り表示に合わせてX軸を反転
        let target = Point::new((1.0 - x) * self.width, y * self.height);
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(target);

        let mut xs: Vec<f32> = self.history.iter().map(|p| p.x).collect();
        let mut ys: Vec<f32> = self.history.iter().map(|p| p.y).collect();
        let center = Point::new(median(&mut xs), median(&mut ys));

        let next = match self.current {
            // 最初のサンプルは遅延なくスナップ
            None => center,
            Some(prev) => {
                let movement = center.distance(&prev);
                let alpha = if movement < self.config.min_movement_px {
                    self.config.hold_alpha
                } else {
                    self.config.move_alpha
                };
                Point::new(
                    prev.x + (center.x - prev.x) * alpha,
                    prev.y + (center.y - prev.y) * alpha,
                )
            }
        };

        let clamped = Point::new(
            next.x.clamp(0.0, self.width),
            next.y.clamp(0.0, self.height),
        );
        self.current = Some(clamped);
        self.current
    }

    pub fn position(&self) -> Option<Point> {
        self.current
    }

    /// 手を見失ったら呼ぶ。次のサンプルは再びスナップになる
    pub fn reset(&mut self) {
        self.history.clear();
        self.current = None;
    }
}
