/// 真偽信号の指数平滑化
///
/// target (0/1) へ value += (target - value) * alpha で漸近し、
/// 0.5 閾値で真偽に戻す。ラッチ前段のちらつき吸収
pub struct GestureSmoother {
    value: f32,
    alpha: f32,
}

impl GestureSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            value: 0.0,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn update(&mut self, target_on: bool) -> bool {
        let target = if target_on { 1.0 } else { 0.0 };
        self.value += (target - self.value) * self.alpha;
        self.value > 0.5
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_upward() {
        let mut s = GestureSmoother::new(0.25);
        let mut became_true_at = None;
        for i in 1..=20 {
            if s.update(true) && became_true_at.is_none() {
                became_true_at = Some(i);
            }
        }
        // alpha=0.25: 1-(0.75)^3 = 0.578 > 0.5 → 3フレーム目
        assert_eq!(became_true_at, Some(3));
        assert!(s.value() > 0.99);
    }

    #[test]
    fn test_alpha_one_is_instant() {
        let mut s = GestureSmoother::new(1.0);
        assert!(s.update(true));
        assert!(!s.update(false));
    }

    #[test]
    fn test_decays_downward() {
        let mut s = GestureSmoother::new(0.3);
        for _ in 0..20 {
            s.update(true);
        }
        let mut became_false_at = None;
        for i in 1..=20 {
            if !s.update(false) && became_false_at.is_none() {
                became_false_at = Some(i);
            }
        }
        assert!(became_false_at.is_some());
        assert!(s.value() < 0.01);
    }

    #[test]
    fn test_reset() {
        let mut s = GestureSmoother::new(0.5);
        s.update(true);
        s.update(true);
        s.reset();
        assert_eq!(s.value(), 0.0);
    }
}
