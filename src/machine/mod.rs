mod face_actions;
mod manipulation;
mod scene;
mod whiteboard;

pub use face_actions::FaceActionDriver;
pub use manipulation::ManipulationMachine;
pub use scene::{LabScene, ManipulationScene, SelectionHandle, WhiteboardScene};
pub use whiteboard::WhiteboardMachine;

use crate::filter::Point;
use crate::stabilizer::StabilizedGestures;

/// ステートマシンが毎ティック消費する安定化済み入力一式
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureSet {
    pub timestamp_ms: f64,
    pub hand_present: bool,
    pub gestures: StabilizedGestures,
    /// 平滑化済みカーソル（キャンバス座標）
    pub cursor: Option<Point>,
    /// 平滑化済み手の回転角(度)
    pub angle_deg: Option<f32>,
    /// ピンチ位置（キャンバス座標）
    pub pinch_position: Option<Point>,
    /// ピンチの指間距離（正規化座標）
    pub pinch_distance: Option<f32>,
    /// 手首-人差し指間距離（正規化座標）
    pub index_distance: Option<f32>,
}

/// 現在の対話状態。常にちょうど1つ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging,
    Rotating,
    Slingshot,
    Drawing,
    Erasing,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// 角度を [0, 360) 度へ
pub(crate) fn normalize_360(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_360() {
        assert_eq!(normalize_360(0.0), 0.0);
        assert_eq!(normalize_360(375.0), 15.0);
        assert_eq!(normalize_360(-10.0), 350.0);
        assert_eq!(normalize_360(720.0), 0.0);
    }
}
