//! 手・顔ランドマークのノイズ除去とジェスチャー駆動の対話制御
//!
//! 外部の視覚モデルが毎フレーム出すランドマークと分類スコアを、
//! 幾何判定 → スコア融合 → 時系列安定化 → フィルタ の多段で
//! 安定した真偽ジェスチャーへ変換し、ステートマシンで外部シーンへの
//! アクション呼び出しに落とす

pub mod config;
pub mod face;
pub mod filter;
pub mod fusion;
pub mod geometry;
pub mod landmark;
pub mod machine;
pub mod pipeline;
pub mod stabilizer;

pub use config::Config;
pub use landmark::Frame;
pub use machine::{
    FaceActionDriver, GestureSet, InteractionState, LabScene, ManipulationMachine,
    ManipulationScene, SelectionHandle, WhiteboardMachine, WhiteboardScene,
};
pub use pipeline::{DebugSnapshot, GesturePipeline};
