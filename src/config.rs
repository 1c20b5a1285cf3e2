use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub face: FaceConfig,
    #[serde(default)]
    pub fusion: FusionConfig,
    #[serde(default)]
    pub stabilizer: StabilizerConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub angle: AngleConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub machine: MachineConfig,
}

/// 出力キャンバスの寸法（ピクセル）
#[derive(Debug, Deserialize, Clone)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f32,
    #[serde(default = "default_canvas_height")]
    pub height: f32,
}

fn default_canvas_width() -> f32 { 1280.0 }
fn default_canvas_height() -> f32 { 720.0 }

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

/// 幾何ジェスチャー判定の比率定数
#[derive(Debug, Deserialize, Clone)]
pub struct GeometryConfig {
    /// 指が「伸びている」: 指先距離 > 近位関節距離 × この比率
    #[serde(default = "default_extended_ratio")]
    pub extended_ratio: f32,
    /// 指が「曲がっている」: 指先距離 < 近位関節距離 × この比率
    #[serde(default = "default_retracted_ratio")]
    pub retracted_ratio: f32,
    /// openHand判定の「開いた指」比率
    #[serde(default = "default_open_ratio")]
    pub open_ratio: f32,
    /// ピンチ距離の固定下限（正規化座標）
    #[serde(default = "default_pinch_floor")]
    pub pinch_floor: f32,
    /// ピンチ適応閾値: 手サイズに対する割合
    #[serde(default = "default_pinch_fraction")]
    pub pinch_fraction: f32,
    /// 親指が強く伸びていない判定の比率
    #[serde(default = "default_thumb_extended_ratio")]
    pub thumb_extended_ratio: f32,
    /// 人差し指の直線性: (tip-PIP)・(PIP-MCP) の最小コサイン
    #[serde(default = "default_straight_min_cos")]
    pub straight_min_cos: f32,
}

fn default_extended_ratio() -> f32 { 1.2 }
fn default_retracted_ratio() -> f32 { 0.95 }
fn default_open_ratio() -> f32 { 1.2 }
fn default_pinch_floor() -> f32 { 0.05 }
fn default_pinch_fraction() -> f32 { 0.2 }
fn default_thumb_extended_ratio() -> f32 { 1.3 }
fn default_straight_min_cos() -> f32 { 0.8 }

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            extended_ratio: default_extended_ratio(),
            retracted_ratio: default_retracted_ratio(),
            open_ratio: default_open_ratio(),
            pinch_floor: default_pinch_floor(),
            pinch_fraction: default_pinch_fraction(),
            thumb_extended_ratio: default_thumb_extended_ratio(),
            straight_min_cos: default_straight_min_cos(),
        }
    }
}

/// 表情ジェスチャーの閾値
#[derive(Debug, Deserialize, Clone)]
pub struct FaceConfig {
    /// ウィンク: 両目の開き比 (min/max) がこの値未満
    #[serde(default = "default_wink_ratio")]
    pub wink_ratio: f32,
    /// ウィンク: 目が開いているとみなす最小の開き
    #[serde(default = "default_eye_open_min")]
    pub eye_open_min: f32,
    /// 笑顔: 口の横幅/縦幅の最小比
    #[serde(default = "default_smile_aspect")]
    pub smile_aspect: f32,
    /// 笑顔: 口が開いているとみなす最小の開き
    #[serde(default = "default_mouth_open_min")]
    pub mouth_open_min: f32,
    /// しかめ面: 眉間の縦差の最大値
    #[serde(default = "default_frown_brow_gap")]
    pub frown_brow_gap: f32,
    /// しかめ面: 眉-目間の最小高さ
    #[serde(default = "default_brow_height_min")]
    pub brow_height_min: f32,
}

fn default_wink_ratio() -> f32 { 0.4 }
fn default_eye_open_min() -> f32 { 0.01 }
fn default_smile_aspect() -> f32 { 1.6 }
fn default_mouth_open_min() -> f32 { 0.005 }
fn default_frown_brow_gap() -> f32 { 0.015 }
fn default_brow_height_min() -> f32 { 0.01 }

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            wink_ratio: default_wink_ratio(),
            eye_open_min: default_eye_open_min(),
            smile_aspect: default_smile_aspect(),
            mouth_open_min: default_mouth_open_min(),
            frown_brow_gap: default_frown_brow_gap(),
            brow_height_min: default_brow_height_min(),
        }
    }
}

/// スコア融合の閾値
/// 幾何判定は低い裏付けスコアで成立、分類器単独なら高い閾値が必要
#[derive(Debug, Deserialize, Clone)]
pub struct FusionConfig {
    /// 幾何判定を裏付ける最小スコア（カテゴリ不在時は幾何のみで成立）
    #[serde(default = "default_corroborating_score")]
    pub corroborating_score: f32,
    /// 分類器単独で成立する最小スコア (openHand/fist)
    #[serde(default = "default_solo_score")]
    pub solo_score: f32,
    /// pointer の分類器単独閾値（fistより緩い）
    #[serde(default = "default_pointer_solo_score")]
    pub pointer_solo_score: f32,
    /// fistスコアがこの値以上なら pointer を棄却
    #[serde(default = "default_pointer_fist_veto")]
    pub pointer_fist_veto: f32,
}

fn default_corroborating_score() -> f32 { 0.1 }
fn default_solo_score() -> f32 { 0.55 }
fn default_pointer_solo_score() -> f32 { 0.45 }
fn default_pointer_fist_veto() -> f32 { 0.4 }

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            corroborating_score: default_corroborating_score(),
            solo_score: default_solo_score(),
            pointer_solo_score: default_pointer_solo_score(),
            pointer_fist_veto: default_pointer_fist_veto(),
        }
    }
}

/// 単一ジェスチャーの安定化パラメータ
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct GestureParams {
    /// ラッチONに必要な連続検出フレーム数
    pub on_frames: u32,
    /// ラッチOFFに必要な連続非検出フレーム数
    pub off_frames: u32,
    /// EMA平滑化係数（大きいほど反応が速い）
    pub alpha: f32,
    /// 直近5フレームの一致率の最小値
    pub consistency: f32,
}

impl GestureParams {
    pub const fn new(on_frames: u32, off_frames: u32, alpha: f32, consistency: f32) -> Self {
        Self {
            on_frames,
            off_frames,
            alpha,
            consistency,
        }
    }
}

impl Default for GestureParams {
    fn default() -> Self {
        Self::new(4, 4, 0.2, 0.7)
    }
}

/// ジェスチャーごとの安定化パラメータ一式
/// デフォルト値は録画セッションで調整したもの
#[derive(Debug, Deserialize, Clone)]
pub struct StabilizerConfig {
    #[serde(default = "default_open_hand_params")]
    pub open_hand: GestureParams,
    #[serde(default = "default_fist_params")]
    pub fist: GestureParams,
    #[serde(default = "default_pointer_params")]
    pub pointer: GestureParams,
    #[serde(default = "default_pinch_params")]
    pub pinch: GestureParams,
    #[serde(default = "default_wink_params")]
    pub wink: GestureParams,
    #[serde(default = "default_smile_params")]
    pub smile: GestureParams,
    #[serde(default = "default_frown_params")]
    pub frown: GestureParams,
}

fn default_open_hand_params() -> GestureParams { GestureParams::new(4, 5, 0.15, 0.7) }
fn default_fist_params() -> GestureParams { GestureParams::new(3, 4, 0.25, 0.7) }
fn default_pointer_params() -> GestureParams { GestureParams::new(4, 4, 0.2, 0.55) }
fn default_pinch_params() -> GestureParams { GestureParams::new(3, 4, 0.3, 0.7) }
fn default_wink_params() -> GestureParams { GestureParams::new(3, 3, 0.25, 0.7) }
fn default_smile_params() -> GestureParams { GestureParams::new(3, 4, 0.2, 0.7) }
fn default_frown_params() -> GestureParams { GestureParams::new(8, 5, 0.12, 0.7) }

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            open_hand: default_open_hand_params(),
            fist: default_fist_params(),
            pointer: default_pointer_params(),
            pinch: default_pinch_params(),
            wink: default_wink_params(),
            smile: default_smile_params(),
            frown: default_frown_params(),
        }
    }
}

/// ポインタフィルタの定数
#[derive(Debug, Deserialize, Clone)]
pub struct PointerConfig {
    /// この距離(px)未満の動きは手ブレとみなす
    #[serde(default = "default_min_movement_px")]
    pub min_movement_px: f32,
    /// 静止時の平滑化係数（小さいほど動かない）
    #[serde(default = "default_hold_alpha")]
    pub hold_alpha: f32,
    /// 移動時の平滑化係数
    #[serde(default = "default_move_alpha")]
    pub move_alpha: f32,
}

fn default_min_movement_px() -> f32 { 2.0 }
fn default_hold_alpha() -> f32 { 0.1 }
fn default_move_alpha() -> f32 { 0.25 }

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            min_movement_px: default_min_movement_px(),
            hold_alpha: default_hold_alpha(),
            move_alpha: default_move_alpha(),
        }
    }
}

/// 角度フィルタの定数
#[derive(Debug, Deserialize, Clone)]
pub struct AngleConfig {
    /// この角度(度)未満の変化は無視
    #[serde(default = "default_min_change_deg")]
    pub min_change_deg: f32,
    /// EMA平滑化係数
    #[serde(default = "default_angle_alpha")]
    pub alpha: f32,
}

fn default_min_change_deg() -> f32 { 1.0 }
fn default_angle_alpha() -> f32 { 0.2 }

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            min_change_deg: default_min_change_deg(),
            alpha: default_angle_alpha(),
        }
    }
}

/// 座標範囲キャリブレーション（ゲーム系バリアントのみ）
#[derive(Debug, Deserialize, Clone)]
pub struct CalibrationConfig {
    /// キャリブレーションを有効にするか
    #[serde(default)]
    pub enabled: bool,
    /// ウォームアップのサンプル数
    #[serde(default = "default_calibration_samples")]
    pub samples: usize,
    /// 確定後の範囲を中点周りに拡大する係数
    #[serde(default = "default_overscale")]
    pub overscale: f32,
}

fn default_calibration_samples() -> usize { 30 }
fn default_overscale() -> f32 { 1.1 }

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            samples: default_calibration_samples(),
            overscale: default_overscale(),
        }
    }
}

/// ステートマシンのタイミング
#[derive(Debug, Deserialize, Clone)]
pub struct MachineConfig {
    /// 非Idle状態で関連ジェスチャーが途切れてからIdleへ強制復帰するまで(ms)
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: f64,
    /// 手の回転を部品の回転に増幅する係数
    #[serde(default = "default_rotation_sensitivity")]
    pub rotation_sensitivity: f32,
    /// パレット上での色選択の再発火間隔(ms)
    #[serde(default = "default_color_pick_hold_ms")]
    pub color_pick_hold_ms: f64,
    /// 全消去発動までの openHand 保持時間(ms)
    #[serde(default = "default_clear_hold_ms")]
    pub clear_hold_ms: f64,
    /// ヒント要求のレート制限(ms)
    #[serde(default = "default_assist_cooldown_ms")]
    pub assist_cooldown_ms: f64,
}

fn default_idle_timeout_ms() -> f64 { 120.0 }
fn default_rotation_sensitivity() -> f32 { 2.5 }
fn default_color_pick_hold_ms() -> f64 { 250.0 }
fn default_clear_hold_ms() -> f64 { 1800.0 }
fn default_assist_cooldown_ms() -> f64 { 5000.0 }

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
            rotation_sensitivity: default_rotation_sensitivity(),
            color_pick_hold_ms: default_color_pick_hold_ms(),
            clear_hold_ms: default_clear_hold_ms(),
            assist_cooldown_ms: default_assist_cooldown_ms(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// ファイルがない・壊れている場合はデフォルトを返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
