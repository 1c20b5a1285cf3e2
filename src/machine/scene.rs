use crate::filter::Point;

/// シーンが select / startSlingshot で返す不透明トークン。
/// ステートマシンは中身を解釈せず、以後の呼び出しにそのまま渡す
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionHandle(pub u64);

/// 部品操作シーン（ドラッグ・回転・スリングショット）への出力語彙
///
/// 呼び出しは fire-and-forget が基本。シーン側はどの呼び出しも
/// 無視してよく、ステートマシンが戻り値を見るのは明示された
/// select / rotate_start / current_angle / start_slingshot のみ
pub trait ManipulationScene {
    /// カーソル位置の部品を選択。該当なしは None
    fn select(&mut self, point: Point) -> Option<SelectionHandle>;
    fn drag(&mut self, handle: SelectionHandle, point: Point);
    fn drop(&mut self, handle: SelectionHandle);

    /// 回転開始。現在の部品角度(度)を返す
    fn rotate_start(&mut self, handle: SelectionHandle, point: Point, hand_angle: f32) -> f32;
    /// 部品の現在角度(度)。毎ティック問い直す（外部で動くこともある）
    fn current_angle(&mut self, handle: SelectionHandle) -> f32;
    fn rotate(&mut self, handle: SelectionHandle, angle: f32, delta: f32);
    fn rotate_end(&mut self, handle: SelectionHandle);

    fn adjust_trajectory(&mut self, angle: f32, index_distance: f32, point: Point);

    fn start_slingshot(&mut self, point: Point, distance: f32, angle: f32)
        -> Option<SelectionHandle>;
    fn update_slingshot(&mut self, point: Point, distance: f32, angle: f32);
    fn release_slingshot(&mut self, handle: SelectionHandle);
}

/// ホワイトボードシーン（描画・消去・パレット）への出力語彙
pub trait WhiteboardScene {
    fn start_drawing(&mut self, point: Point);
    fn continue_drawing(&mut self, point: Point);
    fn end_drawing(&mut self);

    fn start_erasing(&mut self, point: Point);
    fn continue_erasing(&mut self, point: Point);
    fn end_erasing(&mut self);

    fn is_pointer_in_palette(&self, point: Point) -> bool;
    fn attempt_color_pick(&mut self, point: Point);
    fn clear_board(&mut self);
}

/// 表情で駆動する実験シーンの補助操作
pub trait LabScene {
    fn evaluate(&mut self, measure: bool);
    fn toggle_switch(&mut self);
    fn request_assistance(&mut self);
}
