use crate::config::MachineConfig;
use crate::filter::Point;
use crate::machine::scene::WhiteboardScene;
use crate::machine::{GestureSet, InteractionState};

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Drawing,
    Erasing,
}

/// openHand 長押しの進行状況。Idle中だけ存在する
struct Hold {
    started_ms: f64,
    in_palette: bool,
    next_pick_ms: f64,
    cleared: bool,
}

/// ホワイトボードバリアントのステートマシン
///
/// pointer で描画、fist で消去。openHand の長押しは Idle 中のみ
/// 受け付け、パレット上なら一定間隔の色選択、それ以外なら
/// 長押し一発の全消去になる。長押しタイマーは手のロスト・
/// ジェスチャー変化・Idle離脱のいずれでもリセットする
pub struct WhiteboardMachine {
    config: MachineConfig,
    state: State,
    last_relevant_ms: f64,
    hold: Option<Hold>,
}

impl WhiteboardMachine {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            last_relevant_ms: 0.0,
            hold: None,
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.state {
            State::Idle => InteractionState::Idle,
            State::Drawing => InteractionState::Drawing,
            State::Erasing => InteractionState::Erasing,
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.hold = None;
    }

    pub fn update<S: WhiteboardScene>(&mut self, set: &GestureSet, scene: &mut S) {
        let g = set.gestures;
        let now = set.timestamp_ms;

        match self.state {
            State::Idle => {
                if g.pointer {
                    if let Some(cursor) = set.cursor {
                        scene.start_drawing(cursor);
                        self.enter(State::Drawing, now);
                    }
                } else if g.fist {
                    if let Some(cursor) = set.cursor {
                        scene.start_erasing(cursor);
                        self.enter(State::Erasing, now);
                    }
                } else if g.open_hand && set.hand_present {
                    if let Some(cursor) = set.cursor {
                        self.update_hold(now, cursor, scene);
                        return;
                    }
                    self.hold = None;
                } else {
                    self.hold = None;
                }
            }

            State::Drawing => {
                if g.pointer {
                    if let Some(cursor) = set.cursor {
                        scene.continue_drawing(cursor);
                        self.last_relevant_ms = now;
                    } else {
                        self.check_timeout(now);
                    }
                } else {
                    // ラッチ自体がデバウンス済みなので、落ちた瞬間に確定
                    scene.end_drawing();
                    self.enter(State::Idle, now);
                }
            }

            State::Erasing => {
                if g.fist {
                    if let Some(cursor) = set.cursor {
                        scene.continue_erasing(cursor);
                        self.last_relevant_ms = now;
                    } else {
                        self.check_timeout(now);
                    }
                } else {
                    scene.end_erasing();
                    self.enter(State::Idle, now);
                }
            }
        }
    }

    fn update_hold<S: WhiteboardScene>(&mut self, now: f64, cursor: Point, scene: &mut S) {
        let in_palette = scene.is_pointer_in_palette(cursor);

        // 新規 or パレット内外をまたいだら計時をやり直す
        let restart = match &self.hold {
            None => true,
            Some(hold) => hold.in_palette != in_palette,
        };
        if restart {
            self.hold = Some(Hold {
                started_ms: now,
                in_palette,
                next_pick_ms: now + self.config.color_pick_hold_ms,
                cleared: false,
            });
            return;
        }

        let hold = self.hold.as_mut().unwrap();
        if in_palette {
            // 保持している間、一定間隔で色選択を再発火
            if now >= hold.next_pick_ms {
                scene.attempt_color_pick(cursor);
                hold.next_pick_ms = now + self.config.color_pick_hold_ms;
            }
        } else if !hold.cleared && now - hold.started_ms >= self.config.clear_hold_ms {
            // 全消去は一発限り。再発火には一度離す必要がある
            scene.clear_board();
            hold.cleared = true;
        }
    }

    fn enter(&mut self, state: State, now: f64) {
        self.state = state;
        self.last_relevant_ms = now;
        self.hold = None;
    }

    fn check_timeout(&mut self, now: f64) {
        if now - self.last_relevant_ms > self.config.idle_timeout_ms {
            // カーソルを失ったままなら終了アクションなしで復帰
            self.state = State::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        StartDrawing,
        ContinueDrawing,
        EndDrawing,
        StartErasing,
        ContinueErasing,
        EndErasing,
        ColorPick,
        ClearBoard,
    }

    #[derive(Default)]
    struct RecScene {
        calls: Vec<Call>,
        palette: bool,
    }

    impl WhiteboardScene for RecScene {
        fn start_drawing(&mut self, _point: Point) {
            self.calls.push(Call::StartDrawing);
        }
        fn continue_drawing(&mut self, _point: Point) {
            self.calls.push(Call::ContinueDrawing);
        }
        fn end_drawing(&mut self) {
            self.calls.push(Call::EndDrawing);
        }
        fn start_erasing(&mut self, _point: Point) {
            self.calls.push(Call::StartErasing);
        }
        fn continue_erasing(&mut self, _point: Point) {
            self.calls.push(Call::ContinueErasing);
        }
        fn end_erasing(&mut self) {
            self.calls.push(Call::EndErasing);
        }
        fn is_pointer_in_palette(&self, _point: Point) -> bool {
            self.palette
        }
        fn attempt_color_pick(&mut self, _point: Point) {
            self.calls.push(Call::ColorPick);
        }
        fn clear_board(&mut self) {
            self.calls.push(Call::ClearBoard);
        }
    }

    fn input(ts: f64) -> GestureSet {
        GestureSet {
            timestamp_ms: ts,
            hand_present: true,
            cursor: Some(Point::new(100.0, 100.0)),
            ..Default::default()
        }
    }

    fn pointer(ts: f64) -> GestureSet {
        let mut s = input(ts);
        s.gestures.pointer = true;
        s
    }

    fn fist(ts: f64) -> GestureSet {
        let mut s = input(ts);
        s.gestures.fist = true;
        s
    }

    fn open_hand(ts: f64) -> GestureSet {
        let mut s = input(ts);
        s.gestures.open_hand = true;
        s
    }

    fn machine() -> WhiteboardMachine {
        WhiteboardMachine::new(MachineConfig::default())
    }

    #[test]
    fn test_pointer_draws_stroke() {
        let mut m = machine();
        let mut scene = RecScene::default();
        m.update(&pointer(0.0), &mut scene);
        assert_eq!(m.state(), InteractionState::Drawing);
        m.update(&pointer(16.0), &mut scene);
        m.update(&input(33.0), &mut scene);
        assert_eq!(m.state(), InteractionState::Idle);
        assert_eq!(
            scene.calls,
            vec![Call::StartDrawing, Call::ContinueDrawing, Call::EndDrawing]
        );
    }

    #[test]
    fn test_fist_erases() {
        let mut m = machine();
        let mut scene = RecScene::default();
        m.update(&fist(0.0), &mut scene);
        assert_eq!(m.state(), InteractionState::Erasing);
        m.update(&fist(16.0), &mut scene);
        m.update(&input(33.0), &mut scene);
        assert_eq!(
            scene.calls,
            vec![Call::StartErasing, Call::ContinueErasing, Call::EndErasing]
        );
    }

    #[test]
    fn test_cursor_loss_times_out_without_end_action() {
        let mut m = machine();
        let mut scene = RecScene::default();
        m.update(&pointer(0.0), &mut scene);

        // ラッチはONのままカーソルだけ消えた場合
        let mut lost = pointer(50.0);
        lost.cursor = None;
        m.update(&lost, &mut scene);
        assert_eq!(m.state(), InteractionState::Drawing);
        let mut lost = pointer(150.0);
        lost.cursor = None;
        m.update(&lost, &mut scene);
        assert_eq!(m.state(), InteractionState::Idle);
        assert_eq!(scene.calls, vec![Call::StartDrawing]);
    }

    #[test]
    fn test_color_pick_repeats_at_interval() {
        let mut m = machine();
        let mut scene = RecScene {
            palette: true,
            ..Default::default()
        };
        for ts in [0.0, 100.0, 200.0, 250.0, 300.0, 400.0, 500.0] {
            m.update(&open_hand(ts), &mut scene);
        }
        // 発火は 250ms と 500ms の2回
        assert_eq!(scene.calls, vec![Call::ColorPick, Call::ColorPick]);
    }

    #[test]
    fn test_clear_board_fires_once_per_hold() {
        let mut m = machine();
        let mut scene = RecScene::default();
        for ts in [0.0, 1000.0, 1900.0, 2500.0, 4000.0] {
            m.update(&open_hand(ts), &mut scene);
        }
        assert_eq!(scene.calls, vec![Call::ClearBoard]);
    }

    #[test]
    fn test_clear_rearms_after_release() {
        let mut m = machine();
        let mut scene = RecScene::default();
        for ts in [0.0, 1900.0] {
            m.update(&open_hand(ts), &mut scene);
        }
        // 一度離してから再保持すれば再発火できる
        m.update(&input(2000.0), &mut scene);
        for ts in [2100.0, 4000.0] {
            m.update(&open_hand(ts), &mut scene);
        }
        assert_eq!(scene.calls, vec![Call::ClearBoard, Call::ClearBoard]);
    }

    #[test]
    fn test_hold_resets_on_gesture_change() {
        let mut m = machine();
        let mut scene = RecScene::default();
        m.update(&open_hand(0.0), &mut scene);
        m.update(&open_hand(1000.0), &mut scene);
        // fist で消去へ → 保持タイマー破棄
        m.update(&fist(1100.0), &mut scene);
        m.update(&input(1200.0), &mut scene);
        // 再保持: 前回の1000msは引き継がれない
        m.update(&open_hand(1300.0), &mut scene);
        m.update(&open_hand(2500.0), &mut scene);
        assert!(!scene.calls.contains(&Call::ClearBoard));
        m.update(&open_hand(3200.0), &mut scene);
        assert!(scene.calls.contains(&Call::ClearBoard));
    }

    #[test]
    fn test_palette_boundary_restarts_hold() {
        let mut m = machine();
        let mut scene = RecScene {
            palette: true,
            ..Default::default()
        };
        m.update(&open_hand(0.0), &mut scene);
        // パレット外へ移動 → 計時やり直し、以前の経過は無効
        scene.palette = false;
        m.update(&open_hand(200.0), &mut scene);
        m.update(&open_hand(1900.0), &mut scene);
        assert!(!scene.calls.contains(&Call::ClearBoard));
        m.update(&open_hand(2100.0), &mut scene);
        assert_eq!(scene.calls, vec![Call::ClearBoard]);
    }

    #[test]
    fn test_utility_not_sampled_while_drawing() {
        let mut m = machine();
        let mut scene = RecScene {
            palette: true,
            ..Default::default()
        };
        m.update(&pointer(0.0), &mut scene);
        // 描画中に openHand も立っても保持処理は走らない
        let mut both = pointer(300.0);
        both.gestures.open_hand = true;
        m.update(&both, &mut scene);
        assert_eq!(m.state(), InteractionState::Drawing);
        assert!(!scene.calls.contains(&Call::ColorPick));
    }

    #[test]
    fn test_pointer_beats_open_hand_in_idle() {
        let mut m = machine();
        let mut scene = RecScene::default();
        let mut both = open_hand(0.0);
        both.gestures.pointer = true;
        m.update(&both, &mut scene);
        assert_eq!(m.state(), InteractionState::Drawing);
    }
}
