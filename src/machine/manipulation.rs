use crate::config::MachineConfig;
use crate::filter::shortest_delta_deg;
use crate::machine::scene::{ManipulationScene, SelectionHandle};
use crate::machine::{normalize_360, GestureSet, InteractionState};

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Dragging {
        handle: SelectionHandle,
    },
    Rotating {
        handle: SelectionHandle,
        last_hand_angle: f32,
    },
    Slingshot {
        handle: SelectionHandle,
    },
}

/// 部品操作バリアントのステートマシン
///
/// Idle / Dragging / Rotating / Slingshot を遷移する。
/// 非Idle状態で関連ジェスチャーが途切れても1ティックでは戻らず、
/// idle_timeout_ms 続いたときだけ終了アクションなしで Idle へ
/// 強制復帰する。Slingshot だけは例外で、ピンチ解除そのものが
/// 発射トリガなので即時に release する
pub struct ManipulationMachine {
    config: MachineConfig,
    state: State,
    last_relevant_ms: f64,
}

impl ManipulationMachine {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            last_relevant_ms: 0.0,
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.state {
            State::Idle => InteractionState::Idle,
            State::Dragging { .. } => InteractionState::Dragging,
            State::Rotating { .. } => InteractionState::Rotating,
            State::Slingshot { .. } => InteractionState::Slingshot,
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
    }

    pub fn update<S: ManipulationScene>(&mut self, set: &GestureSet, scene: &mut S) {
        let g = set.gestures;
        let now = set.timestamp_ms;

        match self.state {
            State::Idle => {
                if g.pinch {
                    // Idleではピンチが fist より優先
                    self.try_start_slingshot(set, scene);
                } else if g.fist {
                    if let Some(cursor) = set.cursor {
                        // select が None なら掴めるものがない → Idleのまま
                        if let Some(handle) = scene.select(cursor) {
                            self.enter(State::Dragging { handle }, now);
                        }
                    }
                } else if g.pointer {
                    if let (Some(cursor), Some(angle)) = (set.cursor, set.angle_deg) {
                        scene.adjust_trajectory(angle, set.index_distance.unwrap_or(0.0), cursor);
                    }
                }
            }

            State::Dragging { handle } => {
                if g.pinch {
                    // スリングショットの先取り。持っている物は先に手放す
                    scene.drop(handle);
                    self.enter(State::Idle, now);
                    self.try_start_slingshot(set, scene);
                } else if g.pointer {
                    if let (Some(cursor), Some(hand_angle)) = (set.cursor, set.angle_deg) {
                        // 戻り値の部品角度は使わない。回転中は毎ティック問い直す
                        let _ = scene.rotate_start(handle, cursor, hand_angle);
                        self.enter(
                            State::Rotating {
                                handle,
                                last_hand_angle: hand_angle,
                            },
                            now,
                        );
                    } else {
                        self.check_timeout(now);
                    }
                } else if g.open_hand {
                    scene.drop(handle);
                    self.enter(State::Idle, now);
                } else if g.fist {
                    if let Some(cursor) = set.cursor {
                        scene.drag(handle, cursor);
                    }
                    self.last_relevant_ms = now;
                } else {
                    self.check_timeout(now);
                }
            }

            State::Rotating {
                handle,
                last_hand_angle,
            } => {
                if g.open_hand {
                    scene.rotate_end(handle);
                    scene.drop(handle);
                    self.enter(State::Idle, now);
                } else if g.fist {
                    scene.rotate_end(handle);
                    self.enter(State::Dragging { handle }, now);
                } else if g.pointer {
                    if let Some(hand_angle) = set.angle_deg {
                        let delta = shortest_delta_deg(last_hand_angle, hand_angle)
                            * self.config.rotation_sensitivity;
                        let next = normalize_360(scene.current_angle(handle) + delta);
                        scene.rotate(handle, next, delta);
                        self.state = State::Rotating {
                            handle,
                            last_hand_angle: hand_angle,
                        };
                    }
                    self.last_relevant_ms = now;
                } else {
                    self.check_timeout(now);
                }
            }

            State::Slingshot { handle } => {
                if g.pinch {
                    if let Some(pos) = set.pinch_position {
                        scene.update_slingshot(
                            pos,
                            set.pinch_distance.unwrap_or(0.0),
                            set.angle_deg.unwrap_or(0.0),
                        );
                    }
                    self.last_relevant_ms = now;
                } else {
                    // ピンチ解除＝発射。タイムアウトを待たない
                    scene.release_slingshot(handle);
                    self.enter(State::Idle, now);
                }
            }
        }
    }

    fn try_start_slingshot<S: ManipulationScene>(&mut self, set: &GestureSet, scene: &mut S) {
        if let Some(pos) = set.pinch_position {
            if let Some(handle) = scene.start_slingshot(
                pos,
                set.pinch_distance.unwrap_or(0.0),
                set.angle_deg.unwrap_or(0.0),
            ) {
                self.enter(State::Slingshot { handle }, set.timestamp_ms);
            }
        }
    }

    fn enter(&mut self, state: State, now: f64) {
        self.state = state;
        self.last_relevant_ms = now;
    }

    fn check_timeout(&mut self, now: f64) {
        if now - self.last_relevant_ms > self.config.idle_timeout_ms {
            // デバウンス済み退出: 終了アクションは出さない
            self.state = State::Idle;
        }
    }
}
