use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{bail, Context, Result};

use tenohira::config::Config;
use tenohira::filter::Point;
use tenohira::landmark::Frame;
use tenohira::machine::{
    InteractionState, ManipulationMachine, ManipulationScene, SelectionHandle, WhiteboardMachine,
    WhiteboardScene,
};
use tenohira::pipeline::GesturePipeline;

/// アクション呼び出しを標準出力へ流すだけのシーン
struct LogScene {
    next_handle: u64,
    component_angle: f32,
}

impl LogScene {
    fn new() -> Self {
        Self {
            next_handle: 0,
            component_angle: 0.0,
        }
    }

    fn handle(&mut self) -> SelectionHandle {
        self.next_handle += 1;
        SelectionHandle(self.next_handle)
    }
}

impl ManipulationScene for LogScene {
    fn select(&mut self, point: Point) -> Option<SelectionHandle> {
        let h = self.handle();
        println!("  select ({:.0}, {:.0}) -> #{}", point.x, point.y, h.0);
        Some(h)
    }

    fn drag(&mut self, handle: SelectionHandle, point: Point) {
        println!("  drag #{} ({:.0}, {:.0})", handle.0, point.x, point.y);
    }

    fn drop(&mut self, handle: SelectionHandle) {
        println!("  drop #{}", handle.0);
    }

    fn rotate_start(&mut self, handle: SelectionHandle, _point: Point, hand_angle: f32) -> f32 {
        println!("  rotateStart #{} 手角度 {:.1}度", handle.0, hand_angle);
        self.component_angle
    }

    fn current_angle(&mut self, _handle: SelectionHandle) -> f32 {
        self.component_angle
    }

    fn rotate(&mut self, handle: SelectionHandle, angle: f32, delta: f32) {
        self.component_angle = angle;
        println!("  rotate #{} -> {:.1}度 (Δ{:+.1})", handle.0, angle, delta);
    }

    fn rotate_end(&mut self, handle: SelectionHandle) {
        println!("  rotateEnd #{}", handle.0);
    }

    fn adjust_trajectory(&mut self, angle: f32, index_distance: f32, point: Point) {
        println!(
            "  adjustTrajectory 角度 {:.1}度 距離 {:.3} ({:.0}, {:.0})",
            angle, index_distance, point.x, point.y
        );
    }

    fn start_slingshot(&mut self, point: Point, distance: f32, _angle: f32) -> Option<SelectionHandle> {
        let h = self.handle();
        println!(
            "  startSlingshot ({:.0}, {:.0}) 距離 {:.3} -> #{}",
            point.x, point.y, distance, h.0
        );
        Some(h)
    }

    fn update_slingshot(&mut self, point: Point, distance: f32, _angle: f32) {
        println!(
            "  updateSlingshot ({:.0}, {:.0}) 距離 {:.3}",
            point.x, point.y, distance
        );
    }

    fn release_slingshot(&mut self, handle: SelectionHandle) {
        println!("  releaseSlingshot #{} (発射)", handle.0);
    }
}

impl WhiteboardScene for LogScene {
    fn start_drawing(&mut self, point: Point) {
        println!("  startDrawing ({:.0}, {:.0})", point.x, point.y);
    }

    fn continue_drawing(&mut self, point: Point) {
        println!("  continueDrawing ({:.0}, {:.0})", point.x, point.y);
    }

    fn end_drawing(&mut self) {
        println!("  endDrawing");
    }

    fn start_erasing(&mut self, point: Point) {
        println!("  startErasing ({:.0}, {:.0})", point.x, point.y);
    }

    fn continue_erasing(&mut self, point: Point) {
        println!("  continueErasing ({:.0}, {:.0})", point.x, point.y);
    }

    fn end_erasing(&mut self) {
        println!("  endErasing");
    }

    fn is_pointer_in_palette(&self, _point: Point) -> bool {
        false
    }

    fn attempt_color_pick(&mut self, point: Point) {
        println!("  attemptColorPick ({:.0}, {:.0})", point.x, point.y);
    }

    fn clear_board(&mut self) {
        println!("  clearBoard");
    }
}

enum Machine {
    Manipulation(ManipulationMachine),
    Whiteboard(WhiteboardMachine),
}

impl Machine {
    fn state(&self) -> InteractionState {
        match self {
            Machine::Manipulation(m) => m.state(),
            Machine::Whiteboard(m) => m.state(),
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("使い方: replay <frames.jsonl> [config.toml] [--whiteboard]");
        bail!("入力ファイルが指定されていません");
    }

    let config = match args.get(2).filter(|a| !a.starts_with("--")) {
        Some(path) => {
            Config::load(path).with_context(|| format!("設定の読み込みに失敗: {}", path))?
        }
        None => Config::default(),
    };
    let whiteboard = args.iter().any(|a| a == "--whiteboard");

    let mut pipeline = GesturePipeline::new(config.clone());
    let mut machine = if whiteboard {
        Machine::Whiteboard(WhiteboardMachine::new(config.machine.clone()))
    } else {
        Machine::Manipulation(ManipulationMachine::new(config.machine.clone()))
    };
    let mut scene = LogScene::new();

    let file =
        File::open(&args[1]).with_context(|| format!("フレームファイルが開けません: {}", &args[1]))?;
    println!(
        "リプレイ開始: {} ({})",
        &args[1],
        if whiteboard {
            "ホワイトボード"
        } else {
            "部品操作"
        }
    );

    let mut frames = 0usize;
    let mut skipped = 0usize;
    for (no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: Frame = serde_json::from_str(&line)
            .with_context(|| format!("{}行目のフレームが壊れています", no + 1))?;

        let Some(set) = pipeline.process_frame(&frame) else {
            skipped += 1;
            continue;
        };
        frames += 1;

        let before = machine.state();
        match &mut machine {
            Machine::Manipulation(m) => m.update(&set, &mut scene),
            Machine::Whiteboard(m) => m.update(&set, &mut scene),
        }
        let after = machine.state();
        if before != after {
            println!("[{:9.1}ms] {:?} -> {:?}", set.timestamp_ms, before, after);
        }
    }

    println!(
        "リプレイ終了: {}フレーム処理, {}フレーム重複スキップ",
        frames, skipped
    );
    println!("最終状態: {:?}", machine.state());
    Ok(())
}
