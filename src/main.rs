//! kagura デモ
//!
//! 固定フレームレートでシーンを再生し、毎フレームを出力する:
//! - シーン指定なし: 隣り合う2つの円が右へ移動しながら緑に変わる
//! - `<scene.json>`: シーン文書（`demos/neighbour.json` 参照）
//! - `--json`: ログの代わりに1フレーム1行のJSONを出力
//! - `--fps <n>`: 擬似クロックのフレームレート（既定 60）
//!
//! ログレベルは `RUST_LOG` に従う（既定 `info`）。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use kagura::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// シーンが収束しない場合の擬似フレーム数上限
const MAX_FRAMES: u64 = 100_000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of a scene document (JSON); the built-in scene when omitted
    scene: Option<PathBuf>,

    /// Print every frame as a JSON line
    #[arg(long)]
    json: bool,

    /// Frames per second of the simulated clock
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
}

/// 組み込みシーン: 円A（赤）の下に円B（青）、1秒かけて x=100 へ移動し緑になる
fn neighbour_scene() -> Result<Stage> {
    let mut stage = Stage::new();
    let a = Shape::circle(0.0, 0.0, 50.0)
        .add_to(&mut stage)
        .attr("fillColor", "red")?
        .id();
    let b = Shape::circle(0.0, 50.0, 50.0)
        .add_to(&mut stage)
        .attr("fillColor", "blue")?
        .id();

    let slide = Animation::builder()
        .duration("1s")
        .to("x", 100.0)
        .to("fillColor", "green")
        .build()?;
    let slide = stage.animate(slide)?;
    stage.add_subjects(slide, [a, b])?;
    stage.play(slide)?;
    Ok(stage)
}

fn load_scene(path: &Path) -> Result<Stage> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: SceneDocument = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    match document.load() {
        Ok(scene) => {
            debug!(
                shapes = ?scene.shapes.keys().collect::<Vec<_>>(),
                animations = ?scene.animations.keys().collect::<Vec<_>>(),
                "[Demo] Scene loaded"
            );
            Ok(scene.stage)
        }
        Err(errors) => {
            for error in &errors {
                tracing::error!(%error, "[Demo] Invalid scene");
            }
            bail!("{} error(s) in {}", errors.len(), path.display())
        }
    }
}

/// フレームごと・シェイプごとに1行ログを出す
struct LogSink;

impl FrameSink for LogSink {
    fn present(&mut self, frame: &Frame) {
        for shape in &frame.shapes {
            info!(
                frame = frame.number,
                elapsed_ms = frame.elapsed.as_millis() as u64,
                shape = %shape.id,
                kind = %shape.kind,
                x = shape.placement.position.x,
                y = shape.placement.position.y,
                fill = %shape.style.fill,
                "[Frame]"
            );
        }
    }
}

/// 各フレームをJSON 1行で出力
struct JsonSink;

impl FrameSink for JsonSink {
    fn present(&mut self, frame: &Frame) {
        match serde_json::to_string(frame) {
            Ok(line) => println!("{}", line),
            Err(error) => tracing::error!(%error, "[Demo] Frame serialization failed"),
        }
    }
}

fn play(stage: &mut Stage, step: Duration, sink: &mut impl FrameSink) -> u64 {
    stage.render(sink);
    let mut frames = 0;
    while stage.is_animating() && frames < MAX_FRAMES {
        stage.tick(step);
        stage.render(sink);
        frames += 1;
    }
    frames
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(?args, "[Demo] Arguments");

    let mut stage = match &args.scene {
        Some(path) => load_scene(path)?,
        None => neighbour_scene()?,
    };

    let step = Duration::from_secs(1) / args.fps;
    let frames = if args.json {
        play(&mut stage, step, &mut JsonSink)
    } else {
        play(&mut stage, step, &mut LogSink)
    };

    let clock = stage.clock();
    info!(
        frames,
        elapsed_ms = clock.elapsed.as_millis() as u64,
        "[Demo] Finished"
    );
    Ok(())
}
