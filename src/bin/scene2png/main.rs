// scene2png - Render the weather scene headlessly
//
// Runs the scene for N frames and writes the last frame to a PNG.
//
// Usage: cargo run --bin scene2png -- out.png [--width N] [--height N] [--frames N]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use weather_engine::{Controls, Encoder, Rgba, Scene, SceneConfig};

#[derive(Parser, Debug)]
#[command(name = "scene2png", about = "Render the weather scene to a PNG")]
struct Args {
    /// Output PNG path
    output: PathBuf,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Frames to simulate before capturing
    #[arg(long, default_value_t = 120)]
    frames: u32,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Scene config JSON file (partial configs are filled with defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Controls JSON file
    #[arg(long)]
    controls: Option<PathBuf>,

    /// Pointer position in px; defaults to the canvas center
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    pointer: Option<Vec<f32>>,

    /// Trigger an aura pulse this many frames before the capture
    #[arg(long)]
    pulse_before: Option<u32>,
}

fn read_json(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SceneConfig::from_json(&read_json(path)?).context("parsing scene config")?,
        None => SceneConfig::default(),
    };
    let background: Rgba = config.background.parse().context("parsing background color")?;

    let mut scene = Scene::new(config, args.width, args.height, args.seed).context("building scene")?;

    if let Some(path) = &args.controls {
        let controls = Controls::from_json(&read_json(path)?).context("parsing controls")?;
        scene.set_controls(controls);
    }

    let (px, py) = match args.pointer.as_deref() {
        Some([x, y]) => (*x, *y),
        _ => (args.width as f32 / 2.0, args.height as f32 / 2.0),
    };
    scene.set_pointer(px, py);

    let pulse_at = args.pulse_before.map(|n| args.frames.saturating_sub(n));
    for frame in 0..args.frames {
        if pulse_at == Some(frame) {
            scene.trigger_pulse();
        }
        scene.tick();
    }

    let mut out = Encoder::new(args.width, args.height, background);
    scene.flush(&mut out);

    image::save_buffer(&args.output, out.pixels(), out.width(), out.height(), image::ColorType::Rgba8)
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!(
        "wrote {} after {} frames ({} drops, {} splashes)",
        args.output.display(),
        scene.frame_count(),
        scene.drops().len(),
        scene.splashes().len(),
    );
    Ok(())
}
