//! Command-line render driver

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use path_tracing::cameras::Camera;
use path_tracing::imageio;
use path_tracing::objects::HittableList;
use path_tracing::render::{render, RenderConfig};
use path_tracing::scenes::{self, SceneConfig};

/// Monte Carlo path tracer for sphere scenes.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Total samples per pixel, split across a 2x2 subpixel grid.
    samples: Option<usize>,

    /// Scene description in YAML; the built-in box scene when omitted.
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output file; .ppm writes plain text, other extensions go through
    /// the image crate.
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// Override the scene's image width.
    #[arg(long)]
    width: Option<usize>,

    /// Override the scene's image height.
    #[arg(long)]
    height: Option<usize>,

    /// RNG seed; the same seed reproduces the same image.
    #[arg(long, default_value_t = 606418532)]
    seed: u64,

    /// Worker threads; machine parallelism when omitted.
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let scene_config = match &cli.scene {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading scene {}", path.display()))?;
            let config: SceneConfig = serde_yaml::from_str(&text)
                .with_context(|| format!("parsing scene {}", path.display()))?;
            info!("loaded scene {}", path.display());
            config
        }
        None => scenes::cornell_box(),
    };

    let width = cli.width.unwrap_or(scene_config.image.width);
    let height = cli.height.unwrap_or(scene_config.image.height);
    let samples_per_subpixel = cli.samples.map_or(1, |s| (s / 4).max(1));

    let world = Arc::new(HittableList::from_config(scene_config.world));
    let camera = Arc::new(Camera::from_config(&scene_config.camera, width, height));

    let config = RenderConfig {
        width,
        height,
        samples_per_subpixel,
        seed: cli.seed,
        threads: cli.threads,
        progress: true,
    };

    let start = Instant::now();
    let pixels = render(world, camera, &config);
    info!("rendered in {:.2?}", start.elapsed());

    imageio::save(&cli.output, width, height, &pixels)?;
    info!("wrote {}", cli.output.display());
    Ok(())
}
