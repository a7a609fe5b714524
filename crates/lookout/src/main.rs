use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod gallery;
mod journal;
mod watch;

use config::Config;

#[derive(Parser)]
#[command(name = "lookout", about = "Live face recognition watcher")]
struct Cli {
    /// Root directory of labeled face folders (one subfolder per person)
    faces_dir: Option<PathBuf>,

    /// V4L2 camera device path
    #[arg(long)]
    device: Option<String>,

    /// Maximum encoding distance for a positive match
    #[arg(long)]
    threshold: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(faces_dir) = cli.faces_dir {
        config.faces_dir = faces_dir;
    }
    if let Some(device) = cli.device {
        config.camera_device = device;
    }
    if let Some(threshold) = cli.threshold {
        config.match_distance = threshold;
    }

    tracing::info!(
        faces = %config.faces_dir.display(),
        device = %config.camera_device,
        "lookout starting"
    );

    let mut engine =
        lookout_core::FaceEngine::load(&config.scrfd_model_path(), &config.arcface_model_path())?;

    // The gallery must load — and be non-empty — before any camera resource
    // is touched.
    let references = gallery::load(&config.faces_dir, config::RESERVED_LOG_DIR, &mut engine)?;

    let mut journal = journal::Journal::open(&config.log_dir(), config.cooldown_secs)?;

    let camera = lookout_hw::Camera::open(&config.camera_device)?;
    let window = display::Window::open()?;

    watch::run(
        &camera,
        &window,
        &mut engine,
        &references,
        config.match_distance,
        &mut journal,
    )?;

    drop(window);
    drop(camera);

    tracing::info!(
        text_log = %journal.text_path().display(),
        csv_log = %journal.csv_path().display(),
        "sighting logs saved"
    );

    Ok(())
}
