use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tileview_lib::{PreviewScene, Settings, load_catalog};

#[derive(Parser)]
#[command(name = "tileview")]
#[command(about = "Headless preview of an outfit walking and idling with its marks overlay")]
#[command(version)]
struct Cli {
    /// Settings file, created with defaults if missing
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Appearance catalog
    #[arg(short, long, default_value = "assets/catalog.toml")]
    catalog: PathBuf,

    /// Outfit id, overrides the settings
    #[arg(short, long)]
    outfit: Option<u32>,

    /// Add-on mask, overrides the settings
    #[arg(short, long)]
    addons: Option<u32>,

    /// Frames to render, the first half walking
    #[arg(short, long, default_value_t = 40)]
    frames: u32,

    /// Mark color code drawn on every registered band
    #[arg(short, long)]
    mark: Option<u8>,
}

fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load(&settings_path);
    if let Some(outfit) = cli.outfit {
        settings.preview.outfit = outfit;
    }
    if let Some(addons) = cli.addons {
        settings.preview.addons = addons;
    }

    let storage = load_catalog(&cli.catalog)?;
    let mut scene = PreviewScene::new(&settings, &storage)?;
    if let Some(color) = cli.mark {
        for band in &settings.view.marks.bands {
            scene.set_mark(band.mark_type, color);
        }
    }

    let walk_frames = cli.frames / 2;
    scene.set_walking(walk_frames > 0);
    for frame in 0..cli.frames {
        if frame == walk_frames {
            scene.set_walking(false);
        }
        let stats = scene.frame();
        info!(
            "frame {:>3} tick {:>5} phase {} instances {} draw calls {} marks {} loaded {}",
            frame,
            stats.ticks,
            stats.phase,
            stats.instances,
            stats.draw_calls,
            stats.marks,
            stats.loaded
        );
    }

    Ok(())
}
