use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber;

use reel_compositor::{
    assets::{AssetBundle, VisualLoader},
    composition::CompositionEngine,
    config::Config,
};

#[derive(Parser)]
#[command(
    name = "reel-compositor",
    version,
    about = "Assemble narrated short-form slideshow videos",
    long_about = "Reel-Compositor renders a short-form video from a narration track, an optional intro clip or thumbnail, and a directory of slide images, synchronized on a fixed timeline and encoded to MP4."
)]
struct Cli {
    /// Narration audio file (WAV, MP3, FLAC, OGG, M4A, AAC)
    #[arg(short, long)]
    audio: PathBuf,

    /// Directory containing slide images, ordered by file name
    #[arg(short, long)]
    slides: Option<PathBuf>,

    /// Intro video clip shown during the first six seconds
    #[arg(long)]
    intro: Option<PathBuf>,

    /// Fallback thumbnail shown when no intro clip is available
    #[arg(long)]
    thumbnail: Option<PathBuf>,

    /// Output video file path
    #[arg(short, long)]
    output: PathBuf,

    /// Render 720x1280 portrait output instead of 1280x720 landscape
    #[arg(long)]
    vertical: bool,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Reel-Compositor v{}", env!("CARGO_PKG_VERSION"));
    info!("Audio: {:?}", cli.audio);
    info!("Output: {:?}", cli.output);

    // Load configuration
    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    let slides = match &cli.slides {
        Some(dir) => collect_slides(dir)?,
        None => vec![],
    };
    if slides.is_empty() {
        warn!("No slides found; the slideshow phase will render black");
    }

    let bundle = AssetBundle {
        audio: Some(cli.audio),
        intro_video: cli.intro,
        thumbnail: cli.thumbnail,
        slides,
        vertical: cli.vertical,
    };

    let engine = CompositionEngine::new(config);

    info!("Starting composition process...");
    let output = engine.render(&bundle, |msg| info!("{}", msg)).await?;

    std::fs::write(&cli.output, &output.data)?;

    info!(
        "Composition complete! {:.1}s / {} frames saved to: {:?}",
        output.duration, output.frame_count, cli.output
    );
    Ok(())
}

/// Collect slide images from a directory, ordered by file name
fn collect_slides(dir: &PathBuf) -> Result<Vec<PathBuf>> {
    let mut slides: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && VisualLoader::is_image_file(path))
        .collect();

    slides.sort();

    info!("Found {} slides in {:?}", slides.len(), dir);
    Ok(slides)
}
