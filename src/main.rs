//! Facial feature tracking with expression analysis from a webcam or video file.

use anyhow::Result;
use clap::Parser;
use face_expression_tracker::{app::CaptureLoop, config::Config};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Video file to process
    #[arg(short, long)]
    video: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Do not mirror frames horizontally
    #[arg(long)]
    no_mirror: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Facial Feature Tracking with Expression Analysis");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(cam) = args.cam {
        config.capture.camera_index = cam;
        config.capture.video_file = None;
    }
    if let Some(video) = args.video {
        config.capture.video_file = Some(video);
    }
    if args.no_mirror {
        config.capture.mirror = false;
    }

    config.validate()?;
    if let Err(e) = config.validate_models() {
        warn!("{}", e);
    }

    let mut capture_loop = CaptureLoop::from_config(&config)?;
    capture_loop.run()?;

    info!("Application shutting down");
    Ok(())
}
