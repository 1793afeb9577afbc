//! # Trellis - Window Management Core
//!
//! Runs the policy core against the headless backend: a set of in-memory
//! demo views is mapped and tiled, a synthetic pointer sweeps across the
//! output and frames are composed on the CPU until Ctrl-C or a frame limit.
//! The last frame can be written out as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use trellis::backend::headless::{HeadlessCursor, HeadlessShell};
use trellis::backend::pixmap::PixmapRenderer;
use trellis::backend::Color;
use trellis::{Compositor, Point, Tiling, TrellisConfig};

/// Fill colours handed out to demo views in turn.
const DEMO_COLORS: [Color; 4] = [
    Color::rgb(0x25, 0x63, 0xEB),
    Color::rgb(0x16, 0xA3, 0x4A),
    Color::rgb(0xDC, 0x26, 0x26),
    Color::rgb(0xCA, 0x8A, 0x04),
];

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Tiling window-management core running on a headless backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/trellis/trellis.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Stop after this many frames (default: run until Ctrl-C)
    #[arg(long)]
    frames: Option<u64>,

    /// Write the last frame to this PNG file
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Override the tiling strategy: right-then-down, two-thirds-sidebar, even-vertically
    #[arg(long)]
    tiling: Option<String>,

    /// Number of in-memory demo views to map
    #[arg(long, default_value_t = 3)]
    demo_views: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = TrellisConfig::load(&cli.config);
    let debug = cli.debug || loaded.as_ref().map_or(false, |c| c.general.debug);

    // Initialize logging
    let filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    info!("🚀 Starting Trellis");
    info!("📄 Version: {}", trellis::VERSION);

    let mut config = match loaded {
        Ok(config) => {
            info!("✅ Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            info!("📝 Using default configuration");
            TrellisConfig::default()
        }
    };

    // Override config with CLI flags
    if let Some(tiling) = &cli.tiling {
        config.window.tiling = tiling.parse::<Tiling>()?;
        info!("🧱 Tiling strategy set to {} via CLI flag", config.window.tiling.name());
    }

    let size = Point::new(config.output.width, config.output.height);
    let mut renderer = PixmapRenderer::new(size, config.font.metrics())
        .context("Failed to create the frame target")?;
    let fps = config.general.fps();
    let mut compositor = Compositor::new(config, HeadlessShell::new(), HeadlessCursor::new());

    for i in 0..cli.demo_views {
        let view_size = Point::new(320, 200);
        let texture = renderer.upload_solid(view_size, DEMO_COLORS[i % DEMO_COLORS.len()])?;
        let shell = compositor.shell_mut();
        let surface = shell.create_surface(view_size);
        shell.set_texture(surface, texture);
        compositor.map_view(surface, &format!("demo {}", i + 1));
    }
    compositor.tile();

    info!("✨ Trellis is ready with {} views", compositor.views().len());

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let start = Instant::now();

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("📨 Received Ctrl+C, shutting down gracefully");
                break;
            }
            _ = ticker.tick() => {
                let time = u32::try_from(start.elapsed().as_millis()).unwrap_or(u32::MAX);
                let frame = compositor.frames() as i64;
                let sweep = Point::new(
                    (frame * 7 % i64::from(size.x.max(1))) as f64,
                    (frame * 5 % i64::from(size.y.max(1))) as f64,
                );
                compositor.cursor_mut().warp_to(sweep);
                compositor.on_pointer_motion(time);
                compositor.on_frame(&mut renderer, time);

                if cli.frames.map_or(false, |limit| compositor.frames() >= limit) {
                    info!("🎬 Rendered {} frames", compositor.frames());
                    break;
                }
            }
        }
    }

    if let Some(path) = &cli.screenshot {
        renderer
            .save_png(path)
            .with_context(|| format!("Failed to save screenshot to {}", path.display()))?;
        info!("📸 Saved screenshot: {}", path.display());
    }

    info!("👋 Trellis shutting down");
    Ok(())
}
