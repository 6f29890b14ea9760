use anyhow::{Context, Result};
use clap::Parser;
use cloak::capture::{self, WebcamCapture};
use cloak::output::{FanoutSink, LoopbackOutput, WindowDisplay};
use cloak::session::{Session, StopHandle};
use cloak::SessionConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Invisibility cloak for your webcam", long_about = None)]
struct Args {
    /// Color of the cloak (red, blue or green; anything else falls back to red)
    #[arg(short, long, default_value = "red")]
    color: String,

    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Capture resolution width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Capture resolution height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Frames discarded while the camera's auto-exposure settles
    #[arg(long, default_value_t = 30)]
    warmup_frames: u32,

    /// Seconds to wait before capturing the background
    #[arg(long, default_value_t = 5)]
    countdown: u32,

    /// Also write the cloaked stream to this v4l2loopback device
    #[arg(long)]
    loopback: Option<String>,

    /// List available cameras and exit
    #[arg(long)]
    list_devices: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    if args.list_devices {
        return capture::list_devices();
    }

    let config = SessionConfig {
        device_index: args.input_device,
        width: args.width,
        height: args.height,
        warmup_frames: args.warmup_frames,
        countdown_secs: args.countdown,
        ..SessionConfig::default()
    };

    tracing::info!("Cloak starting");
    tracing::info!("Capture: {}x{}", config.width, config.height);
    tracing::info!("Prepare for background capture in {} seconds...", config.countdown_secs);

    let mut display = FanoutSink::new();
    display.push(Box::new(WindowDisplay::new()));
    if let Some(path) = &args.loopback {
        let loopback = LoopbackOutput::new(path, config.width, config.height)
            .context("Failed to initialize v4l2loopback output")?;
        let (width, height) = loopback.resolution();
        tracing::info!("Writing cloaked stream to {} at {}x{}", path, width, height);
        display.push(Box::new(loopback));
    }

    tracing::info!("Press 'q' in a preview window to quit");

    let mut session = Session::new(config, args.color, StopHandle::new());
    session
        .run(
            |cfg| WebcamCapture::new(cfg.device_index, cfg.width, cfg.height),
            &mut display,
        )
        .context("Cloak session failed")?;

    Ok(())
}
