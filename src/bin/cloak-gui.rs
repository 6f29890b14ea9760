use anyhow::{anyhow, Result};
use clap::Parser;
use cloak::capture::{CaptureSource, WebcamCapture};
use cloak::color::CloakColor;
use cloak::output::{DisplaySink, WindowDisplay};
use cloak::panel::{Panel, PanelAction, PANEL_HEIGHT, PANEL_WIDTH};
use cloak::session::{CameraFactory, CloakController, DisplayFactory};
use cloak::SessionConfig;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::sync::Arc;
use std::time::Duration;

const PANEL_TITLE: &str = "Cloak Control";
const PANEL_TICK: Duration = Duration::from_millis(30);

#[derive(Parser, Debug)]
#[command(author, version, about = "Invisibility cloak control panel", long_about = None)]
struct Args {
    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Capture resolution width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Capture resolution height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn key_action(key: Key) -> Option<PanelAction> {
    match key {
        Key::Key1 => Some(PanelAction::SelectColor(CloakColor::Red)),
        Key::Key2 => Some(PanelAction::SelectColor(CloakColor::Blue)),
        Key::Key3 => Some(PanelAction::SelectColor(CloakColor::Green)),
        Key::Enter | Key::S => Some(PanelAction::Start),
        Key::Escape | Key::X => Some(PanelAction::Stop),
        _ => None,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = SessionConfig {
        device_index: args.input_device,
        width: args.width,
        height: args.height,
        ..SessionConfig::default()
    };

    let open_camera: CameraFactory = Arc::new(|cfg: &SessionConfig| {
        WebcamCapture::new(cfg.device_index, cfg.width, cfg.height)
            .map(|camera| Box::new(camera) as Box<dyn CaptureSource>)
    });
    let open_display: DisplayFactory =
        Arc::new(|| Ok(Box::new(WindowDisplay::new()) as Box<dyn DisplaySink>));

    let mut controller = CloakController::new(config, open_camera, open_display);
    let mut panel = Panel::new();

    let mut window = Window::new(PANEL_TITLE, PANEL_WIDTH, PANEL_HEIGHT, WindowOptions::default())
        .map_err(|e| anyhow!("Failed to open control panel: {}", e))?;
    let mut buffer = vec![0u32; PANEL_WIDTH * PANEL_HEIGHT];
    let mut mouse_was_down = false;
    let mut title = String::new();

    tracing::info!("Control panel ready: 1/2/3 pick a color, Enter starts, Esc stops");

    while window.is_open() {
        controller.poll();
        let active = controller.is_active();

        let mut actions: Vec<PanelAction> = window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(key_action)
            .collect();

        let mouse_down = window.get_mouse_down(MouseButton::Left);
        if mouse_down && !mouse_was_down {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Discard) {
                actions.extend(panel.hit(x as usize, y as usize, active));
            }
        }
        mouse_was_down = mouse_down;

        for action in actions {
            match action {
                PanelAction::SelectColor(color) if !active => panel.select(color),
                PanelAction::Start if !active => {
                    controller.start(panel.selected().name());
                }
                PanelAction::Stop => controller.stop(),
                _ => {}
            }
        }

        let next_title = format!(
            "{} - {} - {}",
            PANEL_TITLE,
            panel.selected().label(),
            controller.status()
        );
        if next_title != title {
            window.set_title(&next_title);
            title = next_title;
        }

        panel.render(&mut buffer, controller.is_active(), controller.phase());
        window
            .update_with_buffer(&buffer, PANEL_WIDTH, PANEL_HEIGHT)
            .map_err(|e| anyhow!("Failed to update control panel: {}", e))?;

        std::thread::sleep(PANEL_TICK);
    }

    tracing::info!("Control panel closed");
    controller.shutdown();
    Ok(())
}
