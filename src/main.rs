use bevy_ecs::prelude::World;
use folio_room::assets::GltfRoomLoader;
use folio_room::camera::Camera3D;
use folio_room::cli::CliOverrides;
use folio_room::config::PortfolioConfig;
use folio_room::input::UiEvent;
use folio_room::room::TextSlot;
use folio_room::{FrameSink, Portfolio};
use log::{debug, info, warn};

const DEFAULT_CONFIG: &str = "config/portfolio.json";
const DEFAULT_STEP: f32 = 1.0 / 60.0;

/// Headless stand-in for the renderer: counts frames and traces the camera.
#[derive(Default)]
struct TraceSink {
    frames: u64,
}

impl FrameSink for TraceSink {
    fn render(&mut self, _world: &World, camera: &Camera3D) {
        self.frames += 1;
        if self.frames % 30 == 0 {
            debug!("[frame] #{} camera at {:?}", self.frames, camera.pose.position);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    let config_path = cli.config_path().cloned().unwrap_or_else(|| DEFAULT_CONFIG.into());
    let step = cli.step().unwrap_or(DEFAULT_STEP);
    let overrides = cli.into_config_overrides();

    let mut config = PortfolioConfig::load_or_default(&config_path);
    if !overrides.is_empty() {
        info!("[cli] Applying overrides: {}", overrides.applied_fields().join(", "));
        config.apply_overrides(&overrides);
    }

    let mut portfolio = Portfolio::new(&config);
    if let Err(err) = portfolio.load_room(&GltfRoomLoader) {
        warn!("[main] Continuing without the room model: {err:#}");
    }
    portfolio.attach_intro_text(TextSlot::Title);
    portfolio.attach_intro_text(TextSlot::Subtitle);

    let walkthrough = [
        ("about-menu", 3.5),
        ("close-btn", 2.0),
        ("projects-menu", 3.0),
        ("design-menu", 3.0),
        ("cv-menu", 2.0),
        ("close-btn", 2.0),
    ];
    let mut sink = TraceSink::default();
    for (element, hold) in walkthrough {
        info!("[main] Click '{element}'");
        portfolio.handle_event(UiEvent::MenuClick(element.to_string()));
        run_for(&mut portfolio, &mut sink, hold, step);
    }
    portfolio.toggle_theme();
    run_for(&mut portfolio, &mut sink, 1.0, step);
    info!(
        "[main] Walkthrough finished after {} frames; theme {}, camera {:?}.",
        sink.frames,
        portfolio.theme(),
        portfolio.camera_pose().map(|pose| pose.position)
    );
}

fn run_for(portfolio: &mut Portfolio, sink: &mut TraceSink, seconds: f32, step: f32) {
    let frames = (seconds / step).ceil() as u32;
    for _ in 0..frames {
        portfolio.frame(step, Some(&mut *sink));
        for event in portfolio.drain_events() {
            info!("[event] {event}");
        }
    }
}
