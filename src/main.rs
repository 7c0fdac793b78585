//! wavedeck — hands-free radial menu overlay.
//!
//! Hand-landmark frames drive a dwell-activated marking menu and value
//! sliders synchronized with an external presentation controller. Without
//! a detector attached the binary runs headless, optionally replaying the
//! scripted demo hand.

mod activation;
mod config;
mod dwell;
mod frame;
mod geometry;
mod hand;
mod link;
mod menu;
mod scene;
mod sim;
mod slider;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use clap::Parser;
use tracing::{debug, info};

use crate::config::UiConfig;
use crate::frame::{FrameContext, FrameEvent};
use crate::hand::landmarks::HandFrame;
use crate::link::channel::ControllerLink;
use crate::menu::model::MenuDef;
use crate::scene::{build_scene, IconCache};
use crate::sim::ScriptedHand;

#[derive(Parser, Debug)]
#[command(name = "wavedeck", about = "Gesture-driven radial menu overlay")]
struct Cli {
    /// Presentation controller address (host:port); offline simulation if
    /// absent
    #[arg(long)]
    controller: Option<String>,

    /// Menu definition JSON file (built-in menu if absent)
    #[arg(long)]
    menu: Option<PathBuf>,

    /// Directory holding <label>.png item icons
    #[arg(long, default_value = "images/label-icons")]
    icons: PathBuf,

    /// Replay the scripted demo hand instead of idling
    #[arg(long)]
    demo: bool,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Grow (+) or shrink (-) the menu radius by whole steps (debug)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    radius_steps: f64,

    /// Exit after N seconds (headless testing)
    #[arg(long)]
    exit_after: Option<u64>,
}

/// Nominal camera frame cadence.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
/// Offline playback clock cadence (~30 Hz).
const PLAYBACK_INTERVAL: Duration = Duration::from_millis(33);

struct App {
    ctx: FrameContext,
    icons: IconCache,
    script: Option<ScriptedHand>,
    started: Instant,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavedeck=info".into()),
        )
        .init();

    info!("wavedeck v{} starting", env!("CARGO_PKG_VERSION"));

    let menu = match &cli.menu {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading menu definition {}", path.display()))?;
            MenuDef::from_json(&json)
                .with_context(|| format!("parsing menu definition {}", path.display()))?
        }
        None => MenuDef::builtin(),
    };
    info!(items = menu.items.len(), depth = menu.depth(), "menu loaded");

    let link = match &cli.controller {
        Some(address) => ControllerLink::connect(address),
        None => ControllerLink::offline(),
    };
    info!(mode = ?link.mode(), "controller link ready");

    let mut config = UiConfig::default();
    config.resize_canvas(cli.width, cli.height);
    config.geometry.resize(cli.radius_steps);

    let mut app = App {
        ctx: FrameContext::new(config, menu, link),
        icons: IconCache::new(&cli.icons),
        script: cli.demo.then(ScriptedHand::new),
        started: Instant::now(),
    };

    let mut event_loop: EventLoop<App> = EventLoop::try_new().context("creating event loop")?;
    let handle = event_loop.handle();

    handle
        .insert_source(Timer::from_duration(FRAME_INTERVAL), |_, _, app: &mut App| {
            let now_ms = app.started.elapsed().as_secs_f64() * 1000.0;
            let hand = match &app.script {
                Some(script) => script.frame(now_ms),
                None => HandFrame::empty(),
            };
            let snapshot = app.ctx.process_frame(&hand, now_ms);
            log_events(&snapshot.events);

            let center = app.ctx.config.geometry.center;
            let commands = build_scene(&snapshot, &mut app.icons, (center.x, center.y));
            debug!(
                commands = commands.len(),
                unlocked = snapshot.unlocked,
                alpha = snapshot.menu_alpha,
                "frame"
            );

            TimeoutAction::ToDuration(FRAME_INTERVAL)
        })
        .map_err(|e| anyhow::anyhow!("inserting frame timer: {e}"))?;

    handle
        .insert_source(
            Timer::from_duration(PLAYBACK_INTERVAL),
            |_, _, app: &mut App| {
                app.ctx.link.tick_playback(PLAYBACK_INTERVAL.as_secs_f64());
                TimeoutAction::ToDuration(PLAYBACK_INTERVAL)
            },
        )
        .map_err(|e| anyhow::anyhow!("inserting playback timer: {e}"))?;

    if let Some(seconds) = cli.exit_after {
        let signal = event_loop.get_signal();
        handle
            .insert_source(
                Timer::from_duration(Duration::from_secs(seconds)),
                move |_, _, _: &mut App| {
                    signal.stop();
                    TimeoutAction::Drop
                },
            )
            .map_err(|e| anyhow::anyhow!("inserting exit timer: {e}"))?;
    }

    event_loop
        .run(None, &mut app, |_| {})
        .context("running event loop")?;

    info!("wavedeck stopped");
    Ok(())
}

fn log_events(events: &[FrameEvent]) {
    for event in events {
        match event {
            FrameEvent::Unlocked => info!("menu unlocked"),
            FrameEvent::Locked => info!("menu locked"),
            FrameEvent::SelectionConfirmed { level, label } => {
                info!(level, %label, "selection confirmed")
            }
            FrameEvent::ActionDispatched { name } => info!(%name, "action dispatched"),
            FrameEvent::SliderOpened { target } => {
                info!(target = target.as_str(), "slider opened")
            }
        }
    }
}
