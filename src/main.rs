use std::any::Any;
use std::env;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use globe_viewer::scene::Surface;
use globe_viewer::{GlobeConfig, GlobeScene, GlobeViewer};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let config = match &options.config {
        Some(path) => {
            let xml = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path}"))?;
            GlobeConfig::from_xml(&xml)
                .with_context(|| format!("failed to parse config {path}"))?
        }
        None => GlobeConfig::default(),
    };

    let scene = GlobeScene::build(&config).context("failed to build the globe scene")?;
    print_scene_summary(&scene, &config);

    if options.summary_only {
        return Ok(());
    }

    match run_interactive(config) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.downcast_ref::<MountError>().is_some() {
                eprintln!(
                    "{err}. Nothing was mounted; only the summary above was produced \
                     (set DISPLAY to enable rendering, or pass --summary-only)."
                );
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

fn run_interactive(config: GlobeConfig) -> Result<()> {
    // winit aborts with a panic when no display backend exists; trap it so
    // the bootstrap boundary reports a single mount error instead.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let mut event_loop =
        event_loop.map_err(|panic| MountError::from_panic("event loop", panic))?;

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Globe Viewer")
            .with_inner_size(LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)
            .map_err(|err| MountError::from_error("window", err))?,
    );

    let mut viewer = GlobeViewer::new(config, window)?;
    let mut last_error: Option<anyhow::Error> = None;

    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        if let Err(err) = viewer.process_event(&event, control_flow) {
            last_error = Some(err);
            control_flow.set_exit();
        }
    });

    match last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn print_scene_summary(scene: &GlobeScene, config: &GlobeConfig) {
    println!("Globe scene with 3 shells:");
    for node in scene.draw_order() {
        let surface = match &node.surface {
            Surface::Flat { color } => format!(
                "flat color ({:.2}, {:.2}, {:.2})",
                color.x, color.y, color.z
            ),
            Surface::Textured {
                transparent: true, ..
            } => "textured overlay".to_string(),
            Surface::Textured { .. } => "textured backdrop".to_string(),
        };
        println!(
            " - {} (radius {:.3}, {} segments, {})",
            node.name, node.radius, node.segments, surface
        );
    }
    println!(
        "Camera: fov {:.1} deg at ({:.2}, {:.2}, {:.2})",
        config.camera.fov,
        config.camera.position.x,
        config.camera.position.y,
        config.camera.position.z
    );
    println!(
        "Motion: spin {} rad/frame, drag divisor {}, resize debounce {} ms",
        config.motion.spin, config.motion.drag_divisor, config.motion.debounce_ms
    );
}

/// The one user-facing failure: the viewer could not be mounted.
#[derive(Debug, Error)]
#[error("failed to mount the viewer ({target}): {reason}")]
struct MountError {
    target: &'static str,
    reason: String,
}

impl MountError {
    fn from_panic(target: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            target,
            reason: panic_message(panic),
        }
    }

    fn from_error(target: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            target,
            reason: err.to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

struct CliOptions {
    config: Option<String>,
    summary_only: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut config = None;
        let mut summary_only = false;
        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--summary-only" => summary_only = true,
                other if other.starts_with('-') => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: globe-viewer [globe.xml] [--summary-only]"
                    ));
                }
                path => {
                    if config.is_some() {
                        return Err(anyhow!("only one config file may be given"));
                    }
                    config = Some(path.to_string());
                }
            }
        }
        Ok(Self {
            config,
            summary_only,
        })
    }
}
