//! Headless frame sink: renders one frame of a scene to a PNG.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info};
use raycast_renderer::{
    Camera, Framebuffer, HitscanTarget, MotionInput, RenderResult, Renderer, SceneConfig, apply_motion, hitscan,
};

/// Command line arguments for the snapshot tool.
#[derive(Parser, Debug)]
#[command(name = "raycast_snapshot")]
#[command(about = "Render a single raycast frame to a PNG file")]
#[command(version)]
struct Args {
    /// Scene file (JSON); the built-in demo scene is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "frame.png")]
    out: PathBuf,

    /// Override the frame width in columns
    #[arg(long)]
    width: Option<u32>,

    /// Override the 3D view height in rows
    #[arg(long)]
    height: Option<u32>,

    /// Turn the camera by this many degrees before rendering (positive = right)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    turn: f64,

    /// Horizontal field of view in degrees; overrides the scene's plane length
    #[arg(long)]
    fov: Option<f64>,

    /// Walk forward for this many seconds before rendering
    #[arg(long, default_value_t = 0.0)]
    walk: f64,

    /// Write the effective scene configuration as JSON and exit
    #[arg(long)]
    dump_scene: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level)).init();

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> RenderResult<()> {
    let (mut config, base_dir) = match &args.scene {
        Some(path) => {
            info!("loading scene {}", path.display());
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (SceneConfig::from_json_file(path)?, base)
        }
        None => {
            info!("no scene given, using the demo scene");
            (SceneConfig::demo(), PathBuf::from("."))
        }
    };
    if let Some(w) = args.width {
        config.render.screen_width = w;
    }
    if let Some(h) = args.height {
        config.render.render_height = h;
    }

    if let Some(path) = &args.dump_scene {
        std::fs::write(path, config.to_json_pretty()?)?;
        info!("wrote scene to {}", path.display());
        return Ok(());
    }

    let (scene, mut camera, settings) = config.build(&base_dir)?;

    if let Some(fov) = args.fov {
        camera = Camera::with_fov_degrees(camera.pos, camera.dir(), fov)?;
    }
    camera.rotate(args.turn.to_radians());
    if args.walk > 0.0 {
        // Fixed 60 Hz ticks so the result does not depend on frame timing.
        let input = MotionInput { forward: true, ..Default::default() };
        let dt = 1.0 / 60.0;
        let ticks = (args.walk / dt).round() as u32;
        for _ in 0..ticks {
            apply_motion(&mut camera, &scene.grid, &input, &config.motion, dt);
        }
    }
    info!("camera at {} facing {}", camera.pos, camera.dir());

    match hitscan(&camera, &scene.grid, scene.sprites()) {
        HitscanTarget::Sprite(i) => info!("crosshair on sprite {i}"),
        HitscanTarget::Wall(hit) => info!("crosshair on tile {} at {:.2}", hit.tile, hit.perp_dist),
        HitscanTarget::Nothing => info!("crosshair on nothing"),
    }

    let mut renderer = Renderer::new(settings)?;
    let mut fb = Framebuffer::new(settings.screen_width, settings.render_height);
    let stats = renderer.render(&mut fb, &scene, &camera);
    info!(
        "rendered {}x{}: {} wall columns, {} sprites",
        fb.width, fb.height, stats.columns_hit, stats.sprites_drawn
    );

    image::save_buffer(&args.out, &fb.to_rgba_bytes(), fb.width, fb.height, image::ColorType::Rgba8)?;
    info!("wrote {}", args.out.display());
    Ok(())
}
