//! Interactive viewer: raylib window as the frame sink, keyboard as the
//! motion source.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use raycast_renderer::render::textures::procedural;
use raycast_renderer::{
    FireCooldown, Framebuffer, HitscanTarget, MotionInput, RenderResult, Renderer, SceneConfig, Texture, apply_motion, hitscan,
};
use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

/// Command line arguments for the viewer.
#[derive(Parser, Debug)]
#[command(name = "raycast_viewer")]
#[command(about = "Walk around a raycast scene")]
#[command(version)]
struct Args {
    /// Scene file (JSON); the built-in demo scene is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Window pixels per framebuffer pixel
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(args: &Args) -> RenderResult<(SceneConfig, PathBuf)> {
    match &args.scene {
        Some(path) => {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((SceneConfig::from_json_file(path)?, base))
        }
        None => Ok((SceneConfig::demo(), PathBuf::from("."))),
    }
}

fn read_input(rl: &RaylibHandle) -> MotionInput {
    let down = |keys: &[KeyboardKey]| keys.iter().any(|&k| rl.is_key_down(k));
    MotionInput {
        forward: down(&[KeyboardKey::KEY_W, KeyboardKey::KEY_UP]),
        backward: down(&[KeyboardKey::KEY_S, KeyboardKey::KEY_DOWN]),
        strafe_left: down(&[KeyboardKey::KEY_Q]),
        strafe_right: down(&[KeyboardKey::KEY_E]),
        turn_left: down(&[KeyboardKey::KEY_A, KeyboardKey::KEY_LEFT]),
        turn_right: down(&[KeyboardKey::KEY_D, KeyboardKey::KEY_RIGHT]),
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level)).init();

    let (config, base_dir) = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    // Textures and scene are validated here, before the window opens.
    let (mut scene, mut camera, settings) = match config.build(&base_dir) {
        Ok(built) => built,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let mut renderer = match Renderer::new(settings) {
        Ok(r) => r,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let hit_texture: Arc<Texture> = Arc::new(procedural::orb(config.texture_size, raycast_renderer::Color::RED));

    let scale = args.scale.max(1);
    let (window_w, window_h) = (settings.screen_width * scale, settings.render_height * scale);
    let (mut rl, thread) = raylib::init()
        .size(window_w as i32, window_h as i32)
        .title("Raycast Renderer")
        .build();
    rl.set_target_fps(60);

    let mut fb = Framebuffer::new(settings.screen_width, settings.render_height);
    let img = Image::gen_image_color(fb.width as i32, fb.height as i32, Color::BLACK);
    let mut tex = match rl.load_texture_from_image(&thread, &img) {
        Ok(t) => t,
        Err(e) => {
            error!("could not create frame texture: {e}");
            std::process::exit(1);
        }
    };

    let mut trigger = FireCooldown::new(config.motion.fire_cooldown);
    let mut upload_failed = false;

    info!("viewer running at {window_w}x{window_h}");
    while !rl.window_should_close() {
        // Cap dt so a stalled frame does not teleport the camera.
        let dt = (rl.get_frame_time() as f64).min(0.1);
        apply_motion(&mut camera, &scene.grid, &read_input(&rl), &config.motion, dt);
        trigger.tick(dt);

        if rl.is_key_down(KeyboardKey::KEY_LEFT_CONTROL) && trigger.try_fire() {
            match hitscan(&camera, &scene.grid, scene.sprites()) {
                HitscanTarget::Sprite(i) => {
                    info!("hit sprite {i}");
                    scene.set_sprite_texture(i, hit_texture.clone());
                }
                HitscanTarget::Wall(hit) => info!("hit wall tile {} at {:.2}", hit.tile, hit.perp_dist),
                HitscanTarget::Nothing => {}
            }
        }

        let stats = renderer.render(&mut fb, &scene, &camera);
        if let Err(e) = tex.update_texture(&fb.to_rgba_bytes()) {
            if !upload_failed {
                warn!("frame upload failed: {e}");
                upload_failed = true;
            }
        }

        let fps_now = rl.get_fps();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_ex(&tex, Vector2::zero(), 0.0, scale as f32, Color::WHITE);
        d.draw_text(&format!("FPS: {fps_now}"), 10, 10, 20, Color::WHITE);
        d.draw_text(&format!("sprites: {}", stats.sprites_drawn), 10, 34, 20, Color::WHITE);
        if !trigger.is_ready() {
            d.draw_text("reloading", 10, 58, 20, Color::GRAY);
        }
    }
    info!("viewer closed");
}
