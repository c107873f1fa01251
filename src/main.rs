use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::info;

use renderer_core::config::parse_size;
use renderer_core::{
    check_all, print_summary, shader_source, Camera, ControlSettings, FrameRing, FrameSummary,
    FrameUniforms, InputState, MouseButton, RuntimeConfig, SceneDescription,
};

const USAGE: &str = "Usage: renderer-core <scene.xml> [--size WxH] [--drag DX,DY] \
                     [--scroll STEPS] [--wgsl] [--json]";

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let config = RuntimeConfig::from_env();
    if config.validate_layout {
        check_all().context("uniform layout does not match WGSL rules")?;
    }

    let xml = fs::read_to_string(&options.path)
        .with_context(|| format!("failed to read scene {}", options.path))?;
    let scene = SceneDescription::from_xml(&xml).context("failed to parse scene XML")?;
    let (width, height) = options.size;
    let mut camera = scene
        .camera(width as f32, height as f32)
        .context("invalid camera")?;
    replay_input(&mut camera, &options);
    let lights = scene.lights().context("invalid light list")?;
    info!(
        "loaded {} with {} light(s) at {width}x{height}",
        options.path,
        lights.len()
    );

    let mut ring = FrameRing::new(config.frames_in_flight)?;
    let frame = FrameUniforms::build(camera.view(), camera.projection(), &lights, scene.material)?;
    let frame = ring.submit(frame)?;
    let summary = FrameSummary::new(&camera, &frame);

    if options.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    if options.wgsl {
        println!();
        print!("{}", shader_source());
    }
    Ok(())
}

/// Feeds the requested drag and scroll through the interactive controls.
fn replay_input(camera: &mut Camera, options: &CliOptions) {
    if options.drag.is_none() && options.scroll == 0.0 {
        return;
    }
    let input = InputState::new();
    if let Some(drag) = options.drag {
        input.set_mouse_button_down(MouseButton::Left);
        input.set_mouse_position(Vec2::ZERO);
        input.set_mouse_position(drag);
    }
    input.add_scroll(options.scroll);
    let settings = ControlSettings::from_env();
    camera.apply_input(&input, &settings);
    info!(
        "replayed drag={:?} scroll={} with {settings:?}",
        options.drag, options.scroll
    );
}

struct CliOptions {
    path: String,
    size: (u32, u32),
    drag: Option<Vec2>,
    scroll: f32,
    wgsl: bool,
    json: bool,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!(USAGE));
        };
        let mut size = (1280, 720);
        let mut drag = None;
        let mut scroll = 0.0_f32;
        let mut wgsl = false;
        let mut json = false;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--wgsl" => wgsl = true,
                "--json" => json = true,
                "--size" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--size expects a value like 1280x720"))?;
                    size = parse_size(&value)
                        .ok_or_else(|| anyhow!("invalid --size {value:?}, expected WxH"))?;
                }
                "--drag" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--drag expects a value like 40,0"))?;
                    drag = Some(parse_drag(&value)?);
                }
                "--scroll" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--scroll expects a number of steps"))?;
                    scroll = value
                        .trim()
                        .parse::<f32>()
                        .with_context(|| format!("invalid --scroll {value:?}"))?;
                }
                other => {
                    return Err(anyhow!("Unknown argument: {other}. {USAGE}"));
                }
            }
        }
        Ok(Self {
            path,
            size,
            drag,
            scroll,
            wgsl,
            json,
        })
    }
}

fn parse_drag(raw: &str) -> Result<Vec2> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("invalid --drag {raw:?}, expected DX,DY"))?;
    let x = x
        .trim()
        .parse::<f32>()
        .with_context(|| format!("invalid --drag {raw:?}"))?;
    let y = y
        .trim()
        .parse::<f32>()
        .with_context(|| format!("invalid --drag {raw:?}"))?;
    Ok(Vec2::new(x, y))
}
