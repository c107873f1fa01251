use std::env;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::frame::DEFAULT_FRAMES_IN_FLIGHT;

/// Sensitivities applied to raw input deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// World units per pixel of drag.
    pub pan_speed: f32,
    /// World units per scroll step.
    pub zoom_speed: f32,
    /// World units per frame while a movement key is held.
    pub move_speed: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.01,
            pan_speed: 0.01,
            zoom_speed: 0.5,
            move_speed: 0.1,
        }
    }
}

impl ControlSettings {
    /// Defaults overridden by `RENDERER_ROTATE_SPEED`, `RENDERER_PAN_SPEED`,
    /// `RENDERER_ZOOM_SPEED` and `RENDERER_MOVE_SPEED`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rotate_speed: env_or("RENDERER_ROTATE_SPEED", defaults.rotate_speed),
            pan_speed: env_or("RENDERER_PAN_SPEED", defaults.pan_speed),
            zoom_speed: env_or("RENDERER_ZOOM_SPEED", defaults.zoom_speed),
            move_speed: env_or("RENDERER_MOVE_SPEED", defaults.move_speed),
        }
    }
}

/// Frame pacing knobs read at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub frames_in_flight: usize,
    pub validate_layout: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: DEFAULT_FRAMES_IN_FLIGHT,
            validate_layout: true,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `RENDERER_FRAMES_IN_FLIGHT` and
    /// `RENDERER_VALIDATE_LAYOUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let frames_in_flight = env_or("RENDERER_FRAMES_IN_FLIGHT", defaults.frames_in_flight);
        let validate_layout = env::var("RENDERER_VALIDATE_LAYOUT")
            .ok()
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(defaults.validate_layout);
        Self {
            frames_in_flight: frames_in_flight.max(1),
            validate_layout,
        }
    }
}

fn env_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring unparsable {name}={raw:?}");
            default
        }),
        Err(_) => default,
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a `WIDTHxHEIGHT` viewport size.
pub fn parse_size(raw: &str) -> Option<(u32, u32)> {
    let (width, height) = raw.split_once(['x', 'X'])?;
    let width = width.trim().parse().ok()?;
    let height = height.trim().parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}
