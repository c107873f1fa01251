use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Number of light slots reserved in the GPU light block.
pub const MAX_LIGHTS: usize = 8;

/// Point light in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

/// Material parameters shared by every surface in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhongMaterial {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: 0.02,
            diffuse: 0.2,
            specular: 1.0,
            shininess: 16.0,
        }
    }
}

/// Fixed-capacity light list with an explicit count.
///
/// Slots at or past `len()` are never read back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSet {
    slots: [Option<Light>; MAX_LIGHTS],
    len: usize,
}

impl Default for LightSet {
    fn default() -> Self {
        Self {
            slots: [None; MAX_LIGHTS],
            len: 0,
        }
    }
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(lights: &[Light]) -> Result<Self, FrameError> {
        if lights.len() > MAX_LIGHTS {
            return Err(FrameError::TooManyLights {
                count: lights.len(),
                capacity: MAX_LIGHTS,
            });
        }
        let mut set = Self::new();
        for light in lights {
            set.push(*light)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, light: Light) -> Result<(), FrameError> {
        if self.len == MAX_LIGHTS {
            return Err(FrameError::TooManyLights {
                count: self.len + 1,
                capacity: MAX_LIGHTS,
            });
        }
        self.slots[self.len] = Some(light);
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        MAX_LIGHTS
    }

    pub fn get(&self, index: usize) -> Option<&Light> {
        if index < self.len {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> + '_ {
        self.slots[..self.len].iter().flatten()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
