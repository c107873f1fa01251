use std::sync::Arc;

use bytemuck::{bytes_of, Zeroable};
use log::{debug, warn};

use crate::error::FrameError;
use crate::layout::{GpuCameraProjection, GpuCameraView, GpuLight, GpuLightBlock, GpuUniforms};
use crate::lights::{LightSet, PhongMaterial};
use crate::projection::CameraProjection;
use crate::view::{view_matrix, CameraView};

/// Default number of frames the GPU may be working on at once.
pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 3;

/// Immutable per-frame snapshot in GPU byte layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    uniforms: GpuUniforms,
    lights: GpuLightBlock,
}

impl FrameUniforms {
    /// Validates the camera basis, writes the light block together with its
    /// count and runs the view matrix builder once.
    pub fn build(
        view: &CameraView,
        projection: &CameraProjection,
        lights: &LightSet,
        material: PhongMaterial,
    ) -> Result<Self, FrameError> {
        view.validate().inspect_err(|err| warn!("rejecting frame: {err}"))?;

        let mut block = GpuLightBlock::zeroed();
        for (slot, light) in block.lights.iter_mut().zip(lights.iter()) {
            *slot = GpuLight::from(light);
        }

        let uniforms = GpuUniforms {
            view: GpuCameraView::from(view),
            projection: GpuCameraProjection::from(projection),
            view_matrix: view_matrix(view).to_cols_array_2d(),
            light_count: lights.len() as u32,
            _pad0: [0; 3],
            material: material.into(),
        };
        debug!(
            "frame snapshot: eye={:?} lights={} viewport={}x{}",
            view.eye,
            lights.len(),
            projection.width(),
            projection.height()
        );
        Ok(Self {
            uniforms,
            lights: block,
        })
    }

    pub fn uniforms(&self) -> &GpuUniforms {
        &self.uniforms
    }

    pub fn lights(&self) -> &GpuLightBlock {
        &self.lights
    }

    pub fn light_count(&self) -> usize {
        self.uniforms.light_count as usize
    }

    /// Contents of the `SceneUniforms` buffer.
    pub fn uniform_bytes(&self) -> &[u8] {
        bytes_of(&self.uniforms)
    }

    /// Contents of the `SceneLights` buffer.
    pub fn light_bytes(&self) -> &[u8] {
        bytes_of(&self.lights)
    }
}

/// Round-robin slots for snapshots the GPU may still be reading.
///
/// A submitted snapshot is shared through an `Arc`; its slot becomes
/// writable again only after every handle given out for it has been dropped.
#[derive(Debug)]
pub struct FrameRing {
    slots: Vec<Option<Arc<FrameUniforms>>>,
    next: usize,
    submitted: u64,
}

impl FrameRing {
    pub fn new(frames_in_flight: usize) -> Result<Self, FrameError> {
        if frames_in_flight == 0 {
            return Err(FrameError::EmptyRing);
        }
        Ok(Self {
            slots: vec![None; frames_in_flight],
            next: 0,
            submitted: 0,
        })
    }

    pub fn frames_in_flight(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot the next `submit` writes.
    pub fn next_slot(&self) -> usize {
        self.next
    }

    /// Number of snapshots handed off so far.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Whether the GPU side still holds the snapshot in `slot`.
    pub fn in_flight(&self, slot: usize) -> bool {
        self.slots
            .get(slot)
            .and_then(Option::as_ref)
            .is_some_and(|frame| Arc::strong_count(frame) > 1)
    }

    /// Stores `frame` in the next slot and returns the handle for the GPU side.
    pub fn submit(&mut self, frame: FrameUniforms) -> Result<Arc<FrameUniforms>, FrameError> {
        let slot = self.next;
        if self.in_flight(slot) {
            return Err(FrameError::SlotInFlight { slot });
        }
        let shared = Arc::new(frame);
        self.slots[slot] = Some(Arc::clone(&shared));
        self.next = (slot + 1) % self.slots.len();
        self.submitted += 1;
        debug!("submitted frame {} into slot {slot}", self.submitted);
        Ok(shared)
    }

    /// Most recently submitted snapshot.
    pub fn latest(&self) -> Option<&FrameUniforms> {
        let count = self.slots.len();
        self.slots[(self.next + count - 1) % count].as_deref()
    }
}

impl Default for FrameRing {
    fn default() -> Self {
        Self {
            slots: vec![None; DEFAULT_FRAMES_IN_FLIGHT],
            next: 0,
            submitted: 0,
        }
    }
}
