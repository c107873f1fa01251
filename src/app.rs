use std::fmt::Write as _;
use std::mem::size_of;

use glam::Mat4;
use serde::Serialize;

use crate::camera::Camera;
use crate::frame::FrameUniforms;
use crate::layout::{GpuLightBlock, GpuUniforms, Vertex};

/// Human and JSON readable digest of one frame snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub eye: [f32; 3],
    pub look: [f32; 3],
    pub viewport: [f32; 2],
    pub fovy_degrees: f32,
    /// Rows of the view matrix.
    pub view_matrix: [[f32; 4]; 4],
    pub light_count: usize,
    pub uniform_block_size: usize,
    pub light_block_size: usize,
    pub vertex_stride: usize,
}

impl FrameSummary {
    pub fn new(camera: &Camera, frame: &FrameUniforms) -> Self {
        let view = camera.view();
        let projection = camera.projection();
        let matrix = Mat4::from_cols_array_2d(&frame.uniforms().view_matrix).transpose();
        Self {
            eye: view.eye.into(),
            look: view.look.into(),
            viewport: [projection.width(), projection.height()],
            fovy_degrees: projection.fovy().to_degrees(),
            view_matrix: matrix.to_cols_array_2d(),
            light_count: frame.light_count(),
            uniform_block_size: size_of::<GpuUniforms>(),
            light_block_size: size_of::<GpuLightBlock>(),
            vertex_stride: size_of::<Vertex>(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let [x, y, z] = self.eye;
        let _ = writeln!(out, "Eye: ({x:.2}, {y:.2}, {z:.2})");
        let [x, y, z] = self.look;
        let _ = writeln!(out, "Look: ({x:.2}, {y:.2}, {z:.2})");
        let _ = writeln!(
            out,
            "Viewport: {}x{} fovy={:.1}deg",
            self.viewport[0], self.viewport[1], self.fovy_degrees
        );
        let _ = writeln!(out, "View matrix:");
        for row in &self.view_matrix {
            let _ = writeln!(
                out,
                "  [{:>8.3} {:>8.3} {:>8.3} {:>8.3}]",
                row[0], row[1], row[2], row[3]
            );
        }
        let _ = writeln!(out, "Lights: {}", self.light_count);
        let _ = writeln!(
            out,
            "Uniform block: {} bytes, light block: {} bytes, vertex stride: {} bytes",
            self.uniform_block_size, self.light_block_size, self.vertex_stride
        );
        out
    }
}

pub fn print_summary(summary: &FrameSummary) {
    print!("{}", summary.render_text());
}
