//! Camera and shared-uniform core for a hybrid rasterizing / ray-tracing
//! renderer.
//!
//! The crate owns the camera basis and lens, the view matrix builder, the
//! byte layout of every record handed to the GPU and the buffer slot table.
//! Device setup and draw submission stay outside of the crate so that the
//! code remains testable in headless tools.

pub mod app;
pub mod bindings;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod layout;
pub mod lights;
pub mod projection;
pub mod ray;
pub mod scene;
pub mod shader;
pub mod view;

pub use app::{print_summary, FrameSummary};
pub use bindings::{BufferIndex, BufferKind, FRAME_BIND_GROUP};
pub use camera::Camera;
pub use config::{ControlSettings, RuntimeConfig};
pub use error::{CameraError, FrameError, LayoutError};
pub use frame::{FrameRing, FrameUniforms};
pub use input::{InputState, KeyCode, MouseButton, NamedKey};
pub use layout::{
    check_all, check_layout, GpuCameraProjection, GpuCameraView, GpuLayout, GpuLight,
    GpuLightBlock, GpuMaterial, GpuUniforms, Vertex,
};
pub use lights::{Light, LightSet, PhongMaterial, MAX_LIGHTS};
pub use projection::CameraProjection;
pub use ray::{primary_ray, Ray};
pub use scene::SceneDescription;
pub use shader::{shader_interface, shader_source};
pub use view::{view_matrix, CameraView};
