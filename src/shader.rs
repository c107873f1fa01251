//! WGSL source generated from the host-side layout definitions.

use crate::bindings::wgsl_bindings;
use crate::layout::{
    wgsl_struct, GpuCameraProjection, GpuCameraView, GpuLight, GpuLightBlock, GpuMaterial,
    GpuUniforms, Vertex,
};
use crate::lights::MAX_LIGHTS;

const RASTER_STAGES: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.position = uniforms.projection.matrix * uniforms.view_matrix * vec4<f32>(input.pos, 1.0);
    output.color = input.color;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color, 1.0);
}
"#;

const RAY_HELPER: &str = r#"
// Direction of the primary ray through `pixel` (top-left origin).
fn primary_ray_direction(view: CameraView, projection: CameraProjection, pixel: vec2<f32>) -> vec3<f32> {
    let ndc = vec2<f32>(
        2.0 * pixel.x / projection.width - 1.0,
        1.0 - 2.0 * pixel.y / projection.height,
    );
    let half_height = tan(projection.fovy * 0.5);
    let half_width = half_height * projection.width / projection.height;
    return normalize(view.look + view.right * (ndc.x * half_width) + view.up * (ndc.y * half_height));
}
"#;

/// Struct declarations, frame bindings and the light capacity constant.
pub fn shader_interface() -> String {
    let mut out = format!("const MAX_LIGHTS: u32 = {MAX_LIGHTS}u;\n\n");
    for declaration in [
        wgsl_struct::<GpuCameraView>(),
        wgsl_struct::<GpuCameraProjection>(),
        wgsl_struct::<GpuMaterial>(),
        wgsl_struct::<GpuUniforms>(),
        wgsl_struct::<GpuLight>(),
        wgsl_struct::<GpuLightBlock>(),
    ] {
        out.push_str(&declaration);
        out.push('\n');
    }
    out.push_str(&wgsl_bindings());
    out
}

/// Complete module: interface, vertex input, raster entry points and the
/// ray helper.
pub fn shader_source() -> String {
    let mut out = shader_interface();
    out.push('\n');
    out.push_str(&vertex_input());
    out.push_str(RASTER_STAGES);
    out.push_str(RAY_HELPER);
    out
}

fn vertex_input() -> String {
    let mut out = String::from("struct VertexInput {\n");
    for (attribute, name) in Vertex::ATTRIBUTES.iter().zip(Vertex::ATTRIBUTE_NAMES) {
        out.push_str(&format!(
            "    @location({}) {name}: vec3<f32>,\n",
            attribute.shader_location
        ));
    }
    out.push_str("}\n");
    out
}
