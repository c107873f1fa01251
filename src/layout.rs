//! Byte layout of every record that crosses the CPU/GPU boundary.
//!
//! The `#[repr(C)]` structs below are the only definition of the shared
//! layout. Each one describes itself through [`GpuLayout`]; the WGSL struct
//! declarations are generated from that description and [`check_layout`]
//! verifies that the Rust offsets agree with the offsets WGSL assigns.
//!
//! WGSL places a member at its natural alignment, while the uniform address
//! space requires struct and array members to start on a 16-byte boundary.
//! Where the two differ the generated declaration carries an explicit
//! `@align(16)`, so host and device agree on one layout. Padding fields are
//! spelled out so `bytemuck::Pod` holds and no implicit padding exists on
//! either side.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

use crate::error::LayoutError;
use crate::lights::{Light, PhongMaterial, MAX_LIGHTS};
use crate::projection::CameraProjection;
use crate::view::CameraView;

/// Device-side type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WgslType {
    F32,
    U32,
    Vec3,
    Mat4,
    Record(RecordInfo),
    Array(RecordInfo, usize),
}

/// Name, alignment and size of a nested record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInfo {
    pub name: &'static str,
    pub align: usize,
    pub size: usize,
}

/// One named field of a record at its host byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuField {
    pub name: &'static str,
    pub ty: WgslType,
    pub offset: usize,
}

impl WgslType {
    /// Natural alignment, before any address-space requirement.
    pub fn align(self) -> usize {
        match self {
            Self::F32 | Self::U32 => 4,
            Self::Vec3 | Self::Mat4 => 16,
            Self::Record(info) | Self::Array(info, _) => info.align,
        }
    }

    /// Alignment the uniform address space demands of a member of this type.
    pub fn uniform_align(self) -> usize {
        match self {
            Self::Record(_) | Self::Array(..) => round_up(16, self.align()),
            _ => self.align(),
        }
    }

    /// Explicit `@align` the member declaration needs, if any.
    pub fn align_attribute(self) -> Option<usize> {
        let required = self.uniform_align();
        (required > self.align()).then_some(required)
    }

    pub fn size(self) -> usize {
        match self {
            Self::F32 | Self::U32 => 4,
            Self::Vec3 => 12,
            Self::Mat4 => 64,
            Self::Record(info) => info.size,
            Self::Array(info, len) => array_stride(info) * len,
        }
    }

    pub fn wgsl_name(self) -> String {
        match self {
            Self::F32 => "f32".to_string(),
            Self::U32 => "u32".to_string(),
            Self::Vec3 => "vec3<f32>".to_string(),
            Self::Mat4 => "mat4x4<f32>".to_string(),
            Self::Record(info) => info.name.to_string(),
            Self::Array(info, len) => format!("array<{}, {len}>", info.name),
        }
    }
}

fn array_stride(info: RecordInfo) -> usize {
    round_up(info.align, info.size)
}

fn round_up(align: usize, value: usize) -> usize {
    value.div_ceil(align) * align
}

/// A plain-old-data record mirrored by a WGSL struct of the same name.
pub trait GpuLayout: Pod {
    const NAME: &'static str;

    /// Fields in declaration order, padding excluded.
    fn fields() -> Vec<GpuField>;

    fn record() -> RecordInfo {
        let (align, size) = wgsl_extent(&Self::fields());
        RecordInfo {
            name: Self::NAME,
            align,
            size,
        }
    }
}

/// Alignment of a member as declared by [`wgsl_struct`], `@align` included.
fn member_align(ty: WgslType) -> usize {
    ty.align_attribute().unwrap_or_else(|| ty.align())
}

/// Alignment and size WGSL assigns to the generated struct with these fields.
fn wgsl_extent(fields: &[GpuField]) -> (usize, usize) {
    let mut offset = 0;
    let mut align = 1;
    for field in fields {
        let member = member_align(field.ty);
        offset = round_up(member, offset) + field.ty.size();
        align = align.max(member);
    }
    (align, round_up(align, offset))
}

/// Compares the host offsets of `T` against the offsets WGSL assigns to the
/// generated declaration, then applies the uniform address-space rules.
pub fn check_layout<T: GpuLayout>() -> Result<(), LayoutError> {
    let fields = T::fields();
    let mut offset = 0;
    for field in &fields {
        let expected = round_up(member_align(field.ty), offset);
        if expected != field.offset {
            return Err(LayoutError::OffsetMismatch {
                record: T::NAME,
                field: field.name,
                expected,
                actual: field.offset,
            });
        }
        if let WgslType::Array(info, _) = field.ty {
            let stride = array_stride(info);
            if stride % 16 != 0 {
                return Err(LayoutError::ArrayStride {
                    record: T::NAME,
                    field: field.name,
                    stride,
                });
            }
        }
        offset = expected + field.ty.size();
    }
    for pair in fields.windows(2) {
        if let WgslType::Record(info) = pair[0].ty {
            let required = round_up(16, info.size);
            let actual = pair[1].offset - pair[0].offset;
            if actual < required {
                return Err(LayoutError::StructSpacing {
                    record: T::NAME,
                    field: pair[0].name,
                    required,
                    actual,
                });
            }
        }
    }
    let (_, expected) = wgsl_extent(&fields);
    let actual = size_of::<T>();
    if expected != actual {
        return Err(LayoutError::SizeMismatch {
            record: T::NAME,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Checks every record of the uniform interface.
pub fn check_all() -> Result<(), LayoutError> {
    check_layout::<GpuCameraView>()?;
    check_layout::<GpuCameraProjection>()?;
    check_layout::<GpuMaterial>()?;
    check_layout::<GpuUniforms>()?;
    check_layout::<GpuLight>()?;
    check_layout::<GpuLightBlock>()
}

/// WGSL declaration generated from the field table of `T`.
pub fn wgsl_struct<T: GpuLayout>() -> String {
    let mut out = format!("struct {} {{\n", T::NAME);
    for field in T::fields() {
        out.push_str("    ");
        if let Some(align) = field.ty.align_attribute() {
            out.push_str(&format!("@align({align}) "));
        }
        out.push_str(&format!("{}: {},\n", field.name, field.ty.wgsl_name()));
    }
    out.push_str("}\n");
    out
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuCameraView {
    pub eye: [f32; 3],
    pub _pad0: f32,
    pub look: [f32; 3],
    pub _pad1: f32,
    pub up: [f32; 3],
    pub _pad2: f32,
    pub right: [f32; 3],
    pub _pad3: f32,
}

impl GpuLayout for GpuCameraView {
    const NAME: &'static str = "CameraView";

    fn fields() -> Vec<GpuField> {
        vec![
            field("eye", WgslType::Vec3, offset_of!(Self, eye)),
            field("look", WgslType::Vec3, offset_of!(Self, look)),
            field("up", WgslType::Vec3, offset_of!(Self, up)),
            field("right", WgslType::Vec3, offset_of!(Self, right)),
        ]
    }
}

impl From<&CameraView> for GpuCameraView {
    fn from(view: &CameraView) -> Self {
        Self {
            eye: view.eye.into(),
            look: view.look.into(),
            up: view.up.into(),
            right: view.right.into(),
            ..Self::zeroed()
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuCameraProjection {
    pub fovy: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
    pub _pad0: [f32; 3],
    pub matrix: [[f32; 4]; 4],
}

impl GpuLayout for GpuCameraProjection {
    const NAME: &'static str = "CameraProjection";

    fn fields() -> Vec<GpuField> {
        vec![
            field("fovy", WgslType::F32, offset_of!(Self, fovy)),
            field("width", WgslType::F32, offset_of!(Self, width)),
            field("height", WgslType::F32, offset_of!(Self, height)),
            field("near", WgslType::F32, offset_of!(Self, near)),
            field("far", WgslType::F32, offset_of!(Self, far)),
            field("matrix", WgslType::Mat4, offset_of!(Self, matrix)),
        ]
    }
}

impl From<&CameraProjection> for GpuCameraProjection {
    fn from(projection: &CameraProjection) -> Self {
        Self {
            fovy: projection.fovy(),
            width: projection.width(),
            height: projection.height(),
            near: projection.near(),
            far: projection.far(),
            _pad0: [0.0; 3],
            matrix: projection.matrix().to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuMaterial {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl GpuLayout for GpuMaterial {
    const NAME: &'static str = "Material";

    fn fields() -> Vec<GpuField> {
        vec![
            field("ambient", WgslType::F32, offset_of!(Self, ambient)),
            field("diffuse", WgslType::F32, offset_of!(Self, diffuse)),
            field("specular", WgslType::F32, offset_of!(Self, specular)),
            field("shininess", WgslType::F32, offset_of!(Self, shininess)),
        ]
    }
}

impl From<PhongMaterial> for GpuMaterial {
    fn from(material: PhongMaterial) -> Self {
        Self {
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            shininess: material.shininess,
        }
    }
}

/// Per-frame uniform block.
///
/// `view_matrix` is produced on the host by [`crate::view::view_matrix`] from
/// `view`; ray generation ignores it and reads `view` and `projection`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuUniforms {
    pub view: GpuCameraView,
    pub projection: GpuCameraProjection,
    pub view_matrix: [[f32; 4]; 4],
    pub light_count: u32,
    pub _pad0: [u32; 3],
    pub material: GpuMaterial,
}

impl GpuLayout for GpuUniforms {
    const NAME: &'static str = "Uniforms";

    fn fields() -> Vec<GpuField> {
        vec![
            field(
                "view",
                WgslType::Record(GpuCameraView::record()),
                offset_of!(Self, view),
            ),
            field(
                "projection",
                WgslType::Record(GpuCameraProjection::record()),
                offset_of!(Self, projection),
            ),
            field("view_matrix", WgslType::Mat4, offset_of!(Self, view_matrix)),
            field("light_count", WgslType::U32, offset_of!(Self, light_count)),
            field(
                "material",
                WgslType::Record(GpuMaterial::record()),
                offset_of!(Self, material),
            ),
        ]
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

impl GpuLayout for GpuLight {
    const NAME: &'static str = "Light";

    fn fields() -> Vec<GpuField> {
        vec![
            field("position", WgslType::Vec3, offset_of!(Self, position)),
            field("color", WgslType::Vec3, offset_of!(Self, color)),
        ]
    }
}

impl From<&Light> for GpuLight {
    fn from(light: &Light) -> Self {
        Self {
            position: light.position.into(),
            color: light.color.into(),
            ..Self::zeroed()
        }
    }
}

/// Backing storage for the light mapping, always `MAX_LIGHTS` slots long.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLightBlock {
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl GpuLayout for GpuLightBlock {
    const NAME: &'static str = "LightBlock";

    fn fields() -> Vec<GpuField> {
        vec![field(
            "lights",
            WgslType::Array(GpuLight::record(), MAX_LIGHTS),
            offset_of!(Self, lights),
        )]
    }
}

/// Interleaved vertex as read by the raster vertex stage.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    /// Attribute names in shader-location order.
    pub const ATTRIBUTE_NAMES: [&'static str; 3] = ["pos", "normal", "color"];

    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn field(name: &'static str, ty: WgslType, offset: usize) -> GpuField {
    GpuField { name, ty, offset }
}
