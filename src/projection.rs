use std::f32::consts::PI;

use glam::{Mat4, Vec4};
use serde::Serialize;

use crate::error::CameraError;

/// Lens and viewport parameters plus the perspective matrix derived from them.
///
/// The matrix is right-handed and maps view depth `[-near, -far]` onto
/// clip-space depth `[0, 1]`. It is recomputed only when a parameter changes;
/// ray generation reads the scalar fields directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraProjection {
    fovy: f32,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
    matrix: Mat4,
}

impl Default for CameraProjection {
    fn default() -> Self {
        let (fovy, width, height, near, far) = (35f32.to_radians(), 2.0, 2.0, 0.1, 100.0);
        Self {
            fovy,
            width,
            height,
            near,
            far,
            matrix: perspective_matrix(fovy, width, height, near, far),
        }
    }
}

impl CameraProjection {
    pub fn new(
        fovy: f32,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, CameraError> {
        validate(fovy, width, height, near, far)?;
        Ok(Self {
            fovy,
            width,
            height,
            near,
            far,
            matrix: perspective_matrix(fovy, width, height, near, far),
        })
    }

    /// Vertical field of view in radians.
    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Column-major perspective matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), CameraError> {
        *self = Self::new(self.fovy, width, height, self.near, self.far)?;
        Ok(())
    }

    pub fn set_fovy(&mut self, fovy: f32) -> Result<(), CameraError> {
        *self = Self::new(fovy, self.width, self.height, self.near, self.far)?;
        Ok(())
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<(), CameraError> {
        *self = Self::new(self.fovy, self.width, self.height, near, far)?;
        Ok(())
    }
}

fn validate(fovy: f32, width: f32, height: f32, near: f32, far: f32) -> Result<(), CameraError> {
    if !(fovy.is_finite() && fovy > 0.0 && fovy < PI) {
        return Err(CameraError::InvalidFov(fovy));
    }
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(CameraError::InvalidViewport { width, height });
    }
    if !(near.is_finite() && far.is_finite() && near > 0.0 && near < far) {
        return Err(CameraError::InvalidClipPlanes { near, far });
    }
    Ok(())
}

fn perspective_matrix(fovy: f32, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
    let sy = 1.0 / (fovy * 0.5).tan();
    let sx = sy * height / width;
    let sz = far / (near - far);
    Mat4::from_cols(
        Vec4::new(sx, 0.0, 0.0, 0.0),
        Vec4::new(0.0, sy, 0.0, 0.0),
        Vec4::new(0.0, 0.0, sz, -1.0),
        Vec4::new(0.0, 0.0, sz * near, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn near_and_far_planes_map_to_unit_depth() {
        let projection = CameraProjection::new(1.0, 1280.0, 720.0, 0.5, 50.0).unwrap();
        let near = projection.matrix().project_point3(Vec3::new(0.0, 0.0, -0.5));
        let far = projection.matrix().project_point3(Vec3::new(0.0, 0.0, -50.0));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn matches_glam_perspective() {
        let projection = CameraProjection::new(0.8, 800.0, 600.0, 0.1, 100.0).unwrap();
        let reference = Mat4::perspective_rh(0.8, 800.0 / 600.0, 0.1, 100.0);
        assert!(projection.matrix().abs_diff_eq(reference, 1e-5));
    }

    #[test]
    fn default_matches_source_camera() {
        let projection = CameraProjection::default();
        assert!((projection.fovy() - 35f32.to_radians()).abs() < f32::EPSILON);
        assert_eq!(projection.aspect(), 1.0);
        assert_eq!(projection.near(), 0.1);
        assert_eq!(projection.far(), 100.0);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            CameraProjection::new(0.0, 1.0, 1.0, 0.1, 1.0),
            Err(CameraError::InvalidFov(0.0))
        );
        assert!(CameraProjection::new(PI, 1.0, 1.0, 0.1, 1.0).is_err());
        assert!(matches!(
            CameraProjection::new(1.0, 0.0, 1.0, 0.1, 1.0),
            Err(CameraError::InvalidViewport { .. })
        ));
        assert!(matches!(
            CameraProjection::new(1.0, 1.0, -4.0, 0.1, 1.0),
            Err(CameraError::InvalidViewport { .. })
        ));
        assert!(matches!(
            CameraProjection::new(1.0, 1.0, 1.0, 2.0, 2.0),
            Err(CameraError::InvalidClipPlanes { .. })
        ));
        assert!(matches!(
            CameraProjection::new(1.0, 1.0, 1.0, 0.0, 2.0),
            Err(CameraError::InvalidClipPlanes { .. })
        ));
    }

    #[test]
    fn resize_recomputes_matrix_and_keeps_state_on_error() {
        let mut projection = CameraProjection::default();
        projection.resize(1920.0, 1080.0).unwrap();
        let expected = Mat4::perspective_rh(projection.fovy(), 1920.0 / 1080.0, 0.1, 100.0);
        assert!(projection.matrix().abs_diff_eq(expected, 1e-5));

        let before = projection;
        assert!(projection.resize(0.0, 1080.0).is_err());
        assert_eq!(projection, before);
    }
}
