//! Camera orientation and the world-to-camera transform.
//!
//! Camera space is right-handed with `x = right`, `y = up` and `z = -look`,
//! so the camera looks down its own -z axis. Matrices are column-major
//! (`glam::Mat4`), the same convention the WGSL side reads.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Tolerance used for unit length and orthogonality checks.
pub const BASIS_TOLERANCE: f32 = 1e-4;

/// Orthonormal camera basis placed at `eye`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            look: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
        }
    }
}

impl CameraView {
    /// Builds a basis at `eye` facing `center`, with `up` as the approximate
    /// vertical. The returned basis is orthonormal and right-handed.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Result<Self, CameraError> {
        let look = (center - eye)
            .try_normalize()
            .ok_or(CameraError::DegenerateBasis("eye and center coincide"))?;
        let right = look
            .cross(up)
            .try_normalize()
            .ok_or(CameraError::DegenerateBasis("up is parallel to the look direction"))?;
        let up = right.cross(look).normalize();
        Ok(Self {
            eye,
            look,
            up,
            right,
        })
    }

    /// Checks the orthonormality invariant the view matrix relies on.
    pub fn validate(&self) -> Result<(), CameraError> {
        let fields = [
            ("eye", self.eye),
            ("look", self.look),
            ("up", self.up),
            ("right", self.right),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CameraError::NonFinite { field });
            }
        }
        for &(field, value) in &fields[1..] {
            let length = value.length();
            if (length - 1.0).abs() > BASIS_TOLERANCE {
                return Err(CameraError::NotUnitLength { field, length });
            }
        }
        let pairs = [
            ("look", self.look, "up", self.up),
            ("look", self.look, "right", self.right),
            ("up", self.up, "right", self.right),
        ];
        for (a, va, b, vb) in pairs {
            let dot = va.dot(vb);
            if dot.abs() > BASIS_TOLERANCE {
                return Err(CameraError::NotOrthogonal { a, b, dot });
            }
        }
        if self.right.cross(self.up).dot(-self.look) <= 0.0 {
            return Err(CameraError::LeftHanded);
        }
        Ok(())
    }

    /// Camera-space +z axis in world coordinates.
    pub fn backward(&self) -> Vec3 {
        -self.look
    }
}

/// Returns the matrix taking world-space points into camera space.
///
/// The rotation block is the transpose of `[right | up | -look]` and the
/// translation column is `-R * eye`, so `V * (eye, 1) = (0, 0, 0, 1)`.
/// The basis is trusted as given: a non-orthonormal view still yields a
/// well-defined (but skewed) matrix. Results are bit-identical for identical
/// inputs on a given platform; cross-platform float rounding is not covered.
pub fn view_matrix(view: &CameraView) -> Mat4 {
    let r = view.right;
    let u = view.up;
    let b = view.backward();
    Mat4::from_cols(
        Vec4::new(r.x, u.x, b.x, 0.0),
        Vec4::new(r.y, u.y, b.y, 0.0),
        Vec4::new(r.z, u.z, b.z, 0.0),
        Vec4::new(-r.dot(view.eye), -u.dot(view.eye), -b.dot(view.eye), 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Quat};

    const EPS: f32 = 1e-5;

    fn sample_views() -> Vec<CameraView> {
        vec![
            CameraView::default(),
            CameraView::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap(),
            CameraView::look_at(Vec3::new(3.0, 4.0, -2.0), Vec3::new(1.0, 0.5, 0.0), Vec3::Y)
                .unwrap(),
            CameraView::look_at(
                Vec3::new(-1200.0, 350.0, 980.0),
                Vec3::new(10.0, -4.0, 2.0),
                Vec3::new(0.2, 1.0, 0.1),
            )
            .unwrap(),
            CameraView::look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::NEG_Z).unwrap(),
        ]
    }

    #[test]
    fn eye_maps_to_origin() {
        for view in sample_views() {
            let camera_space = view_matrix(&view) * view.eye.extend(1.0);
            let tolerance = EPS * view.eye.length().max(1.0);
            assert!(
                camera_space.abs_diff_eq(Vec4::W, tolerance),
                "eye {:?} mapped to {camera_space:?}",
                view.eye
            );
        }
    }

    #[test]
    fn rotation_block_is_orthonormal() {
        for view in sample_views() {
            let rotation = Mat3::from_mat4(view_matrix(&view));
            let product = rotation * rotation.transpose();
            assert!(product.abs_diff_eq(Mat3::IDENTITY, EPS));
            assert!((rotation.determinant() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn basis_directions_map_to_camera_axes() {
        let view = sample_views()[2];
        let matrix = view_matrix(&view);
        assert!(matrix
            .transform_vector3(view.right)
            .abs_diff_eq(Vec3::X, EPS));
        assert!(matrix.transform_vector3(view.up).abs_diff_eq(Vec3::Y, EPS));
        assert!(matrix
            .transform_vector3(-view.look)
            .abs_diff_eq(Vec3::Z, EPS));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let view = sample_views()[3];
        let first = view_matrix(&view).to_cols_array();
        let second = view_matrix(&view).to_cols_array();
        assert_eq!(
            first.map(f32::to_bits),
            second.map(f32::to_bits)
        );
    }

    #[test]
    fn axis_aligned_camera_is_pure_translation() {
        let view = CameraView {
            eye: Vec3::new(0.0, 0.0, 5.0),
            ..CameraView::default()
        };
        let matrix = view_matrix(&view);
        assert_eq!(Mat3::from_mat4(matrix), Mat3::IDENTITY);
        assert_eq!(matrix.w_axis, Vec4::new(0.0, 0.0, -5.0, 1.0));
        assert_eq!(matrix * Vec4::W, Vec4::new(0.0, 0.0, -5.0, 1.0));
    }

    #[test]
    fn matches_glam_look_at() {
        for view in sample_views() {
            let reference = Mat4::look_at_rh(view.eye, view.eye + view.look, view.up);
            let tolerance = EPS * view.eye.length().max(1.0);
            assert!(view_matrix(&view).abs_diff_eq(reference, tolerance));
        }
    }

    #[test]
    fn look_at_rejects_degenerate_input() {
        assert!(matches!(
            CameraView::look_at(Vec3::ONE, Vec3::ONE, Vec3::Y),
            Err(CameraError::DegenerateBasis(_))
        ));
        assert!(matches!(
            CameraView::look_at(Vec3::ZERO, Vec3::Y, Vec3::Y),
            Err(CameraError::DegenerateBasis(_))
        ));
    }

    #[test]
    fn validate_accepts_derived_bases() {
        for view in sample_views() {
            view.validate().unwrap();
        }
    }

    #[test]
    fn validate_rejects_broken_bases() {
        let short_look = CameraView {
            look: Vec3::new(0.0, 0.0, -0.1),
            ..CameraView::default()
        };
        assert!(matches!(
            short_look.validate(),
            Err(CameraError::NotUnitLength { field: "look", .. })
        ));

        let skewed = CameraView {
            up: Quat::from_rotation_x(0.1) * Vec3::Y,
            ..CameraView::default()
        };
        assert!(matches!(
            skewed.validate(),
            Err(CameraError::NotOrthogonal { .. })
        ));

        let mirrored = CameraView {
            right: Vec3::NEG_X,
            ..CameraView::default()
        };
        assert_eq!(mirrored.validate(), Err(CameraError::LeftHanded));

        let nan_eye = CameraView {
            eye: Vec3::new(f32::NAN, 0.0, 0.0),
            ..CameraView::default()
        };
        assert_eq!(
            nan_eye.validate(),
            Err(CameraError::NonFinite { field: "eye" })
        );
    }

    #[test]
    fn skewed_basis_still_produces_a_matrix() {
        let skewed = CameraView {
            eye: Vec3::new(1.0, 2.0, 3.0),
            look: Vec3::new(0.0, 0.0, -2.0),
            up: Vec3::new(0.0, 1.0, 0.3),
            right: Vec3::X,
        };
        assert!(view_matrix(&skewed).is_finite());
    }
}
