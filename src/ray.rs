use glam::{Vec2, Vec3};

use crate::projection::CameraProjection;
use crate::view::CameraView;

/// World-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray through `pixel` (top-left origin, `+0.5` is the pixel center) built
/// from the raw basis and lens scalars, without touching either matrix.
///
/// Points on the ray land on the same pixel when pushed through
/// `projection.matrix() * view_matrix(view)`, which keeps the ray-traced and
/// rasterized images aligned.
pub fn primary_ray(view: &CameraView, projection: &CameraProjection, pixel: Vec2) -> Ray {
    let ndc_x = 2.0 * pixel.x / projection.width() - 1.0;
    let ndc_y = 1.0 - 2.0 * pixel.y / projection.height();
    let half_height = (projection.fovy() * 0.5).tan();
    let half_width = half_height * projection.aspect();
    let direction =
        view.look + view.right * (ndc_x * half_width) + view.up * (ndc_y * half_height);
    Ray {
        origin: view.eye,
        direction: direction.normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::view_matrix;

    fn pixel_of(view: &CameraView, projection: &CameraProjection, point: Vec3) -> Vec2 {
        let ndc = (projection.matrix() * view_matrix(view)).project_point3(point);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * projection.width(),
            (1.0 - ndc.y) * 0.5 * projection.height(),
        )
    }

    #[test]
    fn center_ray_follows_look() {
        let view = CameraView::look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y).unwrap();
        let projection = CameraProjection::new(0.9, 640.0, 480.0, 0.1, 100.0).unwrap();
        let ray = primary_ray(&view, &projection, Vec2::new(320.0, 240.0));
        assert_eq!(ray.origin, view.eye);
        assert!(ray.direction.abs_diff_eq(view.look, 1e-6));
    }

    #[test]
    fn rays_agree_with_raster_matrices() {
        let view =
            CameraView::look_at(Vec3::new(-4.0, 3.0, 6.0), Vec3::new(0.5, 0.0, -1.0), Vec3::Y)
                .unwrap();
        let projection = CameraProjection::new(1.1, 800.0, 450.0, 0.1, 100.0).unwrap();
        for pixel in [
            Vec2::new(0.5, 0.5),
            Vec2::new(799.5, 0.5),
            Vec2::new(400.0, 225.0),
            Vec2::new(123.5, 401.5),
        ] {
            let ray = primary_ray(&view, &projection, pixel);
            for t in [1.0, 10.0, 50.0] {
                let reprojected = pixel_of(&view, &projection, ray.at(t));
                assert!(
                    reprojected.abs_diff_eq(pixel, 1e-2),
                    "pixel {pixel:?} reprojected to {reprojected:?} at t={t}"
                );
            }
        }
    }

    #[test]
    fn corner_rays_span_the_field_of_view() {
        let view = CameraView::default();
        let projection = CameraProjection::new(1.0, 2.0, 2.0, 0.1, 10.0).unwrap();
        let top = primary_ray(&view, &projection, Vec2::new(1.0, 0.0));
        let bottom = primary_ray(&view, &projection, Vec2::new(1.0, 2.0));
        assert!((top.direction.angle_between(bottom.direction) - 1.0).abs() < 1e-5);
        assert!(top.direction.y > 0.0);
    }
}
