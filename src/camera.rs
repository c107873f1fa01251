use glam::{Quat, Vec2, Vec3};
use log::warn;

use crate::config::ControlSettings;
use crate::error::CameraError;
use crate::input::{InputState, KeyCode, MouseButton, NamedKey};
use crate::projection::CameraProjection;
use crate::view::CameraView;

/// Closest the eye may get to the orbit center.
pub const ZOOM_MIN_DISTANCE: f32 = 0.5;
/// Farthest the eye may get from the orbit center.
pub const ZOOM_MAX_DISTANCE: f32 = 20.0;

/// Orbit camera that produces a fresh `CameraView` every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center: Vec3,
    view: CameraView,
    projection: CameraProjection,
}

impl Default for Camera {
    fn default() -> Self {
        let view = CameraView::default();
        Self {
            center: view.eye + view.look,
            view,
            projection: CameraProjection::default(),
        }
    }
}

impl Camera {
    pub fn new(
        eye: Vec3,
        center: Vec3,
        up: Vec3,
        projection: CameraProjection,
    ) -> Result<Self, CameraError> {
        Ok(Self {
            center,
            view: CameraView::look_at(eye, center, up)?,
            projection,
        })
    }

    pub fn view(&self) -> &CameraView {
        &self.view
    }

    pub fn projection(&self) -> &CameraProjection {
        &self.projection
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> Result<(), CameraError> {
        self.view = CameraView::look_at(eye, center, up)?;
        self.center = center;
        Ok(())
    }

    pub fn perspective(&mut self, fovy: f32, width: f32, height: f32) -> Result<(), CameraError> {
        self.projection = CameraProjection::new(
            fovy,
            width,
            height,
            self.projection.near(),
            self.projection.far(),
        )?;
        Ok(())
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) -> Result<(), CameraError> {
        self.projection.resize(width, height)
    }

    /// Moves the eye along the look direction, keeping it between
    /// `ZOOM_MIN_DISTANCE` and `ZOOM_MAX_DISTANCE` in front of the center.
    pub fn zoom(&mut self, delta: f32) {
        let look = self.view.look;
        let candidate = self.view.eye + look * delta;
        let gap = self.center - candidate;
        let distance = gap.length();
        self.view.eye = if distance <= ZOOM_MIN_DISTANCE || gap.dot(look) < 0.0 {
            self.center - look * ZOOM_MIN_DISTANCE
        } else if distance >= ZOOM_MAX_DISTANCE {
            self.center - look * ZOOM_MAX_DISTANCE
        } else {
            candidate
        };
    }

    /// Orbits the eye around the center: yaw about world +y, pitch about the
    /// camera's right vector.
    pub fn rotate(&mut self, horizontal: f32, vertical: f32) {
        let rotation = Quat::from_axis_angle(Vec3::Y, -horizontal)
            * Quat::from_axis_angle(self.view.right, -vertical);
        let offset = rotation * (self.view.eye - self.center);
        let up = rotation * self.view.up;
        if let Err(err) = self.look_at(self.center + offset, self.center, up) {
            warn!("ignoring camera rotation: {err}");
        }
    }

    /// Slides eye and center parallel to the view plane.
    pub fn pan(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.view.up * vertical - self.view.right * horizontal;
        self.translate(offset);
    }

    /// Slides eye and center parallel to the ground plane.
    pub fn move_on_ground(&mut self, horizontal: f32, vertical: f32) {
        let up = self.view.up;
        let look = self.view.look;
        let forward = Vec3::new(up.x + look.x, 0.0, up.z + look.z).normalize_or_zero();
        let offset = -self.view.right * horizontal + forward * vertical;
        self.translate(offset);
    }

    fn translate(&mut self, offset: Vec3) {
        self.view.eye += offset;
        self.center += offset;
    }

    /// Consumes the drag and scroll deltas gathered since the last frame and
    /// applies held movement keys.
    pub fn apply_input(&mut self, input: &InputState, settings: &ControlSettings) {
        let drag = input.take_drag();
        if drag != Vec2::ZERO {
            if input.is_mouse_button_down(MouseButton::Right) {
                self.pan(drag.x * settings.pan_speed, drag.y * settings.pan_speed);
            } else if input.is_mouse_button_down(MouseButton::Left) {
                self.rotate(drag.x * settings.rotate_speed, drag.y * settings.rotate_speed);
            }
        }

        let scroll = input.take_scroll();
        if scroll != 0.0 {
            self.zoom(scroll * settings.zoom_speed);
        }

        let held = |keys: &[KeyCode]| -> f32 {
            if keys.iter().any(|key| input.is_key_down(*key)) {
                1.0
            } else {
                0.0
            }
        };
        let axis = |positive: &[KeyCode], negative: &[KeyCode]| held(positive) - held(negative);
        let forward = axis(
            &[KeyCode::Character('W'), KeyCode::Named(NamedKey::Up)],
            &[KeyCode::Character('S'), KeyCode::Named(NamedKey::Down)],
        );
        let strafe = axis(
            &[KeyCode::Character('A'), KeyCode::Named(NamedKey::Left)],
            &[KeyCode::Character('D'), KeyCode::Named(NamedKey::Right)],
        );
        if forward != 0.0 || strafe != 0.0 {
            self.move_on_ground(strafe * settings.move_speed, forward * settings.move_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit_camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            CameraProjection::default(),
        )
        .unwrap()
    }

    #[test]
    fn zoom_stops_short_of_center() {
        let mut camera = orbit_camera();
        camera.zoom(10.0);
        assert!((camera.view().eye - Vec3::new(0.0, 0.0, ZOOM_MIN_DISTANCE)).length() < 1e-6);
    }

    #[test]
    fn zoom_out_is_capped() {
        let mut camera = orbit_camera();
        camera.zoom(-100.0);
        assert!((camera.view().eye.z - ZOOM_MAX_DISTANCE).abs() < 1e-5);
    }

    #[test]
    fn zoom_within_range_moves_eye() {
        let mut camera = orbit_camera();
        camera.zoom(1.5);
        assert!((camera.view().eye.z - 3.5).abs() < 1e-6);
    }

    #[test]
    fn rotate_keeps_distance_and_basis() {
        let mut camera = orbit_camera();
        camera.rotate(0.7, 0.3);
        assert!((camera.view().eye.length() - 5.0).abs() < 1e-4);
        camera.view().validate().unwrap();
        assert!(camera.view().look.abs_diff_eq(-camera.view().eye.normalize(), 1e-5));
    }

    #[test]
    fn pan_moves_eye_and_center_together() {
        let mut camera = orbit_camera();
        camera.pan(1.0, 2.0);
        assert!(camera.center().abs_diff_eq(Vec3::new(-1.0, 2.0, 0.0), 1e-6));
        assert!(camera.view().eye.abs_diff_eq(Vec3::new(-1.0, 2.0, 5.0), 1e-6));
    }

    #[test]
    fn ground_move_keeps_height() {
        let mut camera = Camera::new(
            Vec3::new(0.0, 4.0, 4.0),
            Vec3::ZERO,
            Vec3::Y,
            CameraProjection::default(),
        )
        .unwrap();
        camera.move_on_ground(0.5, 1.0);
        assert!((camera.view().eye.y - 4.0).abs() < 1e-6);
        assert!((camera.center().y).abs() < 1e-6);
        camera.view().validate().unwrap();
    }

    #[test]
    fn input_drives_orbit_and_zoom() {
        let settings = ControlSettings::default();
        let input = InputState::new();
        let mut camera = orbit_camera();

        input.set_mouse_button_down(MouseButton::Left);
        input.set_mouse_position(Vec2::new(100.0, 100.0));
        input.set_mouse_position(Vec2::new(140.0, 100.0));
        input.add_scroll(1.0);
        camera.apply_input(&input, &settings);

        assert!(camera.view().eye.x.abs() > 0.1);
        camera.view().validate().unwrap();
        assert_eq!(input.take_drag(), Vec2::ZERO);
        assert_eq!(input.take_scroll(), 0.0);
    }

    #[test]
    fn held_keys_move_camera() {
        let settings = ControlSettings::default();
        let input = InputState::new();
        let mut camera = orbit_camera();
        input.set_key_down(KeyCode::Character('W'));
        camera.apply_input(&input, &settings);
        assert!(camera.view().eye.z < 5.0);
        assert!(camera.center().z < 0.0);
    }

    #[test]
    fn opposing_keys_cancel_and_strafe_moves_sideways() {
        let settings = ControlSettings::default();
        let input = InputState::new();
        let mut camera = orbit_camera();
        input.set_key_down(KeyCode::Character('W'));
        input.set_key_down(KeyCode::Named(NamedKey::Down));
        camera.apply_input(&input, &settings);
        assert_eq!(camera.view().eye, Vec3::new(0.0, 0.0, 5.0));

        input.set_key_up(KeyCode::Character('W'));
        input.set_key_up(KeyCode::Named(NamedKey::Down));
        input.set_key_down(KeyCode::Character('D'));
        camera.apply_input(&input, &settings);
        assert!(camera.view().eye.x > 0.0);
        assert!((camera.view().eye.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_projection() {
        let mut camera = Camera::default();
        camera.resize_viewport(1600.0, 900.0).unwrap();
        assert!((camera.projection().aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!(camera.resize_viewport(0.0, 900.0).is_err());
    }
}
