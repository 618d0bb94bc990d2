//! Orbit controls: rotate around a target, pan in screen space, dolly in and out.
//!
//! Input handlers only accumulate deltas. `update` applies them to the camera,
//! so with damping enabled it has to run every frame for motion to settle.

use std::f32::consts::PI;

use nalgebra::{Point3, Vector3};

use super::camera::Camera3D;

const EPS: f32 = 1e-6;

/// Zoom step per scroll notch
const ZOOM_SCALE: f32 = 0.95;

/// Scroll distance egui reports for one wheel notch
const SCROLL_NOTCH: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub screen_space_panning: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,

    // Pending motion
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vector3<f32>,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            target: Point3::origin(),
            enable_damping: true,
            damping_factor: 0.05,
            screen_space_panning: true,
            min_distance: 1.0,
            max_distance: 700.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vector3::zeros(),
            scale: 1.0,
        }
    }

    /// Orbit by a pointer drag of `delta` pixels on a surface `surface_height` pixels tall
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32, surface_height: f32) {
        if surface_height <= 0.0 {
            return;
        }
        self.theta_delta -= 2.0 * PI * delta_x * self.rotate_speed / surface_height;
        self.phi_delta -= 2.0 * PI * delta_y * self.rotate_speed / surface_height;
    }

    /// Pan so the scene follows a pointer drag of `delta` pixels
    pub fn pan(&mut self, camera: &Camera3D, delta_x: f32, delta_y: f32, surface_height: f32) {
        if surface_height <= 0.0 {
            return;
        }
        // Size of the visible area at the target distance
        let target_distance = (camera.eye - self.target).magnitude() * (camera.fovy.to_radians() / 2.0).tan();
        let left = 2.0 * delta_x * target_distance / surface_height * self.pan_speed;
        let up = 2.0 * delta_y * target_distance / surface_height * self.pan_speed;

        let (right, camera_up, forward) = camera.basis();
        self.pan_offset -= right * left;
        let up_axis = if self.screen_space_panning {
            camera_up
        } else {
            camera.up.cross(&right).try_normalize(EPS).unwrap_or(forward)
        };
        self.pan_offset += up_axis * up;
    }

    /// Dolly from a scroll delta. Positive deltas (scrolling up) move closer.
    pub fn dolly(&mut self, scroll_delta: f32) {
        if scroll_delta == 0.0 {
            return;
        }
        let notches = (scroll_delta.abs() / SCROLL_NOTCH).max(1.0);
        let step = ZOOM_SCALE.powf(self.zoom_speed * notches);
        if scroll_delta > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Apply pending motion to `camera`. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut Camera3D) -> bool {
        let offset = camera.eye - self.target;
        let radius = offset.magnitude();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > EPS { (offset.y / radius).clamp(-1.0, 1.0).acos() } else { 0.0 };

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        theta += self.theta_delta * factor;
        phi += self.phi_delta * factor;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let previous_eye = camera.eye;
        self.target += self.pan_offset * factor;

        let sin_phi = phi.sin();
        let offset = Vector3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());
        camera.target = self.target;
        camera.eye = self.target + offset;

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.clear_motion();
        }
        self.scale = 1.0;

        (camera.eye - previous_eye).norm_squared() > EPS || self.pan_offset.norm_squared() > EPS
    }

    /// Put the camera at `home` looking at the origin and drop any pending motion
    pub fn reset(&mut self, camera: &mut Camera3D, home: Point3<f32>) {
        self.clear_motion();
        self.target = Point3::origin();
        camera.target = self.target;
        camera.eye = home;
    }

    /// True while damped motion is still settling
    #[cfg(test)]
    pub fn is_moving(&self) -> bool {
        self.theta_delta.abs() > EPS || self.phi_delta.abs() > EPS || self.pan_offset.norm_squared() > EPS
    }

    fn clear_motion(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_offset = Vector3::zeros();
        self.scale = 1.0;
    }
}
