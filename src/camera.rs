use bevy_ecs::prelude::Resource;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use winit::dpi::PhysicalSize;

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Camera position plus XYZ Euler rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }
}

/// Perspective camera driven by a pose rather than a look-at target.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub pose: CameraPose,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(pose: CameraPose, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { pose, fov_y_radians, near, far }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.pose.orientation(), self.pose.position).inverse()
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, viewport: PhysicalSize<u32>) -> Mat4 {
        let aspect = if viewport.height > 0 { viewport.width as f32 / viewport.height as f32 } else { 1.0 };
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray through a screen-space position, for host-side picking.
    pub fn screen_ray(&self, screen: Vec2, viewport: PhysicalSize<u32>) -> Option<(Vec3, Vec3)> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let ndc_x = (2.0 * screen.x / viewport.width as f32) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / viewport.height as f32);
        let clip = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let inv_view_proj = self.view_projection(viewport).inverse();
        let world = inv_view_proj * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let dir = ((world.truncate() / world.w) - self.pose.position).normalize();
        Some((self.pose.position, dir))
    }
}

/// Limits and enable flag of the user-driven orbit around the room.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct OrbitControls {
    #[serde(skip, default = "OrbitControls::default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub target: Vec3,
    #[serde(default = "OrbitControls::default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "OrbitControls::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "OrbitControls::default_min_azimuth")]
    pub min_azimuth: f32,
    #[serde(default = "OrbitControls::default_max_azimuth")]
    pub max_azimuth: f32,
    #[serde(default = "OrbitControls::default_min_polar")]
    pub min_polar: f32,
    #[serde(default = "OrbitControls::default_max_polar")]
    pub max_polar: f32,
    #[serde(default = "OrbitControls::default_rotate_speed")]
    pub rotate_speed: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            target: Vec3::ZERO,
            min_distance: Self::default_min_distance(),
            max_distance: Self::default_max_distance(),
            min_azimuth: Self::default_min_azimuth(),
            max_azimuth: Self::default_max_azimuth(),
            min_polar: Self::default_min_polar(),
            max_polar: Self::default_max_polar(),
            rotate_speed: Self::default_rotate_speed(),
        }
    }
}

impl OrbitControls {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_min_distance() -> f32 {
        0.9
    }

    const fn default_max_distance() -> f32 {
        1.6
    }

    const fn default_min_azimuth() -> f32 {
        0.2
    }

    fn default_max_azimuth() -> f32 {
        PI * 0.78
    }

    const fn default_min_polar() -> f32 {
        0.3
    }

    const fn default_max_polar() -> f32 {
        FRAC_PI_2
    }

    const fn default_rotate_speed() -> f32 {
        1.0
    }

    /// Rotates the pose around the target by a drag delta in pixels; `None` while disabled.
    pub fn orbit(&self, pose: &CameraPose, drag: Vec2, viewport: PhysicalSize<u32>) -> Option<CameraPose> {
        if !self.enabled || viewport.height == 0 {
            return None;
        }
        let scale = 2.0 * PI * self.rotate_speed / viewport.height as f32;
        let (radius, azimuth, polar) = self.spherical(pose.position);
        Some(self.pose_from_spherical(radius, azimuth - drag.x * scale, polar - drag.y * scale))
    }

    /// Dolly towards (`factor` < 1) or away from the target; `None` while disabled.
    pub fn zoom(&self, pose: &CameraPose, factor: f32) -> Option<CameraPose> {
        if !self.enabled || !(factor.is_finite() && factor > 0.0) {
            return None;
        }
        let (radius, azimuth, polar) = self.spherical(pose.position);
        Some(self.pose_from_spherical(radius * factor, azimuth, polar))
    }

    /// Pulls an arbitrary pose back inside the configured limits.
    pub fn clamp(&self, pose: &CameraPose) -> CameraPose {
        let (radius, azimuth, polar) = self.spherical(pose.position);
        self.pose_from_spherical(radius, azimuth, polar)
    }

    fn spherical(&self, position: Vec3) -> (f32, f32, f32) {
        let offset = position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return (0.0, 0.0, 0.0);
        }
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, azimuth, polar)
    }

    fn pose_from_spherical(&self, radius: f32, azimuth: f32, polar: f32) -> CameraPose {
        let radius = radius.clamp(self.min_distance, self.max_distance.max(self.min_distance));
        let azimuth = azimuth.clamp(self.min_azimuth, self.max_azimuth.max(self.min_azimuth));
        let polar = polar.clamp(self.min_polar, self.max_polar.max(self.min_polar)).clamp(0.0001, PI - 0.0001);
        let offset = Vec3::new(polar.sin() * azimuth.sin(), polar.cos(), polar.sin() * azimuth.cos()) * radius;
        let position = self.target + offset;
        CameraPose::new(position, look_rotation(position, self.target))
    }
}

/// XYZ Euler rotation that points a camera at `position` towards `target`.
pub fn look_rotation(position: Vec3, target: Vec3) -> Vec3 {
    let world_from_view = Mat4::look_at_rh(position, target, DEFAULT_UP).inverse();
    let (_, rotation, _) = world_from_view.to_scale_rotation_translation();
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}
