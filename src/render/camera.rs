//! Orbit camera with a perspective projection.
//!
//! The camera circles a target point: azimuth around the Y axis, elevation
//! above the XZ plane, and a distance clamped to a fixed range. Panning is
//! not supported.

use crate::render::math::{self, Vec3};

/// Where the camera starts, relative to the origin.
pub const DEFAULT_POSITION: Vec3 = [0.0, 2.0, 14.0];
/// Vertical field of view in degrees.
pub const FOV_Y_DEG: f32 = 45.0;
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 50.0;

/// Radians per dragged pixel.
const ORBIT_SPEED: f32 = 0.008;
/// Relative distance change per scrolled point.
const ZOOM_SPEED: f32 = 0.003;
/// Keeps the camera off the poles so the view basis stays defined.
const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;
const NEAR_PLANE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal orbit angle in radians (0 = looking down -Z)
    pub azimuth: f32,
    /// Vertical orbit angle in radians (positive = above the target)
    pub elevation: f32,
    distance: f32,
    pub target: Vec3,
    pub fov_y_deg: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(DEFAULT_POSITION, [0.0; 3])
    }
}

impl OrbitCamera {
    /// Place the camera at `eye`, orbiting `target`.
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = math::sub(eye, target);
        let horizontal = (offset[0] * offset[0] + offset[2] * offset[2]).sqrt();
        Self {
            azimuth: offset[0].atan2(offset[2]),
            elevation: offset[1].atan2(horizontal).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT),
            distance: math::length(offset).clamp(MIN_DISTANCE, MAX_DISTANCE),
            target,
            fov_y_deg: FOV_Y_DEG,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Move along the current view direction, clamped to the zoom range.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn eye(&self) -> Vec3 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        math::add(
            self.target,
            [
                self.distance * sa * ce,
                self.distance * se,
                self.distance * ca * ce,
            ],
        )
    }

    /// Drag in screen pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * ORBIT_SPEED;
        self.elevation = (self.elevation + dy * ORBIT_SPEED).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Scroll delta in points; positive zooms in.
    pub fn zoom(&mut self, scroll: f32) {
        self.set_distance(self.distance * (1.0 - scroll * ZOOM_SPEED).max(0.1));
    }

    /// Freeze the camera for a viewport of `size` pixels.
    pub fn view(&self, size: [f32; 2]) -> View {
        let eye = self.eye();
        let forward = math::normalize(math::sub(self.target, eye));
        let right = math::normalize(math::cross(forward, [0.0, 1.0, 0.0]));
        let up = math::cross(right, forward);
        let half_h = size[1].max(1.0) * 0.5;
        View {
            eye,
            forward,
            right,
            up,
            focal: half_h / (self.fov_y_deg.to_radians() * 0.5).tan(),
            half: [size[0].max(1.0) * 0.5, half_h],
        }
    }
}

/// A camera pose bound to a viewport size, ready to project points.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub eye: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    /// Pixels per unit at distance 1.
    focal: f32,
    half: [f32; 2],
}

/// A point on screen, in pixels from the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub pos: [f32; 2],
    /// Distance along the view direction.
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

impl View {
    /// Project a world point. `None` when behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let rel = math::sub(p, self.eye);
        let depth = math::dot(rel, self.forward);
        if depth < NEAR_PLANE {
            return None;
        }
        let scale = self.focal / depth;
        Some(Projected {
            pos: [
                self.half[0] + math::dot(rel, self.right) * scale,
                self.half[1] - math::dot(rel, self.up) * scale,
            ],
            depth,
            scale,
        })
    }

    /// Distance along the view direction, without projecting.
    pub fn depth_of(&self, p: Vec3) -> f32 {
        math::dot(math::sub(p, self.eye), self.forward)
    }

    pub fn viewport_height(&self) -> f32 {
        self.half[1] * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose_matches_start_position() {
        let cam = OrbitCamera::default();
        let eye = cam.eye();
        for i in 0..3 {
            assert!((eye[i] - DEFAULT_POSITION[i]).abs() < 1e-4, "{:?}", eye);
        }
        assert!((cam.distance() - 200f32.sqrt()).abs() < 1e-4);
        assert_eq!(cam.fov_y_deg, 45.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..200 {
            cam.zoom(120.0);
        }
        assert_eq!(cam.distance(), MIN_DISTANCE);
        for _ in 0..200 {
            cam.zoom(-120.0);
        }
        assert_eq!(cam.distance(), MAX_DISTANCE);
        cam.set_distance(1.0);
        assert_eq!(cam.distance(), MIN_DISTANCE);
    }

    #[test]
    fn orbit_keeps_distance_and_limits_elevation() {
        let mut cam = OrbitCamera::default();
        let d = cam.distance();
        cam.orbit(300.0, 0.0);
        assert!((math::length(cam.eye()) - d).abs() < 1e-3);
        cam.orbit(0.0, 10_000.0);
        assert!(cam.elevation <= ELEVATION_LIMIT);
        assert!(cam.eye()[1] > 0.0);
    }

    #[test]
    fn target_projects_to_center() {
        let view = OrbitCamera::default().view([800.0, 600.0]);
        let p = view.project([0.0; 3]).unwrap();
        assert!((p.pos[0] - 400.0).abs() < 1e-3);
        assert!((p.pos[1] - 300.0).abs() < 1e-3);
        assert!((p.depth - 200f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn screen_axes_follow_world_axes() {
        let view = OrbitCamera::looking_from([0.0, 0.0, 10.0], [0.0; 3]).view([100.0, 100.0]);
        let right = view.project([1.0, 0.0, 0.0]).unwrap();
        let up = view.project([0.0, 1.0, 0.0]).unwrap();
        assert!(right.pos[0] > 50.0);
        assert!(up.pos[1] < 50.0);
        // Half the viewport height spans tan(22.5 deg) * depth world units.
        let edge = view.project([0.0, 10.0 * (22.5f32).to_radians().tan(), 0.0]).unwrap();
        assert!(edge.pos[1].abs() < 1e-2);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let view = OrbitCamera::looking_from([0.0, 0.0, 10.0], [0.0; 3]).view([100.0, 100.0]);
        assert!(view.project([0.0, 0.0, 20.0]).is_none());
        assert!(view.depth_of([0.0, 0.0, 20.0]) < 0.0);
    }
}
