//! # Camera Implementation
//!
//! A first-person camera: a position plus yaw and pitch angles. The headless
//! build has no input, so the camera only moves along its view direction.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use web_time::Duration;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
///
/// Yaw `0` looks along +X and grows towards +Z; pitch `0` is level.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position in world space
    /// * `yaw` - Initial yaw, anything convertible to `Rad<f32>`
    /// * `pitch` - Initial pitch, clamped just short of straight up or down
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Normalized vector pointing where the camera looks.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Moves the camera along its view direction.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last update
    /// * `speed` - Units per second
    pub fn advance(&mut self, dt: Duration, speed: f32) {
        self.position += self.forward() * speed * dt.as_secs_f32();
    }

    /// Rotates the camera by the given yaw and pitch deltas.
    pub fn turn(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw += yaw;
        self.pitch += pitch;
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}
