//! # Camera State Management
//!
//! This module drives the camera through the world:
//! - Camera position and orientation tracking
//! - Scripted flight for the headless demo, optionally drifting its heading
//!
//! Which chunk the camera is in is decided by the chunk manager from the
//! camera position, not here.

use cgmath::{Deg, Point3, Rad};
use log::trace;
use web_time::Duration;

use crate::config::CameraConfig;

pub mod camera;

/// Largest heading change per second while wandering, in radians.
const WANDER_RATE: f32 = 0.6;

/// The camera together with how it moves every frame.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Movement speed in units per second
    pub speed: f32,
    /// Source of heading drift; `None` flies straight
    wander: Option<fastrand::Rng>,
}

impl CameraState {
    /// Creates the camera at the configured start pose.
    ///
    /// # Arguments
    /// * `config` - Start position, orientation and speed
    /// * `wander_seed` - Seed of the heading drift, or `None` for a straight flight
    pub fn new(config: &CameraConfig, wander_seed: Option<u64>) -> Self {
        let camera = camera::Camera::new(
            Point3::from(config.start),
            Deg(config.yaw_degrees),
            Deg(config.pitch_degrees),
        );

        CameraState {
            camera,
            speed: config.speed,
            wander: wander_seed.map(fastrand::Rng::with_seed),
        }
    }

    /// World position of the camera.
    pub fn position(&self) -> Point3<f32> {
        self.camera.position
    }

    /// Advances the camera by one frame.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last update
    ///
    /// # Returns
    /// The new camera position
    pub fn update(&mut self, dt: Duration) -> Point3<f32> {
        if let Some(rng) = self.wander.as_mut() {
            let drift = (rng.f32() * 2.0 - 1.0) * WANDER_RATE * dt.as_secs_f32();
            self.camera.turn(Rad(drift), Rad(0.0));
        }
        self.camera.advance(dt, self.speed);

        trace!("Camera at {:?}", self.camera.position);
        self.camera.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_flight_keeps_heading() {
        let mut state = CameraState::new(&CameraConfig::default(), None);
        for _ in 0..60 {
            state.update(Duration::from_secs_f32(1.0 / 60.0));
        }

        let position = state.position();
        assert!((position.x - 13.0).abs() < 1e-3);
        assert_eq!(position.y, 20.0);
        assert_eq!(position.z, 0.0);
    }

    #[test]
    fn wander_is_reproducible() {
        let fly = |seed| {
            let mut state = CameraState::new(&CameraConfig::default(), Some(seed));
            for _ in 0..120 {
                state.update(Duration::from_millis(16));
            }
            state.position()
        };

        assert_eq!(fly(5), fly(5));
        assert_ne!(fly(5), fly(6));
    }
}
