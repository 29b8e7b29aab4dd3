//! First-person fly camera controller.
//!
//! [`FlyCameraController`] turns per-frame input into a new [`CameraState`].
//! It keeps only what it needs to derive pointer deltas; the camera itself is
//! passed in and returned, so several independent cameras can share one
//! controller type.
//!
//! # Controls
//!
//! - **Pointer**: look around (yaw/pitch, pitch clamped to ±89°)
//! - **W/S**: move along the view direction
//! - **A/D**: strafe left/right
//! - **Q/E**: move up/down along world up
//! - **P/O**: switch to perspective/orthographic projection
//! - **Scroll**: dolly along the view direction
//!
//! # Example
//!
//! ```ignore
//! let config = CameraConfig::default();
//! let mut controller = FlyCameraController::new(&config);
//! let mut camera = CameraState::new(&config);
//!
//! // In the frame loop:
//! camera = controller.update(camera, &input, dt);
//!
//! // From the scroll event handler:
//! controller.scroll(&mut camera, lines);
//! ```

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::camera::{CameraConfig, CameraState, ProjectionMode, front_from_angles};
use crate::input::Input;

/// Pitch limit in degrees, keeps the view from flipping over the pole.
pub const PITCH_LIMIT: f32 = 89.0;

#[derive(Clone, Debug)]
pub struct FlyCameraController {
    /// Degrees per pixel of pointer motion.
    pub sensitivity: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    last_pointer: Option<Vec2>,
}

impl FlyCameraController {
    /// Controller using the configured sensitivity and speed.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            sensitivity: config.sensitivity,
            speed: config.speed,
            last_pointer: None,
        }
    }

    /// Advance the camera by one frame of input.
    ///
    /// The first pointer sample only sets the baseline, so the camera does
    /// not jump to wherever the cursor happened to start. Frames without a
    /// sample leave the view direction alone and drop the baseline.
    pub fn update(&mut self, mut camera: CameraState, input: &Input, dt: f32) -> CameraState {
        let pointer = input.pointer_position();
        if let (Some(pointer), Some(last)) = (pointer, self.last_pointer) {
            // Window y grows downward, pitch grows upward.
            let offset = Vec2::new(pointer.x - last.x, last.y - pointer.y) * self.sensitivity;
            camera.yaw += offset.x;
            camera.pitch = (camera.pitch + offset.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            camera.front = front_from_angles(camera.yaw, camera.pitch);
        }
        self.last_pointer = pointer;

        let step = self.speed * dt;
        let right = camera.right();
        if input.key_down(KeyCode::KeyW) {
            camera.position += camera.front * step;
        }
        if input.key_down(KeyCode::KeyS) {
            camera.position -= camera.front * step;
        }
        if input.key_down(KeyCode::KeyA) {
            camera.position -= right * step;
        }
        if input.key_down(KeyCode::KeyD) {
            camera.position += right * step;
        }
        if input.key_down(KeyCode::KeyQ) {
            camera.position += camera.up * step;
        }
        if input.key_down(KeyCode::KeyE) {
            camera.position -= camera.up * step;
        }

        if input.key_down(KeyCode::KeyP) && camera.projection != ProjectionMode::Perspective {
            log::debug!("switching to perspective projection");
            camera.projection = ProjectionMode::Perspective;
        }
        if input.key_down(KeyCode::KeyO) && camera.projection != ProjectionMode::Orthographic {
            log::debug!("switching to orthographic projection");
            camera.projection = ProjectionMode::Orthographic;
        }

        camera
    }

    /// Move along the view direction by `delta` units, independent of frame time.
    pub fn scroll(&self, camera: &mut CameraState, delta: f32) {
        camera.position += camera.front * delta;
    }
}
