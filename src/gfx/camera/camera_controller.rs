use std::{collections::HashSet, time::Duration};

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::{CameraMovement, FlyCamera};

/// Collects keyboard and mouse input between frames and applies it to a
/// [`FlyCamera`] once per frame.
#[derive(Debug, Default)]
pub struct CameraController {
    held: HashSet<CameraMovement>,
    mouse_delta: (f64, f64),
    scroll: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// W/S forward and back, A/D strafe, Q up, E down.
    pub fn movement_for_key(key: KeyCode) -> Option<CameraMovement> {
        match key {
            KeyCode::KeyW => Some(CameraMovement::Forward),
            KeyCode::KeyS => Some(CameraMovement::Backward),
            KeyCode::KeyA => Some(CameraMovement::Left),
            KeyCode::KeyD => Some(CameraMovement::Right),
            KeyCode::KeyQ => Some(CameraMovement::Up),
            KeyCode::KeyE => Some(CameraMovement::Down),
            _ => None,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::MouseWheel { delta } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
            }
            DeviceEvent::MouseMotion { delta } => {
                self.mouse_delta.0 += delta.0;
                self.mouse_delta.1 += delta.1;
            }
            _ => (),
        }
    }

    /// Returns true if the key drives the camera.
    pub fn process_keyed_events(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(key) = event.physical_key else {
            return false;
        };
        self.process_key(key, event.state)
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let Some(movement) = Self::movement_for_key(key) else {
            return false;
        };
        match state {
            ElementState::Pressed => self.held.insert(movement),
            ElementState::Released => self.held.remove(&movement),
        };
        true
    }

    pub fn is_held(&self, movement: CameraMovement) -> bool {
        self.held.contains(&movement)
    }

    /// Apply and clear the input gathered since the last frame.
    pub fn update_camera(&mut self, camera: &mut FlyCamera, dt: Duration) {
        let dt = dt.as_secs_f32();
        for &movement in &self.held {
            camera.process_keyboard(movement, dt);
        }

        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        if dx != 0.0 || dy != 0.0 {
            // screen y grows downwards
            camera.process_mouse_movement(dx as f32, -dy as f32);
        }

        let scroll = std::mem::take(&mut self.scroll);
        if scroll != 0.0 {
            camera.process_mouse_scroll(scroll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use cgmath::InnerSpace;

    fn camera() -> FlyCamera {
        FlyCamera::new(&CameraConfig::default(), 2.0)
    }

    #[test]
    fn test_held_keys_move_every_frame() {
        let mut controller = CameraController::new();
        let mut camera = camera();
        let start = camera.position;

        assert!(controller.process_key(KeyCode::KeyQ, ElementState::Pressed));
        controller.update_camera(&mut camera, Duration::from_secs(1));
        controller.update_camera(&mut camera, Duration::from_secs(1));
        assert!(((camera.position - start) - camera.up * 5.0).magnitude() < 1e-5);

        controller.process_key(KeyCode::KeyQ, ElementState::Released);
        let stopped = camera.position;
        controller.update_camera(&mut camera, Duration::from_secs(1));
        assert_eq!(camera.position, stopped);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut controller = CameraController::new();
        assert!(!controller.process_key(KeyCode::Escape, ElementState::Pressed));
        assert!(!controller.process_key(KeyCode::KeyX, ElementState::Pressed));
        assert!(controller.process_key(KeyCode::KeyE, ElementState::Pressed));
        assert!(controller.is_held(CameraMovement::Down));
    }

    #[test]
    fn test_mouse_motion_is_consumed_once() {
        let mut controller = CameraController::new();
        let mut camera = camera();
        let pitch = camera.pitch;

        controller.process_events(&DeviceEvent::MouseMotion { delta: (0.0, -20.0) });
        controller.update_camera(&mut camera, Duration::ZERO);
        assert!((camera.pitch - (pitch + 2.0)).abs() < 1e-5);

        controller.update_camera(&mut camera, Duration::ZERO);
        assert!((camera.pitch - (pitch + 2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_scroll_zooms_in() {
        let mut controller = CameraController::new();
        let mut camera = camera();
        controller.process_events(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 3.0),
        });
        controller.update_camera(&mut camera, Duration::ZERO);
        assert_eq!(camera.zoom, 42.0);
        assert_eq!(camera.front, FlyCamera::new(&CameraConfig::default(), 2.0).front);
    }
}
