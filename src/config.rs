//! Application configuration
//!
//! Plain structs whose defaults set up the table scene.
//! Builder-style `with_*` methods adjust individual fields.

use std::path::PathBuf;

/// Environment variable that overrides [`AppConfig::asset_dir`].
pub const ASSET_DIR_ENV: &str = "TABLETOP_ASSET_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    /// Directory the scene's texture files are loaded from
    pub asset_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            asset_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/textures")),
        }
    }
}

impl AppConfig {
    /// Defaults with the environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ASSET_DIR_ENV).filter(|dir| !dir.is_empty()) {
            log::info!("Using texture directory from {ASSET_DIR_ENV}: {dir}");
            self.asset_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Tabletop"),
            width: 1800,
            height: 900,
            vsync: true,
        }
    }
}

impl WindowConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

/// Free-fly camera start state. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    /// World units per second
    pub movement_speed: f32,
    /// Degrees per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Vertical field of view
    pub zoom: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-0.5, 3.5, 9.0],
            yaw: -90.0,
            pitch: -45.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_orientation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }
}

/// One point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Phong parameters shared by every surface-shaded object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    pub ambient_strength: f32,
    pub ambient_color: [f32; 3],
    /// Dim gray light
    pub primary: PointLight,
    /// White light
    pub secondary: PointLight,
    pub specular_intensity: f32,
    pub highlight_size: f32,
    pub uv_scale: [f32; 2],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_strength: 0.3,
            ambient_color: [0.5, 0.5, 0.5],
            primary: PointLight {
                position: [1.5, 1.0, 1.0],
                color: [0.5, 0.5, 0.5],
            },
            secondary: PointLight {
                position: [0.5, 1.0, 1.0],
                color: [1.0, 1.0, 1.0],
            },
            specular_intensity: 0.1,
            highlight_size: 4.0,
            uv_scale: [1.0, 1.0],
        }
    }
}

impl LightingConfig {
    /// Ambient term as passed to the shader, strength already applied.
    pub fn ambient(&self) -> [f32; 3] {
        self.ambient_color.map(|c| c * self.ambient_strength)
    }

    pub fn with_ambient(mut self, strength: f32, color: [f32; 3]) -> Self {
        self.ambient_strength = strength;
        self.ambient_color = color;
        self
    }

    pub fn with_lights(mut self, primary: PointLight, secondary: PointLight) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self
    }

    pub fn with_specular(mut self, intensity: f32, highlight_size: f32) -> Self {
        self.specular_intensity = intensity;
        self.highlight_size = highlight_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_table_scene() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1800);
        assert_eq!(config.window.height, 900);
        assert_eq!(config.window.title, "Tabletop");
        assert_eq!(config.camera.position, [-0.5, 3.5, 9.0]);
        assert_eq!(config.camera.zoom, 45.0);
        assert!(config.asset_dir.ends_with("assets/textures"));
    }

    #[test]
    fn test_ambient_is_scaled() {
        let ambient = LightingConfig::default().ambient();
        for c in ambient {
            assert!((c - 0.15).abs() < 1e-6);
        }
    }

    #[test]
    fn test_asset_dir_override() {
        let config = AppConfig::default().with_env_overrides(|key| {
            (key == ASSET_DIR_ENV).then(|| String::from("/tmp/textures"))
        });
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/textures"));

        let untouched = AppConfig::default().with_env_overrides(|_| Some(String::new()));
        assert_eq!(untouched.asset_dir, AppConfig::default().asset_dir);
    }

    #[test]
    fn test_builders() {
        let window = WindowConfig::default()
            .with_title("Test")
            .with_size(640, 480)
            .with_vsync(false);
        assert_eq!(window.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!((window.width, window.height), (640, 480));

        let camera = CameraConfig::default()
            .with_orientation(0.0, 10.0)
            .with_movement_speed(5.0);
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 10.0);
        assert_eq!(camera.movement_speed, 5.0);
    }
}
