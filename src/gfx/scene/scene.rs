use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    error::{GeometryError, SceneError},
    gfx::{
        camera::camera_utils::CameraManager,
        geometry::{
            build_sphere, build_torus, generate_cube, generate_light_pyramid, generate_prism,
            generate_pyramid, generate_table_plane, GeometryData, SphereConfig, TorusConfig,
        },
    },
};

use super::object::{SceneObject, Transform};

/// The meshes the scene can draw. Each is built once and shared by every
/// object that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    TablePlane,
    Cube,
    Prism,
    Pyramid,
    Sphere,
    Torus,
    LightPyramid,
}

impl MeshKind {
    pub const ALL: [MeshKind; 7] = [
        MeshKind::TablePlane,
        MeshKind::Cube,
        MeshKind::Prism,
        MeshKind::Pyramid,
        MeshKind::Sphere,
        MeshKind::Torus,
        MeshKind::LightPyramid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MeshKind::TablePlane => "Table Plane",
            MeshKind::Cube => "Cube",
            MeshKind::Prism => "Prism",
            MeshKind::Pyramid => "Pyramid",
            MeshKind::Sphere => "Sphere",
            MeshKind::Torus => "Torus",
            MeshKind::LightPyramid => "Light Pyramid",
        }
    }

    pub fn geometry(self) -> Result<GeometryData, GeometryError> {
        Ok(match self {
            MeshKind::TablePlane => generate_table_plane(),
            MeshKind::Cube => generate_cube(),
            MeshKind::Prism => generate_prism(),
            MeshKind::Pyramid => generate_pyramid(),
            MeshKind::Sphere => build_sphere(SphereConfig::default())?,
            MeshKind::Torus => build_torus(TorusConfig::default())?,
            MeshKind::LightPyramid => generate_light_pyramid(),
        })
    }
}

/// Main scene containing objects, textures, and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<SceneObject>,
    /// Texture file names, relative to the asset directory
    pub textures: Vec<String>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            textures: Vec::new(),
        }
    }

    /// Index of a texture file, registering it on first use
    pub fn texture(&mut self, file_name: &str) -> usize {
        match self.textures.iter().position(|t| t == file_name) {
            Some(index) => index,
            None => {
                self.textures.push(file_name.to_owned());
                self.textures.len() - 1
            }
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Adds a surface object textured with `file_name`
    fn add_textured(&mut self, object: SceneObject, file_name: &str) {
        let texture = self.texture(file_name);
        self.add_object(object.with_texture(texture));
    }

    /// Moves the camera by the input gathered since the last frame
    pub fn update(&mut self, dt: Duration) {
        self.camera_manager.update(dt);
    }

    pub fn texture_paths(&self, asset_dir: &Path) -> Vec<PathBuf> {
        self.textures.iter().map(|t| asset_dir.join(t)).collect()
    }

    /// Checks every object's texture reference
    pub fn validate(&self) -> Result<(), SceneError> {
        for object in &self.objects {
            if let Some(index) = object.texture {
                if index >= self.textures.len() {
                    return Err(SceneError::UnknownTexture {
                        object: object.name.clone(),
                        index,
                        available: self.textures.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Meshes referenced by at least one object, in [`MeshKind::ALL`] order
    pub fn used_meshes(&self) -> Vec<MeshKind> {
        MeshKind::ALL
            .into_iter()
            .filter(|kind| self.objects.iter().any(|o| o.mesh == *kind))
            .collect()
    }

    /// The dinner table: turkey on a cutting board, a bowl of sauce with a
    /// spoon, a carving fork, two wooden blocks, and two ceiling lights.
    pub fn table(camera_manager: CameraManager) -> Self {
        use MeshKind::*;

        let mut scene = Self::new(camera_manager);

        scene.add_textured(
            SceneObject::new("table", TablePlane)
                .with_transform(Transform::new([5.0, 2.5, 5.0], [0.0, 0.0, 0.0])),
            "tablePlane.png",
        );
        scene.add_textured(
            SceneObject::new("block", Cube)
                .with_transform(Transform::new([0.9, 0.9, 2.5], [4.5, 0.53, 3.7])),
            "wood.png",
        );
        scene.add_textured(
            SceneObject::new("block lid", Cube)
                .with_transform(Transform::new([0.9, 0.3, 2.5], [4.5, 0.4, 1.3])),
            "this.png",
        );

        // Carving fork
        scene.add_textured(
            SceneObject::new("fork handle", Prism)
                .with_transform(
                    Transform::new([4.99, 5.5, 1.3], [9.49, 1.47, -1.54])
                        .with_rotation(10.5, [1.0, 1.0, 1.0]),
                ),
            "this.png",
        );
        for (name, x) in [("fork prong", 6.3), ("fork prong 2", 5.8)] {
            scene.add_textured(
                SceneObject::new(name, Prism)
                    .with_transform(
                        Transform::new([10.0, 1.4, 0.8], [x, 0.7, -3.8])
                            .with_rotation(180.0, [1.0, 1.0, 1.0]),
                    ),
                "this.png",
            );
        }

        scene.add_textured(
            SceneObject::new("bowl", Torus)
                .with_transform(
                    Transform::new([1.0, 1.0, 4.0], [-3.0, 0.5, 3.0])
                        .with_rotation(-4.0, [-5.0, -6.0, -6.0]),
                ),
            "clay.png",
        );
        scene.add_textured(
            SceneObject::new("spoon", Cube).with_transform(
                Transform::new([0.2, 2.0, 0.2], [-3.0, 1.3, 3.0])
                    .with_rotation(-0.2, [1.3, 1.0, 1.0]),
            ),
            "handle.png",
        );
        scene.add_textured(
            SceneObject::new("sauce", Sphere)
                .with_transform(
                    Transform::new([1.0, 0.2, 1.0], [-3.0, 0.6, 3.0])
                        .with_rotation(-0.2, [1.3, 1.0, 1.0]),
                ),
            "sauce.png",
        );

        // Turkey: body, breast and two drumsticks
        let turkey = [
            ("turkey", [2.0, 1.5, 6.0], -0.2, [1.3, 1.0, 1.0], [2.0, 0.6, -2.2]),
            ("turkey breast", [2.0, 1.5, 4.0], -0.2, [1.3, 1.0, -1.7], [2.0, 0.9, -2.0]),
            ("drumstick", [2.0, 0.7, 0.5], 0.9, [-2.3, -2.0, 0.3], [2.0, 1.9, -0.3]),
            ("drumstick 2", [2.0, 0.7, 0.5], 0.9, [-2.3, -2.0, 0.3], [3.0, 0.6, -0.3]),
        ];
        for (name, scale, angle, axis, translation) in turkey {
            scene.add_textured(
                SceneObject::new(name, Sphere)
                    .with_transform(Transform::new(scale, translation).with_rotation(angle, axis)),
                "tbskin.png",
            );
        }

        scene.add_textured(
            SceneObject::new("cutting board", Cube)
                .with_transform(Transform::new([5.9, 0.1, 8.0], [2.0, 0.0, 0.7])),
            "stone.png",
        );

        scene.add_object(
            SceneObject::new("light", LightPyramid)
                .with_transform(
                    Transform::new([1.0, 0.1, 1.0], [0.4, 9.0, -2.0])
                        .with_rotation(-0.2, [1.0, 0.0, 0.0]),
                )
                .with_color(0.4, 0.4, 0.4)
                .as_light(),
        );
        scene.add_object(
            SceneObject::new("light 2", LightPyramid)
                .with_transform(
                    Transform::new([2.0, 2.0, 2.0], [0.9, 9.0, -1.0])
                        .with_rotation(-0.5, [1.0, 0.0, 0.0]),
                )
                .with_color(0.4, 0.4, 0.4)
                .as_light(),
        );

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CameraConfig, gfx::scene::object::Shading};

    fn table() -> Scene {
        Scene::table(CameraManager::from_config(&CameraConfig::default(), 2.0))
    }

    #[test]
    fn test_every_mesh_kind_builds() {
        for kind in MeshKind::ALL {
            let data = kind.geometry().unwrap();
            assert!(data.triangle_count() > 0, "{}", kind.label());
            assert!(data.indices_in_bounds(), "{}", kind.label());
        }
    }

    #[test]
    fn test_table_scene_is_valid() {
        let scene = table();
        assert_eq!(scene.validate(), Ok(()));
        assert_eq!(scene.objects.len(), 16);
        assert_eq!(scene.textures.len(), 8);
    }

    #[test]
    fn test_surface_objects_are_textured() {
        for object in &table().objects {
            match object.shading {
                Shading::Surface => {
                    assert!(object.texture.is_some(), "{}", object.name);
                    // The surface shader colors from the texture alone
                    assert_eq!(object.color, [1.0, 1.0, 1.0, 1.0], "{}", object.name);
                }
                Shading::Light => {
                    assert_eq!(object.texture, None);
                    assert_eq!(object.mesh, MeshKind::LightPyramid);
                    assert_eq!(object.color, [0.4, 0.4, 0.4, 1.0]);
                }
            }
        }
    }

    #[test]
    fn test_pyramid_is_built_but_unused() {
        let used = table().used_meshes();
        assert!(!used.contains(&MeshKind::Pyramid));
        assert_eq!(used.len(), MeshKind::ALL.len() - 1);
    }

    #[test]
    fn test_textures_are_shared() {
        let mut scene = table();
        let count = scene.textures.len();
        let index = scene.texture("this.png");
        assert_eq!(scene.textures.len(), count);
        assert_eq!(scene.textures[index], "this.png");

        let paths = scene.texture_paths(Path::new("/assets"));
        assert_eq!(paths[0], PathBuf::from("/assets/tablePlane.png"));
    }

    #[test]
    fn test_unknown_texture_is_rejected() {
        let mut scene = table();
        scene.add_object(SceneObject::new("stray", MeshKind::Cube).with_texture(99));
        assert_eq!(
            scene.validate(),
            Err(SceneError::UnknownTexture {
                object: String::from("stray"),
                index: 99,
                available: 8,
            })
        );
    }
}
