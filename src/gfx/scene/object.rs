use cgmath::{InnerSpace, Matrix, Matrix4, Rad, SquareMatrix, Vector3, Zero};

use crate::{
    gfx::camera::camera_utils::convert_matrix4_to_array,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::scene::MeshKind;

/// Which pipeline draws an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Textured Phong lighting
    Surface,
    /// Flat color, used for the light markers
    Light,
}

impl Shading {
    pub fn pipeline_name(self) -> &'static str {
        match self {
            Shading::Surface => "Surface",
            Shading::Light => "Light",
        }
    }
}

/// Scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    /// Angle in radians about an axis; the axis need not be normalized
    pub rotation: Option<(f32, Vector3<f32>)>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::zero(),
            rotation: None,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(scale: [f32; 3], translation: [f32; 3]) -> Self {
        Self {
            translation: translation.into(),
            rotation: None,
            scale: scale.into(),
        }
    }

    pub fn with_rotation(mut self, angle: f32, axis: [f32; 3]) -> Self {
        self.rotation = Some((angle, axis.into()));
        self
    }

    /// T * R * S
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.translation);
        let r = match self.rotation {
            Some((angle, axis)) if angle != 0.0 && axis.magnitude2() > 0.0 => {
                Matrix4::from_axis_angle(axis.normalize(), Rad(angle))
            }
            _ => Matrix4::identity(),
        };
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }

    /// Inverse transpose of the model matrix, for transforming normals.
    ///
    /// Falls back to the model matrix itself when it is singular.
    pub fn normal_matrix(&self) -> Matrix4<f32> {
        let model = self.model_matrix();
        model.invert().map_or(model, |inverse| inverse.transpose())
    }
}

/// One drawable in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshKind,
    /// Index into the scene's texture list
    pub texture: Option<usize>,
    pub transform: Transform,
    /// Only the light pipeline reads this; surface objects take their color
    /// from the texture
    pub color: [f32; 4],
    pub shading: Shading,
}

impl SceneObject {
    pub fn new(name: &str, mesh: MeshKind) -> Self {
        Self {
            name: name.to_owned(),
            mesh,
            texture: None,
            transform: Transform::default(),
            color: [1.0, 1.0, 1.0, 1.0],
            shading: Shading::Surface,
        }
    }

    pub fn with_texture(mut self, texture: usize) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = [r, g, b, 1.0];
        self
    }

    /// Draw with the flat light shader instead of the textured surface shader
    pub fn as_light(mut self) -> Self {
        self.shading = Shading::Light;
        self
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: convert_matrix4_to_array(self.transform.model_matrix()),
            normal_matrix: convert_matrix4_to_array(self.transform.normal_matrix()),
            color: self.color,
        }
    }
}

/// MUST match the `Object` struct in the shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
}

// GPU resources for one object: its uniform buffer and bind group
pub struct ObjectGpuResources {
    pub uniform: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

impl ObjectGpuResources {
    pub fn bind_group_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Object Bind Group Layout")
    }

    pub fn new(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        object: &SceneObject,
    ) -> Self {
        let uniform = UniformBuffer::new_with_data(device, &object.uniform());
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .create(device, &format!("{} Bind Group", object.name));
        Self {
            uniform,
            bind_group,
        }
    }

    /// Re-upload the object's transform and color if they changed
    pub fn update(&mut self, queue: &wgpu::Queue, object: &SceneObject) {
        self.uniform.update_content(queue, object.uniform());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Transform as _};

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
    }

    #[test]
    fn test_scale_then_translate() {
        let transform = Transform::new([2.0, 3.0, 4.0], [1.0, 1.0, 1.0]);
        let p = transform
            .model_matrix()
            .transform_point(Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_rotation_applies_before_translation() {
        let transform = Transform::new([1.0, 1.0, 1.0], [0.0, 5.0, 0.0])
            .with_rotation(std::f32::consts::FRAC_PI_2, [0.0, 0.0, 2.0]);
        let p = transform
            .model_matrix()
            .transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!(close(Vector3::new(p.x, p.y, p.z), Vector3::new(0.0, 6.0, 0.0)));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let plain = Transform::new([5.0, 2.5, 5.0], [0.0, 0.0, 0.0]);
        let rotated = plain.with_rotation(0.0, [1.0, 1.0, 1.0]);
        assert_eq!(plain.model_matrix(), rotated.model_matrix());
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        // A flattened, rotated object: the transformed normal must stay
        // perpendicular to the transformed surface.
        let transform = Transform::new([1.0, 0.2, 1.0], [-3.0, 0.6, 3.0])
            .with_rotation(-0.2, [1.3, 1.0, 1.0]);
        let model = transform.model_matrix();
        let normal_matrix = transform.normal_matrix();

        let normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let tangent = Vector3::new(1.0, -1.0, 0.0);
        let n = normal_matrix.transform_vector(normal);
        let t = model.transform_vector(tangent);
        assert!(n.dot(t).abs() < 1e-4, "{}", n.dot(t));
    }

    #[test]
    fn test_singular_transform_falls_back_to_model() {
        let flat = Transform::new([1.0, 0.0, 1.0], [0.0, 0.0, 0.0]);
        assert_eq!(flat.normal_matrix(), flat.model_matrix());
    }

    #[test]
    fn test_object_builder() {
        let object = SceneObject::new("marker", MeshKind::LightPyramid)
            .with_color(0.4, 0.4, 0.4)
            .as_light();
        assert_eq!(object.shading, Shading::Light);
        assert_eq!(object.shading.pipeline_name(), "Light");
        assert_eq!(object.texture, None);
        assert_eq!(object.uniform().color, [0.4, 0.4, 0.4, 1.0]);
    }
}
