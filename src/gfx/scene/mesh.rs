use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::GeometryData;

/// Lifecycle of a [`GpuMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshState {
    Unallocated,
    Built,
    Destroyed,
}

/// GPU buffers for one piece of generated geometry.
///
/// The mesh owns its buffers from [`GpuMesh::build`] until it is dropped or
/// passed to [`GpuMesh::destroy`]; the buffers are released exactly once.
pub struct GpuMesh {
    label: String,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
    state: MeshState,
}

impl Default for GpuMesh {
    fn default() -> Self {
        Self::unallocated("Mesh")
    }
}

impl GpuMesh {
    /// An empty mesh waiting for [`GpuMesh::upload`].
    pub fn unallocated(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            vertex_buffer: None,
            index_buffer: None,
            vertex_count: 0,
            index_count: 0,
            state: MeshState::Unallocated,
        }
    }

    pub fn build(device: &wgpu::Device, data: &GeometryData) -> Self {
        Self::build_labeled(device, data, "Mesh")
    }

    pub fn build_labeled(device: &wgpu::Device, data: &GeometryData, label: &str) -> Self {
        let mut mesh = Self::unallocated(label);
        mesh.upload(device, data);
        mesh
    }

    /// Upload geometry into an unallocated mesh.
    pub fn upload(&mut self, device: &wgpu::Device, data: &GeometryData) {
        debug_assert_eq!(
            self.state,
            MeshState::Unallocated,
            "mesh '{}' uploaded twice",
            self.label
        );
        debug_assert!(data.indices_in_bounds(), "mesh '{}' index out of range", self.label);

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.label)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = data.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", self.label)),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        self.vertex_count = data.vertex_count() as u32;
        self.index_count = data.index_count() as u32;
        self.state = MeshState::Built;

        log::debug!(
            "Built mesh '{}': {} vertices, {} indices",
            self.label,
            self.vertex_count,
            self.index_count
        );
    }

    /// Release the GPU buffers now instead of at drop.
    pub fn destroy(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(buffer) = self.vertex_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.index_buffer.take() {
            buffer.destroy();
        }
        if self.state == MeshState::Built {
            log::trace!("Released mesh '{}'", self.label);
        }
        self.state = MeshState::Destroyed;
    }

    pub fn state(&self) -> MeshState {
        self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        if self.state != MeshState::Destroyed {
            self.release();
        }
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a GpuMesh, instances: Range<u32>);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b GpuMesh, instances: Range<u32>) {
        debug_assert_eq!(
            mesh.state,
            MeshState::Built,
            "drawing mesh '{}' outside its built state",
            mesh.label
        );
        let Some(vertex_buffer) = &mesh.vertex_buffer else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        match &mesh.index_buffer {
            Some(index_buffer) => {
                self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                self.draw_indexed(0..mesh.index_count, 0, instances);
            }
            None => self.draw(0..mesh.vertex_count, instances),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mesh_is_unallocated() {
        let mesh = GpuMesh::default();
        assert_eq!(mesh.state(), MeshState::Unallocated);
        assert_eq!(mesh.vertex_count(), 0);
        assert!(!mesh.is_indexed());
    }

    #[test]
    fn test_unallocated_mesh_keeps_its_label() {
        let mesh = GpuMesh::unallocated("Sphere");
        assert_eq!(mesh.label(), "Sphere");
        assert_eq!(mesh.state(), MeshState::Unallocated);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(GpuMesh::default().label(), "Mesh");
    }

    #[test]
    fn test_release_moves_to_destroyed_once() {
        let mut mesh = GpuMesh::default();
        mesh.release();
        assert_eq!(mesh.state(), MeshState::Destroyed);
        mesh.release();
        assert_eq!(mesh.state(), MeshState::Destroyed);
        mesh.destroy();
    }
}
