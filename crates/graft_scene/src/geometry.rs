use glam::Vec3;
use uuid::Uuid;

/// Vertex data referenced by drawable nodes.
///
/// Geometry lives in the [`SceneGraph`](crate::SceneGraph) geometry pool and
/// is addressed by [`GeometryKey`](crate::GeometryKey). Copying a drawable
/// copies the key, so every copy keeps pointing at the same payload.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub id: Uuid,
    pub name: String,
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Geometry {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Builds an indexed triangle list.
    #[must_use]
    pub fn with_triangles(name: &str, positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            ..Self::new(name)
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
