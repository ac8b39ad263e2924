//! Shared-vertex generation: the external collaborator that welds a facet
//! soup's per-facet positions into a deduplicated vertex table and
//! populates each facet's `vertex_ids`.
//!
//! Grounded in the teacher's `VertexMap`, an `rstar::RTree`-backed
//! nearest-point welding structure used to deduplicate LDraw part geometry.

use glam::Vec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::mesh::{Mesh, VertexId};

/// `generate_shared_vertices(&mut mesh)` from the external interfaces table:
/// populates `vertex_id` indexing. Any subsequent facet mutation invalidates
/// the table (see [`Mesh::merge`] and the transform ops on [`Mesh`]).
pub trait SharedVertexGen {
    fn generate_shared_vertices(&self, mesh: &mut Mesh);
}

/// Default implementation: weld facet-local positions within `epsilon` of an
/// already-inserted shared vertex, otherwise allocate a new one.
pub struct DefaultSharedVertexGen {
    pub epsilon: f32,
}

impl Default for DefaultSharedVertexGen {
    fn default() -> Self {
        Self { epsilon: 1e-5 }
    }
}

struct IndexedPoint {
    position: [f32; 3],
    id: u32,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index used while welding; mirrors the teacher's `VertexMap`.
struct VertexMap {
    tree: RTree<IndexedPoint>,
    vertices: Vec<Vec3>,
    epsilon_sq: f32,
}

impl VertexMap {
    fn new(epsilon: f32) -> Self {
        Self {
            tree: RTree::new(),
            vertices: Vec::new(),
            epsilon_sq: epsilon * epsilon,
        }
    }

    fn get_or_insert(&mut self, position: Vec3) -> VertexId {
        let query = position.to_array();
        if let Some(nearest) = self.tree.nearest_neighbor(&query) {
            if nearest.distance_2(&query) <= self.epsilon_sq {
                return VertexId(nearest.id);
            }
        }
        let id = self.vertices.len() as u32;
        self.vertices.push(position);
        self.tree.insert(IndexedPoint { position: query, id });
        VertexId(id)
    }
}

impl SharedVertexGen for DefaultSharedVertexGen {
    fn generate_shared_vertices(&self, mesh: &mut Mesh) {
        let mut map = VertexMap::new(self.epsilon);
        let mut facet_ids = Vec::with_capacity(mesh.facet_count());
        for facet in mesh.facets() {
            let mut ids = [VertexId(0); 3];
            for (i, p) in facet.positions.iter().enumerate() {
                ids[i] = map.get_or_insert(*p);
            }
            facet_ids.push(ids);
        }
        mesh.set_shared_vertices(map.vertices, facet_ids);
    }
}
