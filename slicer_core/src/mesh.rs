//! MeshStore: facet array, shared-vertex table, and aggregate stats.

use glam::{Mat4, Vec2, Vec3};
use rayon::prelude::*;

/// Stable index of a shared (deduplicated) vertex within a mesh's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

/// Dense index of a facet within a mesh, `[0, facet_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacetId(pub u32);

/// Dense index of a canonical undirected edge, assigned by [`crate::edge_index::EdgeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

/// A single oriented triangle of the input surface mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// Vertex positions, cached so slicing never has to chase a shared-vertex
    /// lookup for the hot path.
    pub positions: [Vec3; 3],
    /// Shared-vertex ids, valid once [`crate::shared_vertices::SharedVertexGen`]
    /// has run. Placeholder `VertexId(u32::MAX)` beforehand.
    pub vertex_ids: [VertexId; 3],
    pub normal: Vec3,
    /// One neighbour per edge, in the same order as `positions`/`vertex_ids`.
    /// `None` marks a boundary edge.
    pub neighbors: [Option<FacetId>; 3],
}

/// Placeholder vertex id used before shared vertices have been generated.
pub const UNASSIGNED_VERTEX: VertexId = VertexId(u32::MAX);

impl Facet {
    /// Build a facet from raw positions with no shared-vertex ids or
    /// neighbour information yet assigned.
    pub fn from_positions(positions: [Vec3; 3]) -> Self {
        let normal = face_normal(&positions);
        Self {
            positions,
            vertex_ids: [UNASSIGNED_VERTEX; 3],
            normal,
            neighbors: [None; 3],
        }
    }

    pub fn min_z(&self) -> f64 {
        self.positions
            .iter()
            .map(|v| v.z as f64)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_z(&self) -> f64 {
        self.positions
            .iter()
            .map(|v| v.z as f64)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn is_horizontal(&self) -> bool {
        self.min_z() == self.max_z()
    }
}

fn face_normal(positions: &[Vec3; 3]) -> Vec3 {
    let e1 = positions[1] - positions[0];
    let e2 = positions[2] - positions[0];
    e1.cross(e2).normalize_or_zero()
}

/// Axis-aligned bounding box of a mesh's facets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    fn from_facets(facets: &[Facet]) -> Self {
        let mut bbox = Self::empty();
        for facet in facets {
            for p in facet.positions {
                bbox.min = bbox.min.min(p);
                bbox.max = bbox.max.max(p);
            }
        }
        bbox
    }
}

/// MeshStore — owns the facet array, the (optional) shared-vertex table, and
/// aggregate stats. Read-only cursors are provided by facet index; mutation
/// only happens through the transform ops and [`Mesh::merge`], both of which
/// invalidate derived state (shared vertices, edge index, `repaired`).
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    facets: Vec<Facet>,
    shared_vertices: Option<Vec<Vec3>>,
    bounding_box: BoundingBox,
    /// Set by the repair collaborator; cleared by any mutating op.
    pub repaired: bool,
    /// Set by [`crate::topology::split`] on the sub-meshes it produces;
    /// mirrors the source project's "in-memory, source unknown" marker so
    /// repair treats them as freshly constructed rather than re-derivable
    /// from an original file.
    pub in_memory: bool,
}

impl Mesh {
    /// Build a mesh from raw triangle soup. Shared vertices and neighbours
    /// are not yet populated; run a [`crate::shared_vertices::SharedVertexGen`]
    /// and [`crate::repair::Repair`] before slicing or splitting.
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let facets: Vec<Facet> = triangles.into_iter().map(Facet::from_positions).collect();
        let bounding_box = BoundingBox::from_facets(&facets);
        Self {
            facets,
            shared_vertices: None,
            bounding_box,
            repaired: false,
            in_memory: false,
        }
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn facets_mut(&mut self) -> &mut [Facet] {
        &mut self.facets
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn shared_vertices(&self) -> Option<&[Vec3]> {
        self.shared_vertices.as_deref()
    }

    pub fn shared_vertex_count(&self) -> usize {
        self.shared_vertices.as_ref().map_or(0, |v| v.len())
    }

    /// Called by [`crate::shared_vertices::SharedVertexGen`] implementations
    /// to publish the welded vertex table and update each facet's
    /// `vertex_ids`.
    pub fn set_shared_vertices(&mut self, vertices: Vec<Vec3>, facet_vertex_ids: Vec<[VertexId; 3]>) {
        debug_assert_eq!(facet_vertex_ids.len(), self.facets.len());
        for (facet, ids) in self.facets.iter_mut().zip(facet_vertex_ids) {
            facet.vertex_ids = ids;
        }
        self.shared_vertices = Some(vertices);
    }

    fn invalidate_derived(&mut self) {
        self.shared_vertices = None;
        self.repaired = false;
    }

    fn recompute_bounding_box(&mut self) {
        self.bounding_box = BoundingBox::from_facets(&self.facets);
    }

    fn transform_positions(&mut self, f: impl Fn(Vec3) -> Vec3 + Sync) {
        self.facets.par_iter_mut().for_each(|facet| {
            for p in facet.positions.iter_mut() {
                *p = f(*p);
            }
        });
        self.recompute_bounding_box();
        self.invalidate_derived();
    }

    /// Uniform scale about the origin.
    pub fn scale_uniform(&mut self, factor: f32) {
        self.transform_positions(|p| p * factor);
    }

    /// Per-axis scale about the origin.
    pub fn scale_xyz(&mut self, factor: Vec3) {
        self.transform_positions(|p| p * factor);
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.transform_positions(|p| p + offset);
    }

    /// Rotate about the Z axis around a 2D center, matching the source
    /// project's `translate(-center); rotate_z(angle); translate(+center)`
    /// composition.
    pub fn rotate_z(&mut self, angle_radians: f64, center: Vec2) {
        let cos = angle_radians.cos() as f32;
        let sin = angle_radians.sin() as f32;
        let c = Vec3::new(center.x, center.y, 0.0);
        self.transform_positions(move |p| {
            let q = p - c;
            let rotated = Vec3::new(q.x * cos - q.y * sin, q.x * sin + q.y * cos, q.z);
            rotated + c
        });
    }

    /// Apply an arbitrary affine transform, e.g. composed from
    /// [`glam::Mat4::from_scale_rotation_translation`].
    pub fn transform(&mut self, matrix: Mat4) {
        self.transform_positions(move |p| matrix.transform_point3(p));
    }

    /// Translate so the bounding box minimum sits at the origin.
    pub fn align_to_origin(&mut self) {
        let min = self.bounding_box.min;
        self.translate(-min);
    }

    /// Append `other`'s facets to this mesh. Invalidates shared vertices and
    /// the repaired flag; recomputes only the bounding box. Does not
    /// deduplicate vertices, merge coincident facets, or carry over
    /// neighbour pointers (the appended facets' neighbour slots are reset to
    /// boundary until topology is rebuilt).
    pub fn merge(&mut self, other: &Mesh) {
        self.facets.extend(other.facets.iter().map(|f| Facet {
            vertex_ids: [UNASSIGNED_VERTEX; 3],
            neighbors: [None; 3],
            ..*f
        }));
        self.invalidate_derived();
        self.recompute_bounding_box();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        Mesh::from_triangles(vec![[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]])
    }

    #[test]
    fn bounding_box_from_facets() {
        let mesh = unit_triangle();
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn translate_updates_bounding_box_and_invalidates_repaired() {
        let mut mesh = unit_triangle();
        mesh.repaired = true;
        mesh.translate(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.bounding_box().min, Vec3::new(1.0, 0.0, 0.0));
        assert!(!mesh.repaired);
    }

    #[test]
    fn align_to_origin_zeroes_min() {
        let mut mesh = unit_triangle();
        mesh.translate(Vec3::new(5.0, 5.0, 5.0));
        mesh.align_to_origin();
        assert_eq!(mesh.bounding_box().min, Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn merge_appends_facets_and_resets_neighbors() {
        let mut a = unit_triangle();
        let b = unit_triangle();
        a.merge(&b);
        assert_eq!(a.facet_count(), 2);
        assert_eq!(a.facets()[1].neighbors, [None; 3]);
        assert!(!a.repaired);
    }

    #[test]
    fn is_horizontal_detects_flat_facet() {
        let mesh = unit_triangle();
        assert!(mesh.facets()[0].is_horizontal());
    }
}
