//! EdgeIndex: a canonical enumeration of undirected triangle edges, derived
//! once per slice call from the facet-to-vertex-index table.
//!
//! Grounded in the `facets_edges`/`edges_map` construction inlined at the
//! top of `TriangleMesh::slice()` in the source project: for each facet
//! side `(a, b)`, reuse the id of `(b, a)` if already seen (the common
//! reversed-neighbour case), else reuse `(a, b)` itself if already seen
//! (tolerating admesh-style same-orientation duplicate edges), else
//! allocate a fresh id.

use std::collections::HashMap;

use crate::mesh::{EdgeId, Mesh, VertexId};

/// Per-mesh canonical undirected edge table, built once per slice call and
/// discarded afterwards — it is a pure function of the facet→vertex-index
/// table and is invalidated by any mesh mutation.
#[derive(Debug, Clone)]
pub struct EdgeIndex {
    /// `facets_edges[facet][side] -> edge_id`.
    facet_edges: Vec<[EdgeId; 3]>,
    edge_count: u32,
}

impl EdgeIndex {
    /// Build the index. Requires shared vertices to already be populated
    /// (`vertex_ids` must be valid on every facet).
    pub fn build(mesh: &Mesh) -> Self {
        let mut edges_map: HashMap<(VertexId, VertexId), EdgeId> = HashMap::with_capacity(
            mesh.facet_count() * 3,
        );
        let mut facet_edges = Vec::with_capacity(mesh.facet_count());
        let mut next_id = 0u32;

        for facet in mesh.facets() {
            let mut sides = [EdgeId(0); 3];
            for i in 0..3 {
                let a = facet.vertex_ids[i];
                let b = facet.vertex_ids[(i + 1) % 3];

                let edge_id = if let Some(&id) = edges_map.get(&(b, a)) {
                    id
                } else if let Some(&id) = edges_map.get(&(a, b)) {
                    id
                } else {
                    let id = EdgeId(next_id);
                    next_id += 1;
                    edges_map.insert((a, b), id);
                    id
                };
                sides[i] = edge_id;
            }
            facet_edges.push(sides);
        }

        Self {
            facet_edges,
            edge_count: next_id,
        }
    }

    /// The three canonical edge ids used by a facet's three directed sides,
    /// in the same order as `Facet::positions`/`Facet::vertex_ids`.
    pub fn edges_of(&self, facet_idx: usize) -> [EdgeId; 3] {
        self.facet_edges[facet_idx]
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_vertices::{DefaultSharedVertexGen, SharedVertexGen};
    use glam::Vec3;

    fn welded_two_triangles() -> Mesh {
        let mut mesh = Mesh::from_triangles(vec![
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
        ]);
        DefaultSharedVertexGen::default().generate_shared_vertices(&mut mesh);
        mesh
    }

    #[test]
    fn shared_edge_gets_one_id_from_both_facets() {
        let mesh = welded_two_triangles();
        let index = EdgeIndex::build(&mesh);
        // Facet 0's side 1 is (v1 -> v2); facet 1's side 2 is (v2 -> v1) in
        // reverse. Both must resolve to the same edge id.
        let shared_a = index.edges_of(0)[1];
        let shared_b = index.edges_of(1)[2];
        assert_eq!(shared_a, shared_b);
        // Two triangles sharing one edge: 3 + 3 - 1 = 5 distinct edges.
        assert_eq!(index.edge_count(), 5);
    }

    #[test]
    fn same_orientation_duplicate_edge_shares_id() {
        // Two facets whose v0->v1 side is issued in the *same* orientation,
        // mimicking an admesh-style degenerate-but-admissible duplicate.
        let mut mesh = Mesh::from_triangles(vec![
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
            ],
        ]);
        DefaultSharedVertexGen::default().generate_shared_vertices(&mut mesh);
        let index = EdgeIndex::build(&mesh);
        assert_eq!(index.edges_of(0)[0], index.edges_of(1)[0]);
    }
}
