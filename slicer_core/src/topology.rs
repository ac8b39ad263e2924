//! TopologySplit: flood-fill over facet neighbour pointers, producing
//! independent sub-meshes.
//!
//! Grounded in `TriangleMesh::split()`: repeatedly pick the lowest-index
//! unseen facet, BFS through its neighbours (including boundary
//! sentinels, filtered out), and copy the reachable facets into a new
//! mesh, preserving discovery order.

use std::collections::{HashSet, VecDeque};

use crate::error::{InvalidStateError, SlicerError};
use crate::mesh::{Facet, Mesh};

/// `split` from the external interfaces table. Requires a repaired mesh;
/// otherwise fails with `InvalidState`. Each returned sub-mesh is marked
/// `in_memory` so a subsequent repair treats it as freshly constructed
/// rather than re-derivable from an original file, and its derived indices
/// (shared vertices, edge index) are left unbuilt.
pub fn split(mesh: &Mesh) -> Result<Vec<Mesh>, SlicerError> {
    if !mesh.repaired {
        return Err(InvalidStateError::new("split", "mesh is not repaired").into());
    }

    let facet_count = mesh.facet_count();
    let mut seen = HashSet::with_capacity(facet_count);
    let mut components = Vec::new();

    for start in 0..facet_count {
        if seen.contains(&start) {
            continue;
        }

        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut discovered = Vec::new();

        while let Some(facet_idx) = queue.pop_front() {
            if !seen.insert(facet_idx) {
                continue;
            }
            discovered.push(facet_idx);
            for neighbor in mesh.facets()[facet_idx].neighbors {
                if let Some(n) = neighbor {
                    queue.push_back(n.0 as usize);
                }
            }
        }

        components.push(discovered);
    }

    Ok(components
        .into_iter()
        .map(|facet_indices| build_submesh(mesh, &facet_indices))
        .collect())
}

fn build_submesh(mesh: &Mesh, facet_indices: &[usize]) -> Mesh {
    let facets: Vec<Facet> = facet_indices.iter().map(|&i| mesh.facets()[i]).collect();
    let positions: Vec<[glam::Vec3; 3]> = facets.iter().map(|f| f.positions).collect();
    let mut sub = Mesh::from_triangles(positions);
    sub.in_memory = true;
    sub
}
