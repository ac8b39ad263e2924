//! Mesh builders shared by unit tests across modules, covering the concrete
//! scenarios enumerated for this pipeline: a unit cube, two disjoint cubes,
//! a tetrahedron, and a non-manifold "butterfly" pair of triangles.

#![cfg(test)]

use glam::Vec3;

use crate::mesh::Mesh;
use crate::repair::DefaultRepair;
use crate::repair::Repair;

fn cube_triangles(origin: Vec3, size: f32) -> Vec<[Vec3; 3]> {
    let v = |x: f32, y: f32, z: f32| origin + Vec3::new(x, y, z) * size;
    let corners = [
        v(0.0, 0.0, 0.0), // 0
        v(1.0, 0.0, 0.0), // 1
        v(1.0, 1.0, 0.0), // 2
        v(0.0, 1.0, 0.0), // 3
        v(0.0, 0.0, 1.0), // 4
        v(1.0, 0.0, 1.0), // 5
        v(1.0, 1.0, 1.0), // 6
        v(0.0, 1.0, 1.0), // 7
    ];
    let quads: [[usize; 4]; 6] = [
        [0, 3, 2, 1], // bottom, z=0, normal -Z, CW from above => CCW from below
        [4, 5, 6, 7], // top, z=1
        [0, 1, 5, 4], // -Y
        [1, 2, 6, 5], // +X
        [2, 3, 7, 6], // +Y
        [3, 0, 4, 7], // -X
    ];
    let mut tris = Vec::with_capacity(12);
    for q in quads {
        tris.push([corners[q[0]], corners[q[1]], corners[q[2]]]);
        tris.push([corners[q[0]], corners[q[2]], corners[q[3]]]);
    }
    tris
}

/// A unit cube `{0,1}^3`, repaired (shared vertices welded, neighbours
/// built). 12 facets.
pub fn unit_cube() -> Mesh {
    let mut mesh = Mesh::from_triangles(cube_triangles(Vec3::ZERO, 1.0));
    DefaultRepair::default().repair(&mut mesh);
    mesh
}

/// Two disjoint unit cubes, one centered far from the other, both repaired
/// and merged into a single mesh (24 facets, two connected components).
pub fn two_disjoint_cubes() -> Mesh {
    let mut mesh = Mesh::from_triangles(cube_triangles(Vec3::ZERO, 1.0));
    let other = Mesh::from_triangles(cube_triangles(Vec3::new(10.0, 0.0, 0.0), 1.0));
    mesh.merge(&other);
    DefaultRepair::default().repair(&mut mesh);
    mesh
}

/// A tetrahedron with base in the `z=0` plane and apex at `z=1`, repaired.
pub fn tetrahedron() -> Mesh {
    let base0 = Vec3::new(0.0, 0.0, 0.0);
    let base1 = Vec3::new(1.0, 0.0, 0.0);
    let base2 = Vec3::new(0.5, 1.0, 0.0);
    let apex = Vec3::new(0.5, 0.33, 1.0);
    let tris = vec![
        [base0, base2, base1], // base, viewed from below (normal -Z)
        [base0, base1, apex],
        [base1, base2, apex],
        [base2, base0, apex],
    ];
    let mut mesh = Mesh::from_triangles(tris);
    DefaultRepair::default().repair(&mut mesh);
    mesh
}

/// Two triangles sharing only a single vertex — a non-manifold "butterfly"
/// with no shared edge. Deliberately left unrepaired-friendly: repair must
/// not crash on it, only fail to weld the triangles into one component via
/// an edge (there is none).
pub fn butterfly() -> Mesh {
    let pivot = Vec3::new(0.0, 0.0, 0.5);
    let tris = vec![
        [
            pivot,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ],
        [
            pivot,
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ],
    ];
    let mut mesh = Mesh::from_triangles(tris);
    DefaultRepair::default().repair(&mut mesh);
    mesh
}
