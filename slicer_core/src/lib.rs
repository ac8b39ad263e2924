//! Core plane-sweep slicing engine for a triangle-mesh-based 3D printing
//! toolchain.
//!
//! Given a closed (or repairable) triangular surface mesh and a sorted list
//! of horizontal cutting planes, [`mesh::Mesh::slice`] produces, for each
//! plane, a set of closed planar polygons representing the mesh's
//! cross-section at that height. [`topology::split`] partitions a mesh
//! along facet-neighbour connectivity; [`mesh::Mesh::merge`] concatenates
//! two meshes.
//!
//! STL/OBJ parsing and writing, a production-strength repair pipeline, and
//! a real polygon Boolean/offset kernel are out of scope — they're named as
//! collaborator traits ([`repair::Repair`], [`shared_vertices::SharedVertexGen`],
//! [`geometry2d::Boolean2D`], [`geometry2d::ConvexHull2D`]) with minimal
//! default implementations so the pipeline is independently testable.

pub use glam;

pub mod config;
pub mod edge_index;
pub mod error;
pub mod geometry2d;
pub mod mesh;
pub mod repair;
pub mod shared_vertices;
pub mod slice;
pub mod topology;

#[cfg(test)]
mod test_fixtures;

pub use config::SlicerConfig;
pub use error::SlicerError;
pub use mesh::{EdgeId, Facet, FacetId, Mesh, VertexId};
pub use slice::segment::Polygon;
pub use slice::Slicer;

/// Commonly-used items, for `use slicer_core::prelude::*;`.
pub mod prelude {
    pub use crate::config::SlicerConfig;
    pub use crate::error::SlicerError;
    pub use crate::mesh::{Mesh, VertexId};
    pub use crate::repair::{DefaultRepair, Repair};
    pub use crate::shared_vertices::{DefaultSharedVertexGen, SharedVertexGen};
    pub use crate::slice::segment::Polygon;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn unit_cube_slices_to_one_square_at_midplane() {
        let mut mesh = test_fixtures::unit_cube();
        let layers = mesh.slice(&[0.5], SlicerConfig::default());
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].len(), 1);
        // Each vertical face is two triangles sharing a slanted diagonal
        // (e.g. corner 0 -> corner 5 on the -Y face); the plane crosses
        // that diagonal at its midpoint, so every face contributes two
        // collinear crossing segments instead of one. The loop chains all
        // 8 into a single polygon: 4 corners plus 4 edge-midpoints.
        assert_eq!(layers[0][0].points.len(), 8);
    }

    #[test]
    fn unit_cube_slices_to_square_at_bottom_and_top() {
        let mut mesh = test_fixtures::unit_cube();
        let layers = mesh.slice(&[0.0, 1.0], SlicerConfig::default());
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].len(), 1, "bottom face via Bottom-tagged edges");
        assert_eq!(layers[1].len(), 1, "top face via Top-tagged edges");
    }

    #[test]
    fn tetrahedron_midplane_is_one_triangle_apex_plane_is_empty() {
        let mut mesh = test_fixtures::tetrahedron();
        let layers = mesh.slice(&[0.5, 1.0], SlicerConfig::default());
        assert_eq!(layers[0].len(), 1);
        assert_eq!(layers[0][0].points.len(), 3);
        assert!(layers[1].is_empty(), "single-vertex tangency dedups to nothing");
    }

    #[test]
    fn two_disjoint_cubes_slice_independently() {
        let mut mesh = test_fixtures::two_disjoint_cubes();
        let layers = mesh.slice(&[0.5], SlicerConfig::default());
        assert_eq!(layers[0].len(), 2);
    }

    #[test]
    fn non_manifold_butterfly_yields_no_polygons() {
        let mut mesh = test_fixtures::butterfly();
        let layers = mesh.slice(&[0.5], SlicerConfig::default());
        assert!(layers[0].is_empty());
    }

    #[test]
    fn repair_idempotence_matches_single_repair_output() {
        let mut once = test_fixtures::unit_cube();
        let mut twice = once.clone();
        twice.repaired = false;
        crate::repair::DefaultRepair::default().repair(&mut twice);

        let z = [0.5];
        let config = SlicerConfig::default();
        assert_eq!(once.slice(&z, config), twice.slice(&z, config));
    }

    #[test]
    fn merge_preserves_facet_count_associativity() {
        let a = test_fixtures::unit_cube();
        let b = test_fixtures::unit_cube();
        let c = test_fixtures::unit_cube();

        let mut left = a.clone();
        left.merge(&b);
        left.merge(&c);

        let mut bc = b.clone();
        bc.merge(&c);
        let mut right = a.clone();
        right.merge(&bc);

        assert_eq!(left.facet_count(), right.facet_count());
        assert_eq!(left.bounding_box().min, right.bounding_box().min);
        assert_eq!(left.bounding_box().max, right.bounding_box().max);
    }

    #[test]
    fn scale_and_translate_move_bounding_box() {
        let mut mesh = test_fixtures::unit_cube();
        mesh.scale_uniform(2.0);
        mesh.translate(Vec3::new(1.0, 0.0, 0.0));
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(3.0, 2.0, 2.0));
    }
}
