//! Plane-sweep slicing kernel.
//!
//! Grounded directly in `TriangleMesh::slice()` in the source project: for
//! each non-horizontal facet, binary-search its Z range against the sorted
//! plane list, then for each plane walk the facet's three sides (reordered
//! to start at the minimum-Z vertex) classifying each as a horizontal edge
//! on the plane, a vertex sitting on the plane, or a crossing edge.

pub mod loop_builder;
pub mod segment;

use glam::{IVec2, Vec3};
use rayon::prelude::*;

use crate::config::SlicerConfig;
use crate::edge_index::EdgeIndex;
use crate::mesh::{Facet, Mesh};
use crate::repair::{DefaultRepair, Repair};
use crate::shared_vertices::{DefaultSharedVertexGen, SharedVertexGen};

use segment::{IntersectionSegment, PointRef, Polygon, SegmentKind};

/// Plane-sweep kernel over a repaired mesh.
pub struct Slicer<'a> {
    mesh: &'a Mesh,
    edges: EdgeIndex,
    config: SlicerConfig,
}

impl<'a> Slicer<'a> {
    /// Build a slicer for `mesh`. The mesh must already have shared
    /// vertices populated (run [`DefaultSharedVertexGen`] or rely on
    /// [`Mesh::slice`] auto-repairing first).
    pub fn new(mesh: &'a Mesh, config: SlicerConfig) -> Self {
        let edges = EdgeIndex::build(mesh);
        Self {
            mesh,
            edges,
            config,
        }
    }

    /// Slice at every height in `z` (sorted, unscaled, ascending). Neither
    /// sorts nor deduplicates `z`. Returns one polygon list per input
    /// height.
    #[tracing::instrument(skip(self))]
    pub fn slice_all(&self, z: &[f64]) -> Vec<Vec<Polygon>> {
        let segments = self.segments_per_plane(z);
        segments
            .into_par_iter()
            .map(|plane_segments| loop_builder::build_loops(plane_segments))
            .collect()
    }

    /// Per-plane intersection segments, before loop stitching. Exposed
    /// separately so tests can inspect the raw segment soup.
    pub fn segments_per_plane(&self, z: &[f64]) -> Vec<Vec<IntersectionSegment>> {
        if z.is_empty() {
            return Vec::new();
        }

        // (plane_idx, facet_idx, segment) triples, computed independently
        // per facet; a stable sort by facet_idx restores determinism after
        // the parallel fan-out.
        let mut contributions: Vec<(usize, usize, IntersectionSegment)> = self
            .mesh
            .facets()
            .par_iter()
            .enumerate()
            .flat_map_iter(|(facet_idx, facet)| {
                self.facet_contributions(facet_idx, facet, z).into_iter()
            })
            .collect();

        contributions.sort_by_key(|(plane_idx, facet_idx, _)| (*plane_idx, *facet_idx));

        let mut buckets = vec![Vec::new(); z.len()];
        for (plane_idx, _facet_idx, segment) in contributions {
            buckets[plane_idx].push(segment);
        }
        buckets
    }

    fn facet_contributions(
        &self,
        facet_idx: usize,
        facet: &Facet,
        z: &[f64],
    ) -> Vec<(usize, usize, IntersectionSegment)> {
        let mut out = Vec::new();
        if facet.is_horizontal() {
            return out;
        }

        let zmin = facet.min_z();
        let zmax = facet.max_z();

        let lo = z.partition_point(|&zk| zk < zmin);
        if lo >= z.len() || z[lo] > zmax {
            return out;
        }
        let hi = z[lo..].partition_point(|&zk| zk <= zmax) + lo;

        let edges = self.edges.edges_of(facet_idx);

        for plane_idx in lo..hi {
            let plane_z = z[plane_idx];
            match self.slice_facet_at_plane(facet_idx as u32, facet, &edges, plane_z) {
                Ok(Some(segment)) => out.push((plane_idx, facet_idx, segment)),
                Ok(None) => {}
                Err(err) => log::warn!("{err}"),
            }
        }
        out
    }

    fn scaled_xy(&self, v: Vec3) -> IVec2 {
        let factor = self.config.scaling_factor;
        IVec2::new(
            (v.x as f64 / factor).round() as i32,
            (v.y as f64 / factor).round() as i32,
        )
    }

    /// Walk a single facet's three sides (reordered to start at the
    /// minimum-Z vertex) against one plane height, per §4.2.
    fn slice_facet_at_plane(
        &self,
        facet_idx: u32,
        facet: &Facet,
        edges: &[crate::mesh::EdgeId; 3],
        plane_z: f64,
    ) -> Result<Option<IntersectionSegment>, crate::error::SlicerError> {
        let zmin = facet.min_z();
        let start = if facet.positions[1].z as f64 == zmin {
            1
        } else if facet.positions[2].z as f64 == zmin {
            2
        } else {
            0
        };

        #[derive(Clone, Copy)]
        struct Point {
            xy: IVec2,
            point_ref: PointRef,
        }

        let mut points: Vec<Point> = Vec::with_capacity(2);
        let mut points_on_layer: Vec<usize> = Vec::new();

        for step in 0..3 {
            let side = (start + step) % 3;
            let next = (side + 1) % 3;
            let edge_id = edges[side];
            let mut a_id = facet.vertex_ids[side];
            let mut b_id = facet.vertex_ids[next];
            let mut a = facet.positions[side];
            let mut b = facet.positions[next];

            let az = a.z as f64;
            let bz = b.z as f64;

            if az == bz && az == plane_z {
                // Horizontal edge lying exactly on this plane.
                let any_vertex_below = facet.positions.iter().any(|p| (p.z as f64) < plane_z);
                let kind = if any_vertex_below {
                    std::mem::swap(&mut a, &mut b);
                    std::mem::swap(&mut a_id, &mut b_id);
                    SegmentKind::Top
                } else {
                    SegmentKind::Bottom
                };
                return Ok(Some(IntersectionSegment {
                    a: self.scaled_xy(a),
                    b: self.scaled_xy(b),
                    a_ref: PointRef::Vertex(a_id),
                    b_ref: PointRef::Vertex(b_id),
                    kind,
                    skip: false,
                }));
            } else if az == plane_z {
                points.push(Point {
                    xy: self.scaled_xy(a),
                    point_ref: PointRef::Vertex(a_id),
                });
                points_on_layer.push(points.len() - 1);
            } else if bz == plane_z {
                points.push(Point {
                    xy: self.scaled_xy(b),
                    point_ref: PointRef::Vertex(b_id),
                });
                points_on_layer.push(points.len() - 1);
            } else if (az < plane_z && bz > plane_z) || (bz < plane_z && az > plane_z) {
                let t = (plane_z - bz as f64) / (az as f64 - bz as f64);
                let interpolated = b + (a - b) * t as f32;
                points.push(Point {
                    xy: self.scaled_xy(interpolated),
                    point_ref: PointRef::Edge(edge_id),
                });
            }
        }

        if !points_on_layer.is_empty() {
            if points_on_layer.len() != 2
                || points[points_on_layer[0]].point_ref != points[points_on_layer[1]].point_ref
            {
                return Err(crate::error::MalformedFacetError {
                    facet: facet_idx,
                    plane_z,
                    point_count: points_on_layer.len(),
                }
                .into());
            }
            if points.len() < 3 {
                // V-shaped facet tangent to the plane at a single vertex.
                return Ok(None);
            }
            points.remove(points_on_layer[1]);
        }

        match points.len() {
            0 => Ok(None),
            2 => {
                let p1 = points[1];
                let p0 = points[0];
                Ok(Some(IntersectionSegment {
                    a: p1.xy,
                    b: p0.xy,
                    a_ref: p1.point_ref,
                    b_ref: p0.point_ref,
                    kind: SegmentKind::Crossing,
                    skip: false,
                }))
            }
            n => Err(crate::error::MalformedFacetError {
                facet: facet_idx,
                plane_z,
                point_count: n,
            }
            .into()),
        }
    }
}

impl Mesh {
    /// `slice` from the external interfaces table: auto-repairs if needed,
    /// then runs the plane-sweep pipeline.
    #[tracing::instrument(skip(self))]
    pub fn slice(&mut self, z: &[f64], config: SlicerConfig) -> Vec<Vec<Polygon>> {
        if !self.repaired {
            DefaultRepair::default().repair(self);
        }
        if self.shared_vertices().is_none() {
            DefaultSharedVertexGen::default().generate_shared_vertices(self);
        }
        Slicer::new(self, config).slice_all(z)
    }
}
