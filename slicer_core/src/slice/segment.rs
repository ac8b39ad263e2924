//! Intersection point/segment data model shared by the per-facet sweep
//! (`slice/mod.rs`) and the loop stitcher (`slice/loop_builder.rs`).

use glam::IVec2;

use crate::mesh::{EdgeId, VertexId};

/// What an intersection point's identity is anchored to. The source
/// project represents this as two independent `-1`-sentinel fields
/// (`point_id`, `edge_id`); here it's a sum type, since exactly one of the
/// two is ever meaningful for a given point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRef {
    /// The intersection lands exactly on this shared vertex.
    Vertex(VertexId),
    /// The intersection lies strictly inside this canonical edge.
    Edge(EdgeId),
}

/// Whether a segment came from a genuine crossing or from a horizontal
/// facet edge lying exactly on the cutting plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// An ordinary crossing segment.
    Crossing,
    /// A horizontal edge capping the solid from above at this plane.
    Top,
    /// A horizontal edge capping the solid from below at this plane.
    Bottom,
}

/// One facet's contribution to one plane's cross-section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSegment {
    pub a: IVec2,
    pub b: IVec2,
    pub a_ref: PointRef,
    pub b_ref: PointRef,
    pub kind: SegmentKind,
    /// Set by loop-builder's tangent-pruning pass; segments marked skipped
    /// take no further part in stitching.
    pub skip: bool,
}

impl IntersectionSegment {
    pub fn edge_a(&self) -> Option<EdgeId> {
        match self.a_ref {
            PointRef::Edge(id) => Some(id),
            PointRef::Vertex(_) => None,
        }
    }

    pub fn edge_b(&self) -> Option<EdgeId> {
        match self.b_ref {
            PointRef::Edge(id) => Some(id),
            PointRef::Vertex(_) => None,
        }
    }

    pub fn vertex_a(&self) -> Option<VertexId> {
        match self.a_ref {
            PointRef::Vertex(id) => Some(id),
            PointRef::Edge(_) => None,
        }
    }

    pub fn vertex_b(&self) -> Option<VertexId> {
        match self.b_ref {
            PointRef::Vertex(id) => Some(id),
            PointRef::Edge(_) => None,
        }
    }
}

/// A closed sequence of 2D integer points, one per stitched segment's `a`
/// endpoint. Implicitly closed (last connects back to first); winding is
/// whatever the facet-reordering rule produced, callers re-orient as
/// needed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<IVec2>,
}
