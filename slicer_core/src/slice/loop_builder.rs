//! Per-plane segment-to-polygon stitcher.
//!
//! Grounded in the `CYCLE`-labelled loop-building section of
//! `TriangleMesh::slice()`: a tangent-pruning pre-pass over segments
//! sharing both endpoint ids, then repeated greedy chaining through
//! edge-id/vertex-id adjacency buckets until no unused segment remains.
//! Re-expressed here as a structured outer loop (see SPEC_FULL.md §4.3/§9)
//! instead of the source's `goto`-based restart.

use std::collections::HashMap;

use crate::mesh::{EdgeId, VertexId};

use super::segment::{IntersectionSegment, PointRef, Polygon};

/// Prune tangent edge pairs, stitch the remainder into closed loops, and
/// return the polygons found. Segments that never close are dropped, not
/// reported as an error — best-effort per the component's contract.
pub fn build_loops(mut segments: Vec<IntersectionSegment>) -> Vec<Polygon> {
    prune_tangent_pairs(&mut segments);

    let by_edge_start = index_by(&segments, |s| s.edge_a());
    let by_vertex_start = index_by(&segments, |s| s.vertex_a());

    let mut polygons = Vec::new();

    loop {
        let Some(seed) = segments.iter().position(|s| !s.skip) else {
            break;
        };
        segments[seed].skip = true;

        let mut chain = vec![seed];
        loop {
            let tail = *chain.last().unwrap();
            let next = find_successor(&segments, tail, &by_edge_start, &by_vertex_start);
            match next {
                Some(idx) => {
                    segments[idx].skip = true;
                    chain.push(idx);
                }
                None => {
                    if is_closed(&segments, &chain) {
                        polygons.push(Polygon {
                            points: chain.iter().map(|&i| segments[i].a).collect(),
                        });
                    } else {
                        let err: crate::error::SlicerError = crate::error::UnclosedLoopError {
                            segment_count: chain.len(),
                        }
                        .into();
                        log::warn!("{err}");
                    }
                    break;
                }
            }
        }
    }

    polygons
}

/// For every pair of non-skipped segments sharing an `edge_type != None`
/// tag and both endpoint ids, skip the second; if both share the same tag
/// (both Top or both Bottom — a "V" coincident with the cut), skip the
/// first too.
fn prune_tangent_pairs(segments: &mut [IntersectionSegment]) {
    use super::segment::SegmentKind;

    for i in 0..segments.len() {
        if segments[i].skip || segments[i].kind == SegmentKind::Crossing {
            continue;
        }
        for j in (i + 1)..segments.len() {
            if segments[j].skip || segments[j].kind == SegmentKind::Crossing {
                continue;
            }
            if segments[i].a_ref == segments[j].a_ref && segments[i].b_ref == segments[j].b_ref {
                segments[j].skip = true;
                if segments[i].kind == segments[j].kind {
                    segments[i].skip = true;
                    break;
                }
            }
        }
    }
}

fn index_by<K, F>(segments: &[IntersectionSegment], key: F) -> HashMap<K, Vec<usize>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&IntersectionSegment) -> Option<K>,
{
    let mut map: HashMap<K, Vec<usize>> = HashMap::new();
    for (idx, segment) in segments.iter().enumerate() {
        if let Some(k) = key(segment) {
            map.entry(k).or_default().push(idx);
        }
    }
    map
}

/// First un-skipped segment whose `a` endpoint matches `tail`'s `b`
/// endpoint: prefer an edge-id match, then fall back to a vertex-id match.
/// A tail segment's `b_ref` is always exactly one of the two, so in
/// practice exactly one bucket is ever consulted.
fn find_successor(
    segments: &[IntersectionSegment],
    tail: usize,
    by_edge_start: &HashMap<EdgeId, Vec<usize>>,
    by_vertex_start: &HashMap<VertexId, Vec<usize>>,
) -> Option<usize> {
    let tail_seg = &segments[tail];

    if let Some(edge_id) = tail_seg.edge_b() {
        if let Some(candidates) = by_edge_start.get(&edge_id) {
            if let Some(&idx) = candidates.iter().find(|&&c| !segments[c].skip) {
                return Some(idx);
            }
        }
    }
    if let Some(vertex_id) = tail_seg.vertex_b() {
        if let Some(candidates) = by_vertex_start.get(&vertex_id) {
            if let Some(&idx) = candidates.iter().find(|&&c| !segments[c].skip) {
                return Some(idx);
            }
        }
    }
    None
}

fn is_closed(segments: &[IntersectionSegment], chain: &[usize]) -> bool {
    let head = &segments[chain[0]];
    let tail = &segments[*chain.last().unwrap()];
    match (head.a_ref, tail.b_ref) {
        (PointRef::Edge(h), PointRef::Edge(t)) => h == t,
        (PointRef::Vertex(h), PointRef::Vertex(t)) => h == t,
        _ => false,
    }
}
