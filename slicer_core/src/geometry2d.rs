//! Horizontal projection and convex hull, plus the 2D Boolean/offset and
//! convex-hull collaborator seams they call into.
//!
//! Grounded in `TriangleMesh::horizontal_projection()` and
//! `TriangleMesh::convex_hull()`: project each facet's XY triangle,
//! reorient it counter-clockwise, dilate by a tuned constant, and union;
//! for the hull, forward scaled shared-vertex XY positions to the
//! collaborator. The [`DefaultBoolean2D`]/[`DefaultConvexHull2D`]
//! implementations here are intentionally minimal stand-ins — a real
//! polygon clipper and a full hull implementation are explicit external
//! collaborators (see SPEC_FULL.md §6), not something this crate claims to
//! provide in production strength.

use glam::IVec2;

use crate::config::SlicerConfig;
use crate::mesh::Mesh;
use crate::slice::segment::Polygon;

/// `offset`/`union` from the external interfaces table.
pub trait Boolean2D {
    fn offset(&self, polys: &[Polygon], delta: f64) -> Vec<Polygon>;
    fn union(&self, polys: &[Polygon]) -> Vec<Polygon>;
}

/// `convex_hull` from the external interfaces table.
pub trait ConvexHull2D {
    fn convex_hull(&self, points: &[IVec2]) -> Polygon;
}

/// Signed area × 2; positive for counter-clockwise winding.
fn signed_area2(points: &[IVec2]) -> i64 {
    let mut sum = 0i64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    sum
}

fn make_counter_clockwise(polygon: &mut Polygon) {
    if signed_area2(&polygon.points) < 0 {
        polygon.points.reverse();
    }
}

/// Minimal default: push each vertex away from the polygon's centroid by
/// `delta` scaled units. Not a general straight-skeleton offset — it exists
/// to keep `horizontal_projection` self-contained for testing.
pub struct DefaultBoolean2D;

impl Boolean2D for DefaultBoolean2D {
    fn offset(&self, polys: &[Polygon], delta: f64) -> Vec<Polygon> {
        polys
            .iter()
            .map(|poly| {
                if poly.points.is_empty() {
                    return poly.clone();
                }
                let centroid = centroid(&poly.points);
                let points = poly
                    .points
                    .iter()
                    .map(|&p| {
                        let dir = (p.as_vec2() - centroid).normalize_or_zero();
                        let moved = p.as_vec2() + dir * delta as f32;
                        IVec2::new(moved.x.round() as i32, moved.y.round() as i32)
                    })
                    .collect();
                Polygon { points }
            })
            .collect()
    }

    /// Not a real polygon union — concatenates inputs unchanged. Real
    /// boolean union is an external collaborator (SPEC_FULL.md §6); this
    /// default exists only so `horizontal_projection` has something to
    /// call when a real collaborator isn't wired in.
    fn union(&self, polys: &[Polygon]) -> Vec<Polygon> {
        polys.to_vec()
    }
}

fn centroid(points: &[IVec2]) -> glam::Vec2 {
    let sum = points
        .iter()
        .fold(glam::Vec2::ZERO, |acc, p| acc + p.as_vec2());
    sum / points.len() as f32
}

/// Andrew's monotone chain convex hull.
pub struct DefaultConvexHull2D;

impl ConvexHull2D for DefaultConvexHull2D {
    fn convex_hull(&self, points: &[IVec2]) -> Polygon {
        let mut sorted: Vec<IVec2> = points.to_vec();
        sorted.sort_by_key(|p| (p.x, p.y));
        sorted.dedup();

        if sorted.len() < 3 {
            return Polygon { points: sorted };
        }

        fn cross(o: IVec2, a: IVec2, b: IVec2) -> i64 {
            (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
        }

        let mut lower: Vec<IVec2> = Vec::new();
        for &p in &sorted {
            while lower.len() >= 2
                && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0
            {
                lower.pop();
            }
            lower.push(p);
        }

        let mut upper: Vec<IVec2> = Vec::new();
        for &p in sorted.iter().rev() {
            while upper.len() >= 2
                && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0
            {
                upper.pop();
            }
            upper.push(p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        Polygon { points: lower }
    }
}

/// `horizontal_projection` from the external interfaces table: a 2D
/// polygon per facet, dilated and unioned.
pub fn horizontal_projection(
    mesh: &Mesh,
    config: SlicerConfig,
    boolean: &impl Boolean2D,
) -> Vec<Polygon> {
    let scale = |p: glam::Vec3| {
        IVec2::new(
            (p.x as f64 / config.scaling_factor).round() as i32,
            (p.y as f64 / config.scaling_factor).round() as i32,
        )
    };

    let mut polys: Vec<Polygon> = mesh
        .facets()
        .iter()
        .map(|facet| {
            let mut poly = Polygon {
                points: facet.positions.iter().map(|&p| scale(p)).collect(),
            };
            // Reorient after scaling, since winding can flip during
            // rounding to the integer grid.
            make_counter_clockwise(&mut poly);
            poly
        })
        .collect();

    // projection_dilation is in the same unscaled units as mesh coordinates;
    // convert to scaled integer units before handing it to the offset
    // collaborator, matching TriangleMesh::horizontal_projection's
    // `0.01 / SCALING_FACTOR`.
    let dilation = config.projection_dilation / config.scaling_factor;
    polys = boolean.offset(&polys, dilation);
    boolean.union(&polys)
}

/// `convex_hull` from the external interfaces table: forwards the scaled
/// XY positions of all shared vertices. Requires shared vertices to be
/// populated.
pub fn convex_hull(mesh: &Mesh, config: SlicerConfig, hull: &impl ConvexHull2D) -> Polygon {
    let points: Vec<IVec2> = mesh
        .shared_vertices()
        .map(|vertices| {
            vertices
                .iter()
                .map(|v| {
                    IVec2::new(
                        (v.x as f64 / config.scaling_factor).round() as i32,
                        (v.y as f64 / config.scaling_factor).round() as i32,
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    hull.convex_hull(&points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_reorients_each_facet_ccw() {
        let mesh = crate::test_fixtures::unit_cube();
        let config = SlicerConfig::default();
        let polys = horizontal_projection(&mesh, config, &DefaultBoolean2D);
        assert_eq!(polys.len(), mesh.facet_count());
        for poly in &polys {
            if poly.points.len() >= 3 {
                assert!(signed_area2(&poly.points) >= 0);
            }
        }
    }

    #[test]
    fn hull_of_unit_square_has_four_corners() {
        let points = vec![
            IVec2::new(0, 0),
            IVec2::new(10, 0),
            IVec2::new(10, 10),
            IVec2::new(0, 10),
            IVec2::new(5, 5), // interior point, must not appear in the hull
        ];
        let hull = DefaultConvexHull2D.convex_hull(&points);
        assert_eq!(hull.points.len(), 4);
        assert!(!hull.points.contains(&IVec2::new(5, 5)));
    }
}
