//! Runtime-injected knobs for the slicing pipeline.
//!
//! Mirrors the source project's global `SCALING_FACTOR` constant, but as a
//! plain field so tests can slice the same mesh at multiple scales without
//! recompiling.

/// Tunable parameters threaded through [`crate::mesh::Mesh::slice`] and the
/// 2D auxiliary operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicerConfig {
    /// Unit-length-to-integer conversion factor for 2D output coordinates.
    /// Matches the source project's historical default of one micron.
    pub scaling_factor: f64,

    /// Dilation applied to per-facet triangles before unioning them in
    /// [`crate::geometry2d::horizontal_projection`], in the same unscaled
    /// units as mesh coordinates (divided by `scaling_factor` before use,
    /// matching the source project's `0.01 / SCALING_FACTOR`). Tuned
    /// upstream against real-world meshes to close numerical gaps between
    /// adjacent facet projections.
    pub projection_dilation: f64,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            scaling_factor: 1e-6,
            projection_dilation: 0.01,
        }
    }
}
