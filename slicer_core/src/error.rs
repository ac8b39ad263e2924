//! Error types returned by the core pipeline.

use std::fmt;

/// Errors produced by the slicing pipeline. Per spec.md §7, only
/// `InvalidState` and `Io` ever propagate to a caller; `MalformedFacet` and
/// `UnclosedLoop` are recovered locally (skip the facet / discard the
/// partial loop) and surface only via a `log::warn!` of their `Display`,
/// never as a returned `Err`. They are still first-class values here,
/// not ad-hoc strings, so that recovery path logging is as structured as
/// the propagating one.
#[derive(Debug)]
pub enum SlicerError {
    /// An operation required a repaired mesh and the mesh was not repaired.
    InvalidState(InvalidStateError),

    /// A per-facet slice produced an unexpected number of intersection
    /// points; recovered locally by skipping the facet for that plane.
    MalformedFacet(MalformedFacetError),

    /// `LoopBuilder` exhausted successor candidates without closing the
    /// chain; recovered locally by discarding the partial chain.
    UnclosedLoop(UnclosedLoopError),

    /// Surfaced verbatim from an I/O collaborator. The core itself never
    /// produces this variant; it exists so hosts gluing an I/O layer on top
    /// of this crate have a place to fold their errors into ours.
    Io(IoError),
}

/// An operation was attempted on a mesh that wasn't in the required state.
#[derive(Debug)]
pub struct InvalidStateError {
    /// What the caller was trying to do.
    pub operation: &'static str,
    /// Why the mesh wasn't ready for it.
    pub reason: &'static str,
}

/// A facet's intersection with one plane didn't reduce to exactly two
/// points after vertex-on-plane dedup.
#[derive(Debug)]
pub struct MalformedFacetError {
    pub facet: u32,
    pub plane_z: f64,
    pub point_count: usize,
}

/// A segment chain in one plane's `LoopBuilder` pass ran out of
/// successors without its tail reconnecting to its head.
#[derive(Debug)]
pub struct UnclosedLoopError {
    pub segment_count: usize,
}

/// An I/O collaborator failed.
#[derive(Debug)]
pub struct IoError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error>>,
}

impl InvalidStateError {
    pub fn new(operation: &'static str, reason: &'static str) -> Self {
        Self { operation, reason }
    }
}

impl IoError {
    pub fn new(message: impl Into<String>, err: impl Into<Box<dyn std::error::Error>>) -> Self {
        Self {
            message: message.into(),
            source: Some(err.into()),
        }
    }
}

impl fmt::Display for SlicerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlicerError::InvalidState(InvalidStateError { operation, reason }) => {
                write!(f, "cannot {operation}: {reason}")
            }
            SlicerError::MalformedFacet(MalformedFacetError {
                facet,
                plane_z,
                point_count,
            }) => {
                write!(
                    f,
                    "malformed facet {facet}: {point_count} intersection points at z={plane_z}"
                )
            }
            SlicerError::UnclosedLoop(UnclosedLoopError { segment_count }) => {
                write!(f, "unclosed loop: {segment_count} segments did not reconnect to the seed")
            }
            SlicerError::Io(IoError { message, source }) => {
                write!(f, "I/O failure: {message} ({source:?})")
            }
        }
    }
}

impl std::error::Error for SlicerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SlicerError::Io(IoError { source, .. }) => source.as_deref(),
            SlicerError::InvalidState(_)
            | SlicerError::MalformedFacet(_)
            | SlicerError::UnclosedLoop(_) => None,
        }
    }
}

impl From<InvalidStateError> for SlicerError {
    fn from(e: InvalidStateError) -> Self {
        SlicerError::InvalidState(e)
    }
}

impl From<MalformedFacetError> for SlicerError {
    fn from(e: MalformedFacetError) -> Self {
        SlicerError::MalformedFacet(e)
    }
}

impl From<UnclosedLoopError> for SlicerError {
    fn from(e: UnclosedLoopError) -> Self {
        SlicerError::UnclosedLoop(e)
    }
}

impl From<IoError> for SlicerError {
    fn from(e: IoError) -> Self {
        SlicerError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_state() {
        let err: SlicerError = InvalidStateError::new("split", "mesh is not repaired").into();
        assert_eq!(err.to_string(), "cannot split: mesh is not repaired");
    }

    #[test]
    fn source_is_none() {
        let err: SlicerError = InvalidStateError::new("slice", "mesh is not repaired").into();
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn io_error_roundtrip() {
        let underlying: Box<dyn std::error::Error> = "disk full".into();
        let err: SlicerError = IoError::new("writing layer", underlying).into();
        match &err {
            SlicerError::Io(io) => assert_eq!(io.message, "writing layer"),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn io_error_exposes_source() {
        let underlying: Box<dyn std::error::Error> = "disk full".into();
        let err: SlicerError = IoError::new("writing layer", underlying).into();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn display_malformed_facet() {
        let err: SlicerError = MalformedFacetError {
            facet: 3,
            plane_z: 0.5,
            point_count: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "malformed facet 3: 1 intersection points at z=0.5"
        );
    }

    #[test]
    fn display_unclosed_loop() {
        let err: SlicerError = UnclosedLoopError { segment_count: 4 }.into();
        assert_eq!(
            err.to_string(),
            "unclosed loop: 4 segments did not reconnect to the seed"
        );
    }
}
