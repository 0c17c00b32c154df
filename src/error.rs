use thiserror::Error;

/// Failures during static setup.
///
/// Per-frame problems never surface here: unprojectable points and missing data only skip
/// the primitives that needed them.
#[derive(Debug, Error)]
pub enum HudError {
    #[error("expected a {expected} matrix but got {rows}x{cols}")]
    MatrixShape {
        expected: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("camera intrinsics need positive, finite focal lengths")]
    DegenerateIntrinsics,
    #[error("NED reference is already set to {current:?} and cannot move to {requested:?}")]
    ReferenceAlreadySet {
        current: (f64, f64, f64),
        requested: (f64, f64, f64),
    },
    #[error("expected latitude in range [-90, 90] but got: {latitude}")]
    InvalidLatitude { latitude: f64 },
    #[error("surface needs at least 3 non-collinear samples but got {points}")]
    DegenerateSurface { points: usize },
    #[error("surface coordinates have mismatched lengths: {east} east, {north} north, {elevation} elevation")]
    SurfaceLength {
        east: usize,
        north: usize,
        elevation: usize,
    },
    #[error("surface sample at ({east}, {north}) cannot be triangulated")]
    SurfaceSample { east: f64, north: f64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
