//! Ground elevation from scattered survey samples.
//!
//! Samples are (east, north) positions in the session NED frame with an elevation in metres
//! above the reference plane. Queries interpolate linearly inside the Delaunay triangulation
//! of the samples and report no data outside its convex hull.

use crate::error::HudError;
use log::debug;
#[cfg(feature = "serde")]
use log::info;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::Deserialize;
use spade::{DelaunayTriangulation, FloatTriangulation, HasPosition, Point2, Triangulation};
#[cfg(feature = "serde")]
use std::{fs, path::Path};

/// Height of the ground, in metres up from the NED reference plane.
pub trait ElevationSource: Send + Sync {
    fn elevation(&self, east: f64, north: f64) -> Option<f64>;

    fn elevation_or_zero(&self, east: f64, north: f64) -> f64 {
        self.elevation(east, north).unwrap_or(0.0)
    }
}

/// Flat ground at the reference plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSurface;

impl ElevationSource for NoSurface {
    fn elevation(&self, _: f64, _: f64) -> Option<f64> {
        None
    }
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    position: Point2<f64>,
    elevation: f64,
}

impl HasPosition for Sample {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Piecewise-linear ground over a Delaunay triangulation of survey samples.
#[derive(Clone, Debug)]
pub struct TriangulatedSurface {
    triangulation: DelaunayTriangulation<Sample>,
}

impl TriangulatedSurface {
    /// Triangulates the samples. Repeated positions keep their first elevation.
    pub fn new(east: &[f64], north: &[f64], elevation: &[f64]) -> Result<Self, HudError> {
        if east.len() != north.len() || east.len() != elevation.len() {
            return Err(HudError::SurfaceLength {
                east: east.len(),
                north: north.len(),
                elevation: elevation.len(),
            });
        }

        let mut triangulation = DelaunayTriangulation::<Sample>::new();
        for ((&e, &n), &z) in east.iter().zip(north).zip(elevation) {
            let position = Point2::new(e, n);
            if triangulation.locate_vertex(position).is_some() {
                continue;
            }
            triangulation
                .insert(Sample {
                    position,
                    elevation: z,
                })
                .map_err(|_| HudError::SurfaceSample { east: e, north: n })?;
        }

        if triangulation.num_inner_faces() == 0 {
            return Err(HudError::DegenerateSurface {
                points: triangulation.num_vertices(),
            });
        }

        debug!(
            "triangulated {} surface samples into {} triangles",
            triangulation.num_vertices(),
            triangulation.num_inner_faces()
        );

        Ok(Self { triangulation })
    }

    /// Reads `{"points": [[east, north], ...], "values": [elevation, ...]}`.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, HudError> {
        #[derive(Deserialize)]
        struct Samples {
            points: Vec<[f64; 2]>,
            values: Vec<f64>,
        }

        let samples: Samples = serde_json::from_str(json)?;
        let (east, north): (Vec<f64>, Vec<f64>) =
            samples.points.iter().map(|&[e, n]| (e, n)).unzip();

        Self::new(&east, &north, &samples.values)
    }

    #[cfg(feature = "serde")]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HudError> {
        let path = path.as_ref();
        let surface = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            "loaded surface from {} ({} samples)",
            path.display(),
            surface.len()
        );

        Ok(surface)
    }

    /// Number of distinct samples.
    pub fn len(&self) -> usize {
        self.triangulation.num_vertices()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn triangle_count(&self) -> usize {
        self.triangulation.num_inner_faces()
    }

    /// Elevations for many positions at once.
    pub fn par_elevations(&self, positions: &[(f64, f64)]) -> Vec<Option<f64>> {
        positions
            .par_iter()
            .map(|&(east, north)| self.elevation(east, north))
            .collect()
    }
}

impl ElevationSource for TriangulatedSurface {
    fn elevation(&self, east: f64, north: f64) -> Option<f64> {
        if !east.is_finite() || !north.is_finite() {
            return None;
        }

        self.triangulation
            .barycentric()
            .interpolate(|v| v.data().elevation, Point2::new(east, north))
    }
}
