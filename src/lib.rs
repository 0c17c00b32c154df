//! Conformal HUD Symbology
//!
//! Projects directions in a local north-east-down frame through a pinhole camera and draws
//! flight symbology over each frame of aircraft camera footage. Drawing goes through the
//! [`canvas::Canvas`] trait, so any raster library can sit underneath.

pub mod canvas;
pub mod composer;
pub mod ephemeris;
pub mod error;
pub mod filter;
pub mod geodesy;
pub mod geometry;
pub mod projection;
pub mod style;
pub mod surface;
pub mod symbols;
pub mod telemetry;

#[cfg(feature = "serde")]
pub mod annotations;
#[cfg(feature = "serde")]
pub mod config;
#[cfg(feature = "serde")]
pub mod scene;

pub use canvas::{Canvas, DrawList};
pub use composer::{FrameComposer, Stage};
pub use error::HudError;
pub use projection::{CameraIntrinsics, CameraPose, Pixel, Projection, Projector};
pub use telemetry::Telemetry;
