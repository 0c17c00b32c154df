use crate::{
    error::HudError,
    geometry::{self, Quaternion},
};
use nalgebra::{Matrix3, Matrix3x4, Matrix4, Vector3, Vector4};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Points whose projected depth is at or below this value are behind, or too close to, the
/// image plane to be drawn.
pub const MIN_PROJECTED_DEPTH: f64 = 0.1;

/// An integer image location, column `u` and row `v`.
///
/// Pixels may lie outside the raster; a visible point only means it is in front of the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pixel {
    u: i32,
    v: i32,
}

impl Pixel {
    pub fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }

    pub fn u(&self) -> i32 {
        self.u
    }

    pub fn v(&self) -> i32 {
        self.v
    }

    /// Returns this pixel moved by `du` columns and `dv` rows.
    pub fn offset(&self, du: i32, dv: i32) -> Self {
        Self::new(self.u.saturating_add(du), self.v.saturating_add(dv))
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Result of projecting a world point.
///
/// There is no way to get a pixel out of [`Projection::NotVisible`], so a failed projection
/// can never be drawn with a placeholder coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Visible(Pixel),
    NotVisible,
}

impl Projection {
    pub fn visible(self) -> Option<Pixel> {
        match self {
            Projection::Visible(pixel) => Some(pixel),
            Projection::NotVisible => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Projection::Visible(_))
    }
}

/// Collects the pixels of a multi-vertex symbol.
///
/// Returns `None` when any vertex is not visible, so that partial symbols are never drawn.
pub fn all_visible<const N: usize>(projections: [Projection; N]) -> Option<[Pixel; N]> {
    let mut pixels = [Pixel::default(); N];
    for (pixel, projection) in pixels.iter_mut().zip(projections) {
        *pixel = projection.visible()?;
    }

    Some(pixels)
}

/// Camera intrinsic matrix mapping camera-frame coordinates to homogeneous pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    k: Matrix3<f64>,
}

impl CameraIntrinsics {
    /// Builds a pinhole matrix with focal lengths `fx`, `fy` and principal point `cx`, `cy`,
    /// all in pixels.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self, HudError> {
        Self::from_matrix(Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0))
    }

    pub fn from_matrix(k: Matrix3<f64>) -> Result<Self, HudError> {
        if k.iter().any(|x| !x.is_finite()) || k[(0, 0)] <= 0.0 || k[(1, 1)] <= 0.0 {
            return Err(HudError::DegenerateIntrinsics);
        }

        Ok(Self { k })
    }

    /// Builds intrinsics from row-major data, failing on anything that is not 3x3.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, HudError> {
        let shape_error = || HudError::MatrixShape {
            expected: "3x3",
            rows: rows.len(),
            cols: rows.first().map_or(0, Vec::len),
        };

        if rows.len() != 3 || rows.iter().any(|row| row.len() != 3) {
            return Err(shape_error());
        }

        Self::from_matrix(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.k
    }
}

/// Extrinsic transform taking a world NED point into camera coordinates.
///
/// Camera coordinates follow the image convention: x right, y down, z along the optical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraPose {
    extrinsic: Matrix3x4<f64>,
}

impl CameraPose {
    pub fn from_matrix(extrinsic: Matrix3x4<f64>) -> Self {
        Self { extrinsic }
    }

    /// Uses the upper three rows of a homogeneous 4x4 transform.
    pub fn from_matrix4(m: &Matrix4<f64>) -> Self {
        Self::from_matrix(m.fixed_rows::<3>(0).into_owned())
    }

    /// Builds a pose from row-major 3x4 or 4x4 data.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, HudError> {
        let cols = rows.first().map_or(0, Vec::len);
        if !(rows.len() == 3 || rows.len() == 4) || cols != 4 || rows.iter().any(|r| r.len() != 4)
        {
            return Err(HudError::MatrixShape {
                expected: "3x4 or 4x4",
                rows: rows.len(),
                cols,
            });
        }

        Ok(Self::from_matrix(Matrix3x4::from_fn(|r, c| rows[r][c])))
    }

    /// Builds the pose of a camera at `position` whose optical axis is the body x axis of an
    /// airframe with attitude `body`.
    ///
    /// `body` rotates NED vectors into body vectors actively, so the nose is
    /// `geometry::rotate(body, x)`.
    pub fn from_attitude(position: &Vector3<f64>, body: &Quaternion) -> Self {
        // Body FRD axes to image axes: right -> x, down -> y, forward -> z.
        let body_to_camera = Matrix3::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        let ned_to_body = geometry::inverse(body).to_rotation_matrix().into_inner();
        let rotation = body_to_camera * ned_to_body;
        let translation = -(rotation * position);

        let mut extrinsic = Matrix3x4::zeros();
        extrinsic.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        extrinsic.set_column(3, &translation);
        Self::from_matrix(extrinsic)
    }

    /// The pose of a camera at the NED origin looking north with no rotation.
    pub fn looking_north() -> Self {
        Self::from_attitude(&Vector3::zeros(), &Quaternion::identity())
    }

    pub fn matrix(&self) -> &Matrix3x4<f64> {
        &self.extrinsic
    }
}

/// Converts world NED points into pixels for the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Projector {
    intrinsics: CameraIntrinsics,
    pose: Option<CameraPose>,
}

impl Projector {
    pub fn new(intrinsics: CameraIntrinsics) -> Self {
        Self {
            intrinsics,
            pose: None,
        }
    }

    pub fn with_pose(mut self, pose: CameraPose) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Replaces the pose for the next frame.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = Some(pose);
    }

    pub fn pose(&self) -> Option<&CameraPose> {
        self.pose.as_ref()
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Projects a world NED point.
    ///
    /// Everything is [`Projection::NotVisible`] until a pose has been set.
    pub fn project(&self, ned: &Vector3<f64>) -> Projection {
        let Some(pose) = self.pose else {
            return Projection::NotVisible;
        };

        let world = Vector4::new(ned.x, ned.y, ned.z, 1.0);
        let uvh = self.intrinsics.matrix() * (pose.matrix() * world);
        Self::dehomogenize(&uvh)
    }

    fn dehomogenize(uvh: &Vector3<f64>) -> Projection {
        // NaN compares false here too, so a non-finite depth is rejected.
        if !(uvh.z > MIN_PROJECTED_DEPTH) {
            return Projection::NotVisible;
        }

        let u = uvh.x / uvh.z;
        let v = uvh.y / uvh.z;
        if !u.is_finite() || !v.is_finite() {
            return Projection::NotVisible;
        }

        Projection::Visible(Pixel::new(u as i32, v as i32))
    }
}
