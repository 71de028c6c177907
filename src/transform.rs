//! Rigid transforms of a skeleton.
//!
//! Every operation returns a fresh [`Skeleton`] with re-derived body vectors;
//! the receiver is never modified. Alignment always translates first and
//! rotates second, so rotations act about the re-centred origin.

use nalgebra::{Matrix2, Matrix3, SymmetricEigen, Vector2};
use tracing::{debug, warn};

use crate::error::{DataQualityWarning, Result};
use crate::math::geometry::{self, add3, ensure_same_len, sub3, Vec3};
use crate::math::rotation::{self, rotate3};
use crate::skeleton::{LandmarkSet, Skeleton};
use crate::topology::{Axis, AxisSet, Landmark};

/// Smallest eigenvalue ratio of the foot-sample scatter accepted as a plane.
const PLANE_CONDITION_LIMIT: f64 = 1e-12;

/// Least-squares ground plane `z = a·x + b·y + c` through the foot samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    /// Slope along x.
    pub a: f64,
    /// Slope along y.
    pub b: f64,
    /// Height at the origin.
    pub c: f64,
}

impl GroundPlane {
    /// Fit the plane to every finite point.
    ///
    /// Samples that all share one height give the horizontal plane, however
    /// they are spread in xy. Otherwise returns `None` when fewer than three
    /// points are finite or they are collinear in the xy projection.
    #[must_use]
    pub fn fit(points: &[Vec3]) -> Option<Self> {
        let finite: Vec<&Vec3> = points
            .iter()
            .filter(|p| p.iter().all(|c| c.is_finite()))
            .collect();
        if finite.len() < 3 {
            return None;
        }

        let n = finite.len() as f64;
        let mut centroid = [0.0; 3];
        for p in &finite {
            centroid = add3(&centroid, p);
        }
        let centroid = centroid.map(|c| c / n);

        let z_spread = finite
            .iter()
            .map(|p| (p[2] - centroid[2]).abs())
            .fold(0.0, f64::max);
        if z_spread <= PLANE_CONDITION_LIMIT * centroid[2].abs().max(1.0) {
            return Some(Self {
                a: 0.0,
                b: 0.0,
                c: centroid[2],
            });
        }

        let mut scatter = Matrix2::zeros();
        let mut rhs = Vector2::zeros();
        for p in &finite {
            let d = sub3(p, &centroid);
            let xy = Vector2::new(d[0], d[1]);
            scatter += xy * xy.transpose();
            rhs += xy * d[2];
        }

        let eigen = SymmetricEigen::new(scatter);
        let largest = eigen.eigenvalues.max();
        let smallest = eigen.eigenvalues.min();
        if largest <= 0.0 || smallest <= PLANE_CONDITION_LIMIT * largest {
            return None;
        }

        let slope = scatter.try_inverse()? * rhs;
        let (a, b) = (slope[0], slope[1]);
        Some(Self {
            a,
            b,
            c: centroid[2] - a * centroid[0] - b * centroid[1],
        })
    }

    /// Upward normal `(-a, -b, 1)`, not normalized.
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        [-self.a, -self.b, 1.0]
    }
}

impl Skeleton {
    /// Add a per-frame offset to every landmark.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::LengthMismatch`] if `offset` does not have
    /// one entry per frame.
    pub fn translate(&self, offset: &[Vec3]) -> Result<Self> {
        ensure_same_len(offset, self.index())?;
        let landmarks: LandmarkSet = std::array::from_fn(|i| {
            self.node(Landmark::ALL[i])
                .iter()
                .zip(offset)
                .map(|(p, o)| add3(p, o))
                .collect()
        });
        Ok(self.with_landmarks(landmarks))
    }

    /// Move `landmark` to the origin in every frame.
    #[must_use]
    pub fn translate_to_origin(&self, landmark: Landmark) -> Self {
        let anchor = self.node(landmark);
        let landmarks: LandmarkSet = std::array::from_fn(|i| {
            self.node(Landmark::ALL[i])
                .iter()
                .zip(anchor)
                .map(|(p, a)| sub3(p, a))
                .collect()
        });
        self.with_landmarks(landmarks)
    }

    /// Move the named landmark to the origin in every frame.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::UnknownLandmark`] for an unknown name.
    pub fn fix(&self, landmark: &str) -> Result<Self> {
        Ok(self.translate_to_origin(landmark.parse()?))
    }

    /// Apply one rotation matrix per frame to every landmark.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::LengthMismatch`] if `rotation` does not have
    /// one matrix per frame.
    pub fn rotate(&self, rotation: &[Matrix3<f64>]) -> Result<Self> {
        ensure_same_len(rotation, self.index())?;
        let landmarks: LandmarkSet = std::array::from_fn(|i| {
            self.node(Landmark::ALL[i])
                .iter()
                .zip(rotation)
                .map(|(p, r)| rotate3(r, p))
                .collect()
        });
        Ok(self.with_landmarks(landmarks))
    }

    /// Fitted ground plane through both feet, if the samples span one.
    #[must_use]
    pub fn ground_plane(&self) -> Option<GroundPlane> {
        let feet: Vec<Vec3> = Landmark::FEET
            .into_iter()
            .flat_map(|foot| self.node(foot).iter().copied())
            .collect();
        GroundPlane::fit(&feet)
    }

    /// Rotation taking the ground-plane normal onto `+z`.
    ///
    /// `None` when no plane can be fitted.
    #[must_use]
    pub fn level_rotation(&self) -> Option<Matrix3<f64>> {
        self.ground_plane().map(|plane| self.plane_rotation(&plane))
    }

    fn plane_rotation(&self, plane: &GroundPlane) -> Matrix3<f64> {
        rotation::rotation_between3(&plane.normal(), &Axis::Z.unit(), self.config().degenerate_eps)
    }

    /// Rotate the whole recording so the foot contact plane is horizontal.
    ///
    /// The same rotation applies to every frame. If the feet do not span a
    /// plane the positions are kept and a
    /// [`DataQualityWarning::SingularGroundPlane`] is attached.
    ///
    /// # Errors
    ///
    /// Only fails if the internal series disagree in length, which
    /// construction rules out.
    pub fn level(&self) -> Result<Self> {
        match self.ground_plane() {
            Some(plane) => {
                let r = self.plane_rotation(&plane);
                debug!(id = %self.id(), a = plane.a, b = plane.b, c = plane.c, "levelled ground plane");
                self.rotate(&vec![r; self.len()])
            }
            None => {
                let points = Landmark::FEET
                    .into_iter()
                    .flat_map(|foot| self.node(foot))
                    .filter(|p| p.iter().all(|c| c.is_finite()))
                    .count();
                let warning = DataQualityWarning::SingularGroundPlane { points };
                warn!(id = %self.id(), %warning, "skipping levelling");
                let mut levelled = self.clone();
                levelled.push_warning(warning);
                Ok(levelled)
            }
        }
    }

    /// Centre on `offset`, then rotate so `direction` points along `axis`.
    ///
    /// Frames where `direction` coincides with `offset` have no defined
    /// rotation and come out as `NaN`.
    ///
    /// # Errors
    ///
    /// Only fails if the internal series disagree in length.
    pub fn align_on_axis(&self, offset: Landmark, direction: Landmark, axis: Axis) -> Result<Self> {
        let centred = self.translate_to_origin(offset);
        let r = rotation::rotation_between(
            centred.node(direction),
            &centred.unit_vectors(axis),
            self.config().degenerate_eps,
        )?;
        centred.rotate(&r)
    }

    /// Centre on `offset`, then turn the ground projection of `direction`
    /// onto the normal axis of `plane`.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidAxis`] if `plane` does not name
    /// exactly two axes.
    pub fn align_on_plane(&self, offset: Landmark, direction: Landmark, plane: AxisSet) -> Result<Self> {
        let normal = plane.normal()?;
        let centred = self.translate_to_origin(offset);
        let projected = geometry::project(centred.node(direction), AxisSet::XY);
        let r = rotation::rotation_between(
            &projected,
            &centred.unit_vectors(normal),
            self.config().degenerate_eps,
        )?;
        centred.rotate(&r)
    }

    /// [`Skeleton::align_on_axis`] by names.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown landmark or axis name.
    pub fn align_on_axis_by_name(&self, offset: &str, direction: &str, axis: &str) -> Result<Self> {
        self.align_on_axis(offset.parse()?, direction.parse()?, axis.parse()?)
    }

    /// [`Skeleton::align_on_plane`] by names.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown landmark or an invalid
    /// plane such as `"x"` or `"xyz"`.
    pub fn align_on_plane_by_name(&self, offset: &str, direction: &str, plane: &str) -> Result<Self> {
        self.align_on_plane(offset.parse()?, direction.parse()?, plane.parse()?)
    }
}
