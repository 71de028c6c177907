//! Static skeleton topology.
//!
//! The tracked body is described by three fixed tables: nine landmarks laid
//! out as consecutive `x, y, z` column triples, eleven head-minus-tail
//! vectors between landmarks, and seven angles between vector pairs. Every
//! name lookup goes through `FromStr` on these enums, so an unknown name is
//! rejected once with a configuration error instead of failing deep inside a
//! computation.

use std::fmt;
use std::str::FromStr;

use crate::error::KinematicsError;
use crate::math::geometry::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tracked anatomical point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Landmark {
    /// Tip of the snout (`nose`).
    Nose,
    /// Base of the head (`neck`).
    Neck,
    /// Base of the tail (`anus`).
    Anus,
    /// Centre of the chest (`chest`).
    Chest,
    /// Right hind foot (`rfoot`).
    RightFoot,
    /// Left hind foot (`lfoot`).
    LeftFoot,
    /// Right fore paw (`rhand`).
    RightHand,
    /// Left fore paw (`lhand`).
    LeftHand,
    /// End of the tail (`tip`).
    TailTip,
}

impl Landmark {
    /// Landmarks in column order.
    pub const ALL: [Self; 9] = [
        Self::Nose,
        Self::Neck,
        Self::Anus,
        Self::Chest,
        Self::RightFoot,
        Self::LeftFoot,
        Self::RightHand,
        Self::LeftHand,
        Self::TailTip,
    ];

    /// Number of landmarks.
    pub const COUNT: usize = Self::ALL.len();

    /// Ground contact points used for levelling.
    pub const FEET: [Self; 2] = [Self::RightFoot, Self::LeftFoot];

    /// Position in the column layout.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The three raw column indices holding this landmark's coordinates.
    #[must_use]
    pub const fn columns(self) -> [usize; 3] {
        let base = self.index() * 3;
        [base, base + 1, base + 2]
    }

    /// Short name used in column labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::Neck => "neck",
            Self::Anus => "anus",
            Self::Chest => "chest",
            Self::RightFoot => "rfoot",
            Self::LeftFoot => "lfoot",
            Self::RightHand => "rhand",
            Self::LeftHand => "lhand",
            Self::TailTip => "tip",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Landmark {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| KinematicsError::UnknownLandmark(s.to_string()))
    }
}

/// Head-minus-tail difference between two landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyVector {
    /// Neck to nose (`head`).
    Head,
    /// Chest to neck (`fbody`).
    FrontBody,
    /// Anus to chest (`hbody`).
    HindBody,
    /// Anus to tail tip (`tail`).
    Tail,
    /// Chest to right fore paw (`rarm`).
    RightArm,
    /// Chest to left fore paw (`larm`).
    LeftArm,
    /// Anus to right hind foot (`rleg`).
    RightLeg,
    /// Anus to left hind foot (`lleg`).
    LeftLeg,
    /// Nose to anus (`nose2anus`).
    NoseToAnus,
    /// Left fore paw to nose (`lhand2nose`).
    LeftHandToNose,
    /// Right fore paw to nose (`rhand2nose`).
    RightHandToNose,
}

impl BodyVector {
    /// All vectors in table order.
    pub const ALL: [Self; 11] = [
        Self::Head,
        Self::FrontBody,
        Self::HindBody,
        Self::Tail,
        Self::RightArm,
        Self::LeftArm,
        Self::RightLeg,
        Self::LeftLeg,
        Self::NoseToAnus,
        Self::LeftHandToNose,
        Self::RightHandToNose,
    ];

    /// Number of vectors.
    pub const COUNT: usize = Self::ALL.len();

    /// Position in table order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `(head, tail)` landmarks; the vector value is `head - tail`.
    #[must_use]
    pub const fn endpoints(self) -> (Landmark, Landmark) {
        match self {
            Self::Head => (Landmark::Nose, Landmark::Neck),
            Self::FrontBody => (Landmark::Neck, Landmark::Chest),
            Self::HindBody => (Landmark::Chest, Landmark::Anus),
            Self::Tail => (Landmark::TailTip, Landmark::Anus),
            Self::RightArm => (Landmark::RightHand, Landmark::Chest),
            Self::LeftArm => (Landmark::LeftHand, Landmark::Chest),
            Self::RightLeg => (Landmark::RightFoot, Landmark::Anus),
            Self::LeftLeg => (Landmark::LeftFoot, Landmark::Anus),
            Self::NoseToAnus => (Landmark::Anus, Landmark::Nose),
            Self::LeftHandToNose => (Landmark::Nose, Landmark::LeftHand),
            Self::RightHandToNose => (Landmark::Nose, Landmark::RightHand),
        }
    }

    /// Short name used in column labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::FrontBody => "fbody",
            Self::HindBody => "hbody",
            Self::Tail => "tail",
            Self::RightArm => "rarm",
            Self::LeftArm => "larm",
            Self::RightLeg => "rleg",
            Self::LeftLeg => "lleg",
            Self::NoseToAnus => "nose2anus",
            Self::LeftHandToNose => "lhand2nose",
            Self::RightHandToNose => "rhand2nose",
        }
    }
}

impl fmt::Display for BodyVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyVector {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| KinematicsError::UnknownVector(s.to_string()))
    }
}

/// Angle between two body vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointAngle {
    /// Head against front body (`head`).
    Head,
    /// Front body against hind body (`body`).
    Body,
    /// Hind body against tail (`tail`).
    Tail,
    /// Left arm against front body (`larm`).
    LeftArm,
    /// Right arm against front body (`rarm`).
    RightArm,
    /// Left leg against hind body (`lleg`).
    LeftLeg,
    /// Right leg against hind body (`rleg`).
    RightLeg,
}

impl JointAngle {
    /// All angles in table order.
    pub const ALL: [Self; 7] = [
        Self::Head,
        Self::Body,
        Self::Tail,
        Self::LeftArm,
        Self::RightArm,
        Self::LeftLeg,
        Self::RightLeg,
    ];

    /// `(left, right)` vectors enclosing the angle.
    #[must_use]
    pub const fn vectors(self) -> (BodyVector, BodyVector) {
        match self {
            Self::Head => (BodyVector::Head, BodyVector::FrontBody),
            Self::Body => (BodyVector::FrontBody, BodyVector::HindBody),
            Self::Tail => (BodyVector::HindBody, BodyVector::Tail),
            Self::LeftArm => (BodyVector::LeftArm, BodyVector::FrontBody),
            Self::RightArm => (BodyVector::RightArm, BodyVector::FrontBody),
            Self::LeftLeg => (BodyVector::LeftLeg, BodyVector::HindBody),
            Self::RightLeg => (BodyVector::RightLeg, BodyVector::HindBody),
        }
    }

    /// Short name used in column labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
            Self::Tail => "tail",
            Self::LeftArm => "larm",
            Self::RightArm => "rarm",
            Self::LeftLeg => "lleg",
            Self::RightLeg => "rleg",
        }
    }
}

impl fmt::Display for JointAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JointAngle {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| KinematicsError::UnknownAngle(s.to_string()))
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index in a 3-vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit vector along this axis.
    #[must_use]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => [1.0, 0.0, 0.0],
            Self::Y => [0.0, 1.0, 0.0],
            Self::Z => [0.0, 0.0, 1.0],
        }
    }

    /// Lowercase axis letter.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            _ => Err(KinematicsError::InvalidAxis(s.to_string())),
        }
    }
}

/// Non-empty set of axes: a single axis, a plane, or all of space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisSet {
    mask: [bool; 3],
}

impl AxisSet {
    /// The xy (ground) plane.
    pub const XY: Self = Self {
        mask: [true, true, false],
    };
    /// The xz plane.
    pub const XZ: Self = Self {
        mask: [true, false, true],
    };
    /// The yz plane.
    pub const YZ: Self = Self {
        mask: [false, true, true],
    };

    /// Set holding a single axis.
    #[must_use]
    pub fn single(axis: Axis) -> Self {
        let mut mask = [false; 3];
        mask[axis.index()] = true;
        Self { mask }
    }

    /// Whether the axis belongs to the set.
    #[must_use]
    pub const fn contains(self, axis: Axis) -> bool {
        self.mask[axis.index()]
    }

    /// Number of axes in the set.
    #[must_use]
    pub fn len(self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Always false; an axis set holds at least one axis.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Axes in the set, in x, y, z order.
    pub fn axes(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    /// The axis orthogonal to a plane.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidAxis`] unless the set holds exactly
    /// two axes.
    pub fn normal(self) -> Result<Axis, KinematicsError> {
        if self.len() != 2 {
            return Err(KinematicsError::InvalidAxis(format!(
                "'{self}' is not a plane"
            )));
        }
        Axis::ALL
            .into_iter()
            .find(|a| !self.contains(*a))
            .ok_or_else(|| KinematicsError::InvalidAxis(self.to_string()))
    }
}

impl From<Axis> for AxisSet {
    fn from(axis: Axis) -> Self {
        Self::single(axis)
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.axes() {
            f.write_str(axis.name())?;
        }
        Ok(())
    }
}

impl FromStr for AxisSet {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = [false; 3];
        for c in s.chars() {
            let axis: Axis = c.to_string().parse()?;
            if mask[axis.index()] {
                return Err(KinematicsError::InvalidAxis(s.to_string()));
            }
            mask[axis.index()] = true;
        }
        if mask.iter().all(|m| !m) {
            return Err(KinematicsError::InvalidAxis(s.to_string()));
        }
        Ok(Self { mask })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_columns() {
        assert_eq!(Landmark::Nose.columns(), [0, 1, 2]);
        assert_eq!(Landmark::Chest.columns(), [9, 10, 11]);
        assert_eq!(Landmark::TailTip.columns(), [24, 25, 26]);
        assert_eq!(Landmark::COUNT * 3, 27);
    }

    #[test]
    fn test_name_round_trip() {
        for l in Landmark::ALL {
            assert_eq!(l.name().parse::<Landmark>().unwrap(), l);
        }
        for v in BodyVector::ALL {
            assert_eq!(v.name().parse::<BodyVector>().unwrap(), v);
        }
        for a in JointAngle::ALL {
            assert_eq!(a.name().parse::<JointAngle>().unwrap(), a);
        }
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(
            "paw".parse::<Landmark>(),
            Err(KinematicsError::UnknownLandmark(_))
        ));
        assert!(matches!(
            "spine".parse::<BodyVector>(),
            Err(KinematicsError::UnknownVector(_))
        ));
        assert!(matches!(
            "neck".parse::<JointAngle>(),
            Err(KinematicsError::UnknownAngle(_))
        ));
    }

    #[test]
    fn test_vector_endpoints() {
        assert_eq!(
            BodyVector::Head.endpoints(),
            (Landmark::Nose, Landmark::Neck)
        );
        assert_eq!(
            BodyVector::NoseToAnus.endpoints(),
            (Landmark::Anus, Landmark::Nose)
        );
        assert_eq!(
            JointAngle::Tail.vectors(),
            (BodyVector::HindBody, BodyVector::Tail)
        );
    }

    #[test]
    fn test_axis_units_are_independent() {
        assert_eq!(Axis::X.unit(), [1.0, 0.0, 0.0]);
        assert_eq!(Axis::Y.unit(), [0.0, 1.0, 0.0]);
        assert_eq!(Axis::Z.unit(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_axis_set_parse() {
        let xy: AxisSet = "xy".parse().unwrap();
        assert_eq!(xy, AxisSet::XY);
        assert_eq!(xy.normal().unwrap(), Axis::Z);
        assert_eq!("zx".parse::<AxisSet>().unwrap(), AxisSet::XZ);
        assert_eq!(AxisSet::YZ.normal().unwrap(), Axis::X);
        assert_eq!("y".parse::<AxisSet>().unwrap().len(), 1);
        assert!("y".parse::<AxisSet>().unwrap().normal().is_err());
        assert!("xx".parse::<AxisSet>().is_err());
        assert!("".parse::<AxisSet>().is_err());
        assert!("xw".parse::<AxisSet>().is_err());
        assert_eq!(AxisSet::XZ.to_string(), "xz");
    }
}
