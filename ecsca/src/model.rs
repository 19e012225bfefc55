use crate::error::EcError;
use crate::formula::{self, Formula, FormulaKind};

use std::fmt;

/// Algebraic shape of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveModel {
    /// `y^2 = x^3 + a*x + b`
    ShortWeierstrass,
    /// `b*y^2 = x^3 + a*x^2 + x`
    Montgomery,
}

impl CurveModel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShortWeierstrass => "shortw",
            Self::Montgomery => "montgom",
        }
    }

    /// Names of the coefficients a curve of this shape is parameterized by.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        &["a", "b"]
    }

    pub fn affine(&self) -> CoordinateModel {
        CoordinateModel::new(*self, CoordinateSystem::Affine)
    }

    /// Coordinate systems registered for this model, affine excluded.
    pub fn coordinate_systems(&self) -> &'static [CoordinateSystem] {
        match self {
            Self::ShortWeierstrass => &[CoordinateSystem::Projective, CoordinateSystem::Jacobian],
            Self::Montgomery => &[CoordinateSystem::Xz],
        }
    }

    pub fn coordinates(&self, name: &str) -> Result<CoordinateModel, EcError> {
        self.coordinate_systems()
            .iter()
            .find(|system| system.name() == name)
            .map(|system| CoordinateModel::new(*self, *system))
            .ok_or_else(|| {
                EcError::InvalidParameter(format!(
                    "no \"{}\" coordinates on {} curves",
                    name,
                    self.name()
                ))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// (x, y)
    Affine,
    /// (X : Y : Z) with x = X/Z, y = Y/Z
    Projective,
    /// (X : Y : Z) with x = X/Z^2, y = Y/Z^3
    Jacobian,
    /// (X : Z) with x = X/Z, y dropped
    Xz,
}

impl CoordinateSystem {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Affine => "affine",
            Self::Projective => "projective",
            Self::Jacobian => "jacobian",
            Self::Xz => "xz",
        }
    }

    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            Self::Affine => &["x", "y"],
            Self::Projective | Self::Jacobian => &["X", "Y", "Z"],
            Self::Xz => &["X", "Z"],
        }
    }

    /// Index of the denominator coordinate, `None` for affine.
    pub(crate) fn z_index(&self) -> Option<usize> {
        match self {
            Self::Affine => None,
            Self::Projective | Self::Jacobian => Some(2),
            Self::Xz => Some(1),
        }
    }

    /// `(variable index, weight)` of every coordinate that scales with the
    /// denominator, in affine variable order.
    pub(crate) fn weights(&self) -> &'static [(usize, u32)] {
        match self {
            Self::Affine => &[],
            Self::Projective => &[(0, 1), (1, 1)],
            Self::Jacobian => &[(0, 2), (1, 3)],
            Self::Xz => &[(0, 1)],
        }
    }

    /// Whether the affine y coordinate survives the representation.
    pub(crate) fn has_y(&self) -> bool {
        !matches!(self, Self::Xz)
    }

    /// Coordinates the point at infinity is represented by when a formula
    /// needs concrete values.
    pub(crate) fn infinity_values(&self) -> Option<&'static [u8]> {
        match self {
            Self::Affine => None,
            Self::Projective => Some(&[0, 1, 0]),
            Self::Jacobian => Some(&[1, 1, 0]),
            Self::Xz => Some(&[1, 0]),
        }
    }
}

/// A named coordinate system on one curve model, carrying its formula set.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateModel {
    curve_model: CurveModel,
    system: CoordinateSystem,
}

impl CoordinateModel {
    pub const SHORTW_AFFINE: Self = Self::new(CurveModel::ShortWeierstrass, CoordinateSystem::Affine);
    pub const SHORTW_PROJECTIVE: Self =
        Self::new(CurveModel::ShortWeierstrass, CoordinateSystem::Projective);
    pub const SHORTW_JACOBIAN: Self =
        Self::new(CurveModel::ShortWeierstrass, CoordinateSystem::Jacobian);
    pub const MONTGOM_AFFINE: Self = Self::new(CurveModel::Montgomery, CoordinateSystem::Affine);
    pub const MONTGOM_XZ: Self = Self::new(CurveModel::Montgomery, CoordinateSystem::Xz);

    const fn new(curve_model: CurveModel, system: CoordinateSystem) -> Self {
        Self {
            curve_model,
            system,
        }
    }

    pub fn curve_model(&self) -> CurveModel {
        self.curve_model
    }

    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    pub fn name(&self) -> &'static str {
        self.system.name()
    }

    pub fn variables(&self) -> &'static [&'static str] {
        self.system.variables()
    }

    pub fn is_affine(&self) -> bool {
        self.system == CoordinateSystem::Affine
    }

    pub fn formulas(&self) -> &'static [Formula] {
        formula::registry(*self)
    }

    pub fn formula(&self, name: &str) -> Result<Formula, EcError> {
        self.formulas()
            .iter()
            .find(|formula| formula.name() == name)
            .copied()
            .ok_or_else(|| {
                EcError::InvalidParameter(format!("no formula \"{}\" in {}", name, self))
            })
    }

    pub fn formulas_of(&self, kind: FormulaKind) -> impl Iterator<Item = &'static Formula> {
        self.formulas()
            .iter()
            .filter(move |formula| formula.kind() == kind)
    }
}

impl fmt::Debug for CoordinateModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for CoordinateModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" on {} curves", self.name(), self.curve_model.name())
    }
}
