use crate::error::EcError;
use crate::model::{CoordinateModel, CoordinateSystem};
use crate::modular::Mod;

use num_bigint::BigUint;

use std::fmt;

/// Coordinate values, one shape per coordinate system.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Coords {
    Infinity,
    /// affine (x, y)
    Xy { x: Mod, y: Mod },
    /// projective or jacobian (X, Y, Z)
    Xyz { x: Mod, y: Mod, z: Mod },
    /// Montgomery (X, Z)
    Xz { x: Mod, z: Mod },
}

impl Coords {
    fn values(&self) -> Vec<&Mod> {
        match self {
            Self::Infinity => Vec::new(),
            Self::Xy { x, y } => vec![x, y],
            Self::Xyz { x, y, z } => vec![x, y, z],
            Self::Xz { x, z } => vec![x, z],
        }
    }

    fn fits(&self, system: CoordinateSystem) -> bool {
        matches!(
            (self, system),
            (Self::Infinity, _)
                | (Self::Xy { .. }, CoordinateSystem::Affine)
                | (Self::Xyz { .. }, CoordinateSystem::Projective)
                | (Self::Xyz { .. }, CoordinateSystem::Jacobian)
                | (Self::Xz { .. }, CoordinateSystem::Xz)
        )
    }

    fn from_values(system: CoordinateSystem, values: Vec<Mod>) -> Result<Self, EcError> {
        let count = values.len();
        let mismatch = || {
            EcError::InvalidCoordinates(format!(
                "{} coordinates take {} values, got {}",
                system.name(),
                system.variables().len(),
                count
            ))
        };
        match system {
            CoordinateSystem::Affine => {
                let [x, y] = <[Mod; 2]>::try_from(values).map_err(|_| mismatch())?;
                Ok(Self::Xy { x, y })
            }
            CoordinateSystem::Projective | CoordinateSystem::Jacobian => {
                let [x, y, z] = <[Mod; 3]>::try_from(values).map_err(|_| mismatch())?;
                Ok(Self::Xyz { x, y, z })
            }
            CoordinateSystem::Xz => {
                let [x, z] = <[Mod; 2]>::try_from(values).map_err(|_| mismatch())?;
                Ok(Self::Xz { x, z })
            }
        }
    }
}

/// A point in one coordinate model.
///
/// `PartialEq` compares the raw coordinate values, use [`Point::equals`] to
/// compare points up to their projective representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    model: CoordinateModel,
    coords: Coords,
}

impl Point {
    pub fn new(model: CoordinateModel, coords: Coords) -> Result<Self, EcError> {
        if !coords.fits(model.system()) {
            return Err(EcError::InvalidCoordinates(format!(
                "{:?} is not a point in {}",
                coords, model
            )));
        }
        let values = coords.values();
        if let Some(first) = values.first() {
            if let Some(other) = values.iter().find(|v| v.modulus() != first.modulus()) {
                return Err(EcError::ModulusMismatch(
                    first.modulus().to_string(),
                    other.modulus().to_string(),
                ));
            }
        }
        Ok(Self { model, coords })
    }

    /// Builds a point from values ordered as the model's variables.
    pub fn from_values(model: CoordinateModel, values: Vec<Mod>) -> Result<Self, EcError> {
        Self::new(model, Coords::from_values(model.system(), values)?)
    }

    /// Builds a point from `(variable name, value)` pairs, the names must be
    /// exactly the model's variables.
    pub fn from_named<'a, I>(model: CoordinateModel, named: I) -> Result<Self, EcError>
    where
        I: IntoIterator<Item = (&'a str, Mod)>,
    {
        let variables = model.variables();
        let mut slots: Vec<Option<Mod>> = vec![None; variables.len()];
        for (name, value) in named {
            let index = variables
                .iter()
                .position(|variable| *variable == name)
                .ok_or_else(|| {
                    EcError::InvalidCoordinates(format!("unknown variable {} in {}", name, model))
                })?;
            if slots[index].replace(value).is_some() {
                return Err(EcError::InvalidCoordinates(format!(
                    "variable {} given twice",
                    name
                )));
            }
        }
        let values = slots
            .into_iter()
            .zip(variables)
            .map(|(slot, name)| {
                slot.ok_or_else(|| {
                    EcError::InvalidCoordinates(format!("missing variable {} in {}", name, model))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(model, values)
    }

    pub fn infinity(model: CoordinateModel) -> Self {
        Self {
            model,
            coords: Coords::Infinity,
        }
    }

    pub fn model(&self) -> CoordinateModel {
        self.model
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    /// Coordinate values in variable order, empty for the infinity sentinel.
    pub fn values(&self) -> Vec<&Mod> {
        self.coords.values()
    }

    pub fn get(&self, variable: &str) -> Option<&Mod> {
        self.model
            .variables()
            .iter()
            .position(|name| *name == variable)
            .and_then(|index| self.coords.values().get(index).copied())
    }

    pub fn modulus(&self) -> Option<&BigUint> {
        self.coords.values().into_iter().next().map(Mod::modulus)
    }

    fn z(&self) -> Option<&Mod> {
        self.model
            .system()
            .z_index()
            .and_then(|index| self.coords.values().get(index).copied())
    }

    /// True for the sentinel and for the coordinates of infinity in the
    /// point's model: (0:Y:0) projective, (X:Y:0) with Y^2 = X^3 jacobian,
    /// (X:0) xz, nonzero Y and X respectively.
    pub fn is_infinity(&self) -> bool {
        match &self.coords {
            Coords::Infinity => true,
            Coords::Xy { .. } => false,
            Coords::Xyz { x, y, z } => {
                if !z.is_zero() || y.is_zero() {
                    return false;
                }
                match self.model.system() {
                    CoordinateSystem::Jacobian => {
                        let x3 = x.pow(&BigUint::from(3u8));
                        let y2 = y.pow(&BigUint::from(2u8));
                        x3 == y2
                    }
                    _ => x.is_zero(),
                }
            }
            Coords::Xz { x, z } => z.is_zero() && !x.is_zero(),
        }
    }

    /// A zero denominator that does not represent infinity, no point of any
    /// curve has such coordinates.
    pub(crate) fn is_degenerate(&self) -> bool {
        !self.is_infinity() && self.z().map(Mod::is_zero).unwrap_or(false)
    }

    /// Concrete coordinates to feed into a formula, the sentinel is replaced
    /// by the model's canonical representation of infinity.
    pub(crate) fn formula_values(&self, prime: &BigUint) -> Result<Vec<Mod>, EcError> {
        match self.coords {
            Coords::Infinity => self
                .model
                .system()
                .infinity_values()
                .ok_or_else(|| {
                    EcError::UnsupportedConversion(format!(
                        "no coordinates for infinity in {}",
                        self.model
                    ))
                })?
                .iter()
                .map(|value| Mod::new(*value, prime.clone()))
                .collect(),
            _ => Ok(self.values().into_iter().cloned().collect()),
        }
    }

    pub fn to_affine(&self) -> Result<Self, EcError> {
        let affine = self.model.curve_model().affine();
        if self.is_infinity() {
            return Ok(Self::infinity(affine));
        }
        let system = self.model.system();
        if system == CoordinateSystem::Affine {
            return Ok(self.clone());
        }
        if !system.has_y() {
            return Err(EcError::UnsupportedConversion(format!(
                "{} does not determine the affine y coordinate",
                self.model
            )));
        }
        let values = self.values();
        let z_inv = self.z().map(Mod::inverse).transpose()?.ok_or_else(|| {
            EcError::UnsupportedConversion(format!("no denominator in {}", self.model))
        })?;
        let affine_values = system
            .weights()
            .iter()
            .map(|(index, weight)| values[*index].mul(&z_inv.pow(&BigUint::from(*weight))))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(affine, affine_values)
    }

    /// Lifts an affine point into `model`, the denominator set to one.
    pub fn from_affine(model: CoordinateModel, affine: &Point) -> Result<Self, EcError> {
        if !affine.model.is_affine() {
            return Err(EcError::InvalidCoordinates(format!(
                "expected an affine point, got one in {}",
                affine.model
            )));
        }
        if affine.model.curve_model() != model.curve_model() {
            return Err(EcError::UnsupportedConversion(format!(
                "cannot lift a point from {} into {}",
                affine.model, model
            )));
        }
        match (&affine.coords, model.system()) {
            (Coords::Infinity, _) => Ok(Self::infinity(model)),
            (_, CoordinateSystem::Affine) => Ok(affine.clone()),
            (Coords::Xy { x, y }, CoordinateSystem::Projective | CoordinateSystem::Jacobian) => {
                let one = Mod::new(1u8, x.modulus().clone())?;
                Self::new(
                    model,
                    Coords::Xyz {
                        x: x.clone(),
                        y: y.clone(),
                        z: one,
                    },
                )
            }
            (Coords::Xy { x, .. }, CoordinateSystem::Xz) => {
                let one = Mod::new(1u8, x.modulus().clone())?;
                Self::new(model, Coords::Xz { x: x.clone(), z: one })
            }
            (coords, _) => Err(EcError::InvalidCoordinates(format!(
                "{:?} is not an affine point",
                coords
            ))),
        }
    }

    /// Equality of the represented points, independent of the scaling of
    /// the coordinates.
    pub fn equals(&self, other: &Self) -> Result<bool, EcError> {
        let (self_inf, other_inf) = (self.is_infinity(), other.is_infinity());
        if self_inf && other_inf {
            return Ok(true);
        }
        if self.model.variables() != other.model.variables()
            || self.model.curve_model() != other.model.curve_model()
        {
            return Err(EcError::InvalidCoordinates(format!(
                "cannot compare points in {} and {}",
                self.model, other.model
            )));
        }
        if self_inf || other_inf {
            return Ok(false);
        }
        if self.model != other.model {
            return Ok(self.to_affine()? == other.to_affine()?);
        }
        let system = self.model.system();
        let (lhs, rhs) = (self.values(), other.values());
        match (self.z(), other.z()) {
            (Some(z1), Some(z2)) => {
                for (index, weight) in system.weights() {
                    let weight = BigUint::from(*weight);
                    let left = lhs[*index].mul(&z2.pow(&weight))?;
                    let right = rhs[*index].mul(&z1.pow(&weight))?;
                    if left != right {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(lhs == rhs),
        }
    }

    /// The same point with every coordinate multiplied by `lambda` to the
    /// power of its weight.
    pub fn scaled(&self, lambda: &Mod) -> Result<Self, EcError> {
        if lambda.is_zero() {
            return Err(EcError::InvalidParameter(
                "scaling factor must be nonzero".to_owned(),
            ));
        }
        if matches!(self.coords, Coords::Infinity) {
            return Ok(self.clone());
        }
        let system = self.model.system();
        let z_index = system.z_index().ok_or_else(|| {
            EcError::UnsupportedConversion(format!("{} cannot be rescaled", self.model))
        })?;
        let mut values: Vec<Mod> = self.values().into_iter().cloned().collect();
        for (index, weight) in system.weights() {
            values[*index] = values[*index].mul(&lambda.pow(&BigUint::from(*weight)))?;
        }
        values[z_index] = values[z_index].mul(lambda)?;
        Self::from_values(self.model, values)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.coords {
            Coords::Infinity => write!(f, "Infinity in {}", self.model),
            _ => {
                write!(f, "[")?;
                for (i, (name, value)) in self
                    .model
                    .variables()
                    .iter()
                    .zip(self.values())
                    .enumerate()
                {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={:#x}", name, value)?;
                }
                write!(f, "] in {}", self.model)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::CurveModel;

    fn prime() -> BigUint {
        BigUint::parse_bytes(b"fffffffdffffffffffffffffffffffff", 16).unwrap()
    }

    fn fe(value: u128) -> Mod {
        Mod::new(value, prime()).unwrap()
    }

    fn base() -> Point {
        Point::from_named(
            CoordinateModel::SHORTW_PROJECTIVE,
            [
                ("X", fe(0x161ff7528b899b2d0c28607ca52c5b86)),
                ("Y", fe(0xcf5ac8395bafeb13c02da292dded7a83)),
                ("Z", fe(1)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn to_affine() {
        let pt = base();
        let affine = pt.to_affine().unwrap();
        assert_eq!(affine.model(), CoordinateModel::SHORTW_AFFINE);
        assert_eq!(affine.get("x"), pt.get("X"));
        assert_eq!(affine.get("y"), pt.get("Y"));

        let affine = Point::infinity(CoordinateModel::SHORTW_PROJECTIVE)
            .to_affine()
            .unwrap();
        assert_eq!(affine, Point::infinity(CoordinateModel::SHORTW_AFFINE));

        let xz = Point::from_values(CoordinateModel::MONTGOM_XZ, vec![fe(9), fe(1)]).unwrap();
        assert!(matches!(
            xz.to_affine(),
            Err(EcError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn from_affine() {
        let affine = Point::from_named(
            CoordinateModel::SHORTW_AFFINE,
            [("x", fe(0xabcd)), ("y", fe(0xef))],
        )
        .unwrap();
        let other = Point::from_affine(CoordinateModel::SHORTW_PROJECTIVE, &affine).unwrap();
        assert_eq!(other.model(), CoordinateModel::SHORTW_PROJECTIVE);
        assert_eq!(other.get("X"), affine.get("x"));
        assert_eq!(other.get("Y"), affine.get("y"));
        assert_eq!(other.get("Z"), Some(&fe(1)));

        let xz = Point::from_affine(CoordinateModel::MONTGOM_XZ, &affine);
        assert!(matches!(xz, Err(EcError::UnsupportedConversion(_))));
        assert!(Point::from_affine(CoordinateModel::SHORTW_JACOBIAN, &base()).is_err());
    }

    #[test]
    fn to_from_affine() {
        let pt = base();
        let other =
            Point::from_affine(CoordinateModel::SHORTW_PROJECTIVE, &pt.to_affine().unwrap())
                .unwrap();
        assert_eq!(pt, other);
        assert!(pt.equals(&other).unwrap());
    }

    #[test]
    fn equals() {
        let pt = Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(4), fe(6), fe(2)])
            .unwrap();
        let other =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(2), fe(3), fe(1)])
                .unwrap();
        assert!(pt.equals(&other).unwrap());
        assert_ne!(pt, other);

        let third =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(2), fe(4), fe(1)])
                .unwrap();
        assert!(!pt.equals(&third).unwrap());
    }

    #[test]
    fn jacobian_scaling() {
        let pt = Point::from_affine(CoordinateModel::SHORTW_JACOBIAN, &base().to_affine().unwrap())
            .unwrap();
        let lambda = fe(0x1234567);
        let scaled = pt.scaled(&lambda).unwrap();
        assert_eq!(scaled.get("X").unwrap(), &pt.get("X").unwrap().mul(&lambda.pow(&2u8.into())).unwrap());
        assert_eq!(scaled.get("Y").unwrap(), &pt.get("Y").unwrap().mul(&lambda.pow(&3u8.into())).unwrap());
        assert_eq!(scaled.get("Z").unwrap(), &lambda);
        assert!(pt.equals(&scaled).unwrap());
        assert_ne!(pt, scaled);
        assert_eq!(scaled.to_affine().unwrap(), base().to_affine().unwrap());

        // same variables, different scaling: compared through affine
        assert!(base().equals(&scaled).unwrap());
        assert!(pt.scaled(&fe(0)).is_err());
    }

    #[test]
    fn infinity_comparison() {
        let inf = Point::infinity(CoordinateModel::SHORTW_PROJECTIVE);
        let also_inf =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(0), fe(5), fe(0)])
                .unwrap();
        assert!(also_inf.is_infinity());
        assert!(inf.equals(&also_inf).unwrap());
        assert!(!inf.equals(&base()).unwrap());

        let zero_z =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(5), fe(7), fe(0)])
                .unwrap();
        assert!(!zero_z.is_infinity());
        assert!(zero_z.is_degenerate());
        assert!(!inf.equals(&zero_z).unwrap());
        let jacobian = |x, y| {
            Point::from_values(CoordinateModel::SHORTW_JACOBIAN, vec![fe(x), fe(y), fe(0)])
                .unwrap()
        };
        assert!(jacobian(4, 8).is_infinity());
        assert!(!jacobian(4, 7).is_infinity());
        assert!(!jacobian(0, 0).is_infinity());
        assert!(inf
            .equals(&Point::infinity(CoordinateModel::MONTGOM_XZ))
            .unwrap());
        assert!(matches!(
            base().equals(&base().to_affine().unwrap()),
            Err(EcError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn malformed_points() {
        let missing = Point::from_named(
            CoordinateModel::SHORTW_PROJECTIVE,
            [("X", fe(1)), ("Y", fe(1))],
        );
        assert!(matches!(missing, Err(EcError::InvalidCoordinates(_))));
        let unknown = Point::from_named(
            CurveModel::Montgomery.coordinates("xz").unwrap(),
            [("X", fe(1)), ("Y", fe(1))],
        );
        assert!(matches!(unknown, Err(EcError::InvalidCoordinates(_))));
        let shape = Point::new(
            CoordinateModel::MONTGOM_XZ,
            Coords::Xy { x: fe(1), y: fe(1) },
        );
        assert!(matches!(shape, Err(EcError::InvalidCoordinates(_))));
        let mixed = Point::from_values(
            CoordinateModel::SHORTW_PROJECTIVE,
            vec![fe(1), fe(1), Mod::new(1u8, 7u8).unwrap()],
        );
        assert!(matches!(mixed, Err(EcError::ModulusMismatch(..))));
    }
}
