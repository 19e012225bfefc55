use crate::error::EcError;
use crate::model::{CoordinateModel, CurveModel};
use crate::modular::Mod;
use crate::point::{Coords, Point};

use num_bigint::BigUint;

use std::collections::BTreeMap;
use std::fmt;

/// A concrete curve: model, coefficients over a prime field, the coordinate
/// model its points are represented in, and a generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EllipticCurve {
    model: CurveModel,
    coordinate_model: CoordinateModel,
    prime: BigUint,
    parameters: BTreeMap<String, Mod>,
    generator: Point,
    neutral: Point,
}

impl EllipticCurve {
    pub fn new<I, K>(
        model: CurveModel,
        coordinate_model: CoordinateModel,
        parameters: I,
        generator: Point,
        prime: BigUint,
    ) -> Result<Self, EcError>
    where
        I: IntoIterator<Item = (K, BigUint)>,
        K: Into<String>,
    {
        if prime <= BigUint::from(3u8) {
            return Err(EcError::InvalidCurve(format!(
                "field characteristic {} is too small",
                prime
            )));
        }
        if coordinate_model.curve_model() != model {
            return Err(EcError::InvalidCurve(format!(
                "{} does not belong to {} curves",
                coordinate_model,
                model.name()
            )));
        }
        let parameters = parameters
            .into_iter()
            .map(|(name, value)| {
                let name: String = name.into();
                Ok((name, Mod::new(value, prime.clone())?))
            })
            .collect::<Result<BTreeMap<String, Mod>, EcError>>()?;
        let mut expected: Vec<&str> = model.parameter_names().to_vec();
        expected.sort_unstable();
        if !parameters.keys().map(String::as_str).eq(expected.iter().copied()) {
            return Err(EcError::InvalidCurve(format!(
                "{} curves take parameters {:?}, got {:?}",
                model.name(),
                expected,
                parameters.keys().collect::<Vec<_>>()
            )));
        }
        if generator.model() != coordinate_model {
            return Err(EcError::InvalidCurve(format!(
                "generator is in {}, the curve uses {}",
                generator.model(),
                coordinate_model
            )));
        }
        if let Some(modulus) = generator.modulus() {
            if modulus != &prime {
                return Err(EcError::ModulusMismatch(
                    modulus.to_string(),
                    prime.to_string(),
                ));
            }
        }

        let curve = Self {
            model,
            coordinate_model,
            neutral: Point::infinity(coordinate_model),
            prime,
            parameters,
            generator,
        };
        if curve.is_singular()? {
            return Err(EcError::InvalidCurve(format!("{} is singular", curve)));
        }
        if !curve.is_on_curve(&curve.generator)? {
            return Err(EcError::InvalidCurve(format!(
                "generator {} is not on the curve",
                curve.generator
            )));
        }
        Ok(curve)
    }

    pub fn model(&self) -> CurveModel {
        self.model
    }

    pub fn coordinate_model(&self) -> CoordinateModel {
        self.coordinate_model
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn generator(&self) -> &Point {
        &self.generator
    }

    /// The point at infinity in the curve's coordinate model.
    pub fn neutral(&self) -> &Point {
        &self.neutral
    }

    pub fn affine_neutral(&self) -> Point {
        Point::infinity(self.model.affine())
    }

    pub fn parameters(&self) -> &BTreeMap<String, Mod> {
        &self.parameters
    }

    /// A coefficient by name, or one of the derived parameters formulas use:
    /// `b3 = 3*b` and `a24 = (a + 2) / 4`.
    pub fn parameter(&self, name: &str) -> Result<Mod, EcError> {
        let coefficient = |name: &str| {
            self.parameters.get(name).cloned().ok_or_else(|| {
                EcError::InvalidCurve(format!("curve has no parameter {}", name))
            })
        };
        match name {
            "b3" => {
                let b = coefficient("b")?;
                b.add(&b)?.add(&b)
            }
            "a24" => {
                let a = coefficient("a")?;
                let two = Mod::new(2u8, self.prime.clone())?;
                let four = Mod::new(4u8, self.prime.clone())?;
                a.add(&two)?.div(&four)
            }
            _ => coefficient(name),
        }
    }

    fn int(&self, value: u32) -> Result<Mod, EcError> {
        Mod::new(value, self.prime.clone())
    }

    fn is_singular(&self) -> Result<bool, EcError> {
        let a = self.parameter("a")?;
        let b = self.parameter("b")?;
        match self.model {
            // 4a^3 + 27b^2
            CurveModel::ShortWeierstrass => {
                let a3 = a.pow(&BigUint::from(3u8));
                let b2 = b.mul(&b)?;
                let disc = self.int(4)?.mul(&a3)?.add(&self.int(27)?.mul(&b2)?)?;
                Ok(disc.is_zero())
            }
            // b(a^2 - 4)
            CurveModel::Montgomery => {
                let disc = b.mul(&a.mul(&a)?.sub(&self.int(4)?)?)?;
                Ok(disc.is_zero())
            }
        }
    }

    /// Right-hand side of the curve equation divided by the coefficient of `y^2`.
    fn rhs(&self, x: &Mod) -> Result<Mod, EcError> {
        let a = self.parameter("a")?;
        let b = self.parameter("b")?;
        let x2 = x.mul(x)?;
        let x3 = x2.mul(x)?;
        match self.model {
            CurveModel::ShortWeierstrass => x3.add(&a.mul(x)?)?.add(&b),
            CurveModel::Montgomery => x3.add(&a.mul(&x2)?)?.add(x)?.div(&b),
        }
    }

    /// Checks the curve equation in affine form; x-only points are accepted
    /// when their x coordinate lifts to some point of the curve.
    pub fn is_on_curve(&self, point: &Point) -> Result<bool, EcError> {
        if point.model().curve_model() != self.model {
            return Err(EcError::InvalidCoordinates(format!(
                "point in {} checked against a {} curve",
                point.model(),
                self.model.name()
            )));
        }
        if let Some(modulus) = point.modulus() {
            if modulus != &self.prime {
                return Err(EcError::ModulusMismatch(
                    modulus.to_string(),
                    self.prime.to_string(),
                ));
            }
        }
        if point.is_infinity() {
            return Ok(true);
        }
        if point.is_degenerate() {
            return Ok(false);
        }
        match point.model().system().has_y() {
            true => match point.to_affine()?.coords() {
                Coords::Xy { x, y } => Ok(y.mul(y)? == self.rhs(x)?),
                _ => Ok(false),
            },
            false => {
                let values = point.values();
                let x = values[0].div(values[values.len() - 1])?;
                Ok(self.rhs(&x)?.is_residue())
            }
        }
    }

    /// The same curve with its points represented in `coordinate_model`.
    pub fn to_coordinates(&self, coordinate_model: CoordinateModel) -> Result<Self, EcError> {
        if coordinate_model == self.coordinate_model {
            return Ok(self.clone());
        }
        let generator = Point::from_affine(coordinate_model, &self.generator.to_affine()?)?;
        Self::new(
            self.model,
            coordinate_model,
            self.parameters
                .iter()
                .map(|(name, value)| (name.clone(), value.value().clone())),
            generator,
            self.prime.clone(),
        )
    }
}

impl fmt::Display for EllipticCurve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EllipticCurve([")?;
        for (i, (name, value)) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, "] on {} using {})", self.model.name(), self.coordinate_model)
    }
}


#[cfg(test)]
mod test {
    use super::test_curves::*;
    use super::*;

    #[test]
    fn on_curve_check() {
        let curve = secp128r1();
        let p = secp128r1_prime();
        let pt = secp128r1_base();
        assert!(curve.is_on_curve(&pt).unwrap());
        assert!(curve.is_on_curve(&pt.to_affine().unwrap()).unwrap());

        let other = Point::from_values(
            CoordinateModel::SHORTW_PROJECTIVE,
            vec![
                Mod::new(hex("161ff7528b899b2d0c28607ca52c5b86"), p.clone()).unwrap(),
                Mod::new(hex("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"), p.clone()).unwrap(),
                Mod::new(1u8, p).unwrap(),
            ],
        )
        .unwrap();
        assert!(!curve.is_on_curve(&other).unwrap());

        assert!(curve.is_on_curve(curve.neutral()).unwrap());
        assert!(curve.is_on_curve(&curve.affine_neutral()).unwrap());
        assert!(curve
            .is_on_curve(&Point::infinity(CoordinateModel::SHORTW_JACOBIAN))
            .unwrap());
        assert!(curve.is_on_curve(curve25519().generator()).is_err());
    }

    #[test]
    fn zero_denominator_points() {
        let curve = secp128r1();
        let p = secp128r1_prime();
        let fe = |value: u8| Mod::new(value, p.clone()).unwrap();

        let bogus =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(5), fe(7), fe(0)])
                .unwrap();
        assert!(!bogus.is_infinity());
        assert!(!curve.is_on_curve(&bogus).unwrap());
        assert!(!bogus.equals(curve.neutral()).unwrap());
        let result = EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::SHORTW_PROJECTIVE,
            [
                ("a", hex("fffffffdfffffffffffffffffffffffc")),
                ("b", hex("e87579c11079f43dd824993c2cee5ed3")),
            ],
            bogus,
            p.clone(),
        );
        assert!(matches!(result, Err(EcError::InvalidCurve(_))));

        let infinity =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(0), fe(7), fe(0)])
                .unwrap();
        assert!(infinity.is_infinity());
        assert!(curve.is_on_curve(&infinity).unwrap());
        let zero =
            Point::from_values(CoordinateModel::SHORTW_PROJECTIVE, vec![fe(0), fe(0), fe(0)])
                .unwrap();
        assert!(!curve.is_on_curve(&zero).unwrap());

        let jacobian = curve.to_coordinates(CoordinateModel::SHORTW_JACOBIAN).unwrap();
        let infinity =
            Point::from_values(CoordinateModel::SHORTW_JACOBIAN, vec![fe(4), fe(8), fe(0)])
                .unwrap();
        assert!(jacobian.is_on_curve(&infinity).unwrap());
        let bogus =
            Point::from_values(CoordinateModel::SHORTW_JACOBIAN, vec![fe(4), fe(7), fe(0)])
                .unwrap();
        assert!(!jacobian.is_on_curve(&bogus).unwrap());

        let x25519 = curve25519();
        let q = x25519.prime().clone();
        let xz = |x: u8, z: u8| {
            Point::from_values(
                CoordinateModel::MONTGOM_XZ,
                vec![Mod::new(x, q.clone()).unwrap(), Mod::new(z, q.clone()).unwrap()],
            )
            .unwrap()
        };
        assert!(x25519.is_on_curve(&xz(3, 0)).unwrap());
        assert!(!x25519.is_on_curve(&xz(0, 0)).unwrap());
    }

    #[test]
    fn x_only_on_curve_check() {
        // small Montgomery curve, compared against brute force
        let p = 101u32;
        let curve = EllipticCurve::new(
            CurveModel::Montgomery,
            CoordinateModel::MONTGOM_XZ,
            [("a", BigUint::from(3u8)), ("b", BigUint::from(1u8))],
            Point::from_values(
                CoordinateModel::MONTGOM_XZ,
                vec![Mod::new(0u8, p).unwrap(), Mod::new(1u8, p).unwrap()],
            )
            .unwrap(),
            BigUint::from(p),
        )
        .unwrap();
        for x in 0..p {
            let rhs = (x * x * x + 3 * x * x + x) % p;
            let lifts = (0..p).any(|y| y * y % p == rhs);
            let point = Point::from_values(
                CoordinateModel::MONTGOM_XZ,
                vec![Mod::new(x, p).unwrap(), Mod::new(1u8, p).unwrap()],
            )
            .unwrap();
            assert_eq!(curve.is_on_curve(&point).unwrap(), lifts, "x = {}", x);
        }
        assert!(curve25519().is_on_curve(curve25519().generator()).unwrap());
    }

    #[test]
    fn invalid_curves() {
        let p = secp128r1_prime();
        let off_curve = Point::from_values(
            CoordinateModel::SHORTW_PROJECTIVE,
            vec![
                Mod::new(1u8, p.clone()).unwrap(),
                Mod::new(1u8, p.clone()).unwrap(),
                Mod::new(1u8, p.clone()).unwrap(),
            ],
        )
        .unwrap();
        let result = EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::SHORTW_PROJECTIVE,
            [("a", BigUint::from(1u8)), ("b", BigUint::from(7u8))],
            off_curve,
            p.clone(),
        );
        assert!(matches!(result, Err(EcError::InvalidCurve(_))));

        let result = EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::SHORTW_PROJECTIVE,
            [("a", BigUint::from(1u8)), ("c", BigUint::from(7u8))],
            Point::infinity(CoordinateModel::SHORTW_PROJECTIVE),
            p.clone(),
        );
        assert!(matches!(result, Err(EcError::InvalidCurve(_))));

        let result = EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::MONTGOM_XZ,
            [("a", BigUint::from(1u8)), ("b", BigUint::from(7u8))],
            Point::infinity(CoordinateModel::MONTGOM_XZ),
            p.clone(),
        );
        assert!(matches!(result, Err(EcError::InvalidCurve(_))));

        let singular = EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::SHORTW_PROJECTIVE,
            [("a", BigUint::from(0u8)), ("b", BigUint::from(0u8))],
            Point::infinity(CoordinateModel::SHORTW_PROJECTIVE),
            p,
        );
        assert!(matches!(singular, Err(EcError::InvalidCurve(_))));
    }

    #[test]
    fn derived_parameters() {
        let curve = curve25519();
        assert_eq!(
            curve.parameter("a24").unwrap().value(),
            &BigUint::from(121666u32)
        );
        let curve = secp128r1();
        let b = curve.parameter("b").unwrap();
        assert_eq!(
            curve.parameter("b3").unwrap(),
            b.add(&b).unwrap().add(&b).unwrap()
        );
        assert!(matches!(
            curve.parameter("d"),
            Err(EcError::InvalidCurve(_))
        ));
    }

    #[test]
    fn coordinate_change() {
        let curve = secp128r1();
        let jacobian = curve.to_coordinates(CoordinateModel::SHORTW_JACOBIAN).unwrap();
        assert_eq!(jacobian.coordinate_model(), CoordinateModel::SHORTW_JACOBIAN);
        assert!(jacobian.generator().equals(&Point::from_affine(
            CoordinateModel::SHORTW_JACOBIAN,
            &curve.generator().to_affine().unwrap()
        ).unwrap()).unwrap());
        assert!(curve.to_coordinates(CoordinateModel::MONTGOM_XZ).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(
            secp128r1().to_string(),
            "EllipticCurve([a=340282366762482138434845932244680310780, \
             b=308990863222245658030922601041482374867] on shortw using \
             \"projective\" on shortw curves)"
        );
    }
}
