//! Signed-digit multipliers: binary NAF and width-w NAF with a precomputed
//! table of odd multiples.

use super::{check_formula, check_optional, prologue, Context, Multiplier};
use crate::curve::EllipticCurve;
use crate::error::EcError;
use crate::formula::{Formula, FormulaKind};
use crate::point::Point;
use crate::trace::{Discard, Recorder};

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

const MAX_WIDTH: usize = 32;

// NOTE digits of a window of at most MAX_WIDTH bits fit an i64
fn recode(scalar: &BigUint, width: usize) -> Vec<i64> {
    let window = BigInt::one() << width;
    let half = BigInt::one() << (width - 1);
    let mut k = BigInt::from(scalar.clone());
    let mut digits = Vec::new();
    while k.is_positive() {
        let digit = if k.is_odd() {
            let mut zeta = k.mod_floor(&window);
            if zeta >= half {
                zeta -= &window;
            }
            k -= &zeta;
            zeta.to_i64().unwrap_or_default()
        } else {
            0
        };
        digits.push(digit);
        k >>= 1;
    }
    digits.reverse();
    digits
}

/// Non-adjacent form of `scalar`, most significant digit first.
pub fn naf(scalar: &BigUint) -> Vec<i64> {
    recode(scalar, 2)
}

/// Width-`width` NAF of `scalar`, most significant digit first. Nonzero
/// digits are odd and lie in `(-2^(width-1), 2^(width-1))`.
pub fn wnaf(scalar: &BigUint, width: usize) -> Result<Vec<i64>, EcError> {
    check_width(width)?;
    Ok(recode(scalar, width))
}

fn check_width(width: usize) -> Result<(), EcError> {
    if !(2..=MAX_WIDTH).contains(&width) {
        return Err(EcError::InvalidParameter(format!(
            "window width must be in 2..={}, got {}",
            MAX_WIDTH, width
        )));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct BinaryNafMultiplier {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    neg: Formula,
    scale: Option<Formula>,
}

impl BinaryNafMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        add: Formula,
        dbl: Formula,
        neg: Formula,
        scale: Option<Formula>,
    ) -> Result<Self, EcError> {
        check_formula(curve, &add, &[FormulaKind::Add])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_formula(curve, &neg, &[FormulaKind::Neg])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            add,
            dbl,
            neg,
            scale,
        })
    }
}

impl Multiplier for BinaryNafMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "binary-naf", scalar, point)? {
            return Ok(trivial);
        }
        let mut ctx = Context::new(&self.curve, recorder);
        let negated = ctx.neg(&self.neg, point)?;
        let mut q = self.curve.neutral().clone();
        for digit in naf(scalar) {
            q = ctx.dbl(&self.dbl, &q)?;
            match digit {
                1 => q = ctx.add(&self.add, &q, point)?,
                -1 => q = ctx.add(&self.add, &q, &negated)?,
                _ => {}
            }
        }
        ctx.scale(self.scale.as_ref(), q)
    }
}

/// Odd multiples `P, 3P, ..., (2^(w-1) - 1)P` of one point, optionally
/// with their negations.
#[derive(Clone, Debug)]
pub struct WindowNafTable {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    neg: Formula,
    point: Point,
    width: usize,
    multiples: Vec<Point>,
    negations: Option<Vec<Point>>,
}

impl WindowNafTable {
    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn multiples(&self) -> &[Point] {
        &self.multiples
    }

    pub fn negations(&self) -> Option<&[Point]> {
        self.negations.as_deref()
    }
}

#[derive(Clone, Debug)]
pub struct WindowNafMultiplier {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    neg: Formula,
    scale: Option<Formula>,
    width: usize,
    precompute_negation: bool,
}

impl WindowNafMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        add: Formula,
        dbl: Formula,
        neg: Formula,
        scale: Option<Formula>,
        width: usize,
        precompute_negation: bool,
    ) -> Result<Self, EcError> {
        check_width(width)?;
        check_formula(curve, &add, &[FormulaKind::Add])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_formula(curve, &neg, &[FormulaKind::Neg])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            add,
            dbl,
            neg,
            scale,
            width,
            precompute_negation,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn prepare(&self, point: &Point) -> Result<WindowNafTable, EcError> {
        self.prepare_traced(point, &mut Discard)
    }

    pub fn prepare_traced(
        &self,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<WindowNafTable, EcError> {
        if point.model() != self.curve.coordinate_model() {
            return Err(EcError::InvalidCoordinates(format!(
                "cannot precompute multiples of a point in {}",
                point.model()
            )));
        }
        let mut ctx = Context::new(&self.curve, recorder);
        let count = 1usize << (self.width - 2);
        let mut multiples = Vec::with_capacity(count);
        multiples.push(point.clone());
        if count > 1 {
            let double = ctx.dbl(&self.dbl, point)?;
            for i in 1..count {
                let next = ctx.add(&self.add, &multiples[i - 1], &double)?;
                multiples.push(next);
            }
        }
        let negations = match self.precompute_negation {
            true => Some(
                multiples
                    .iter()
                    .map(|multiple| ctx.neg(&self.neg, multiple))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            false => None,
        };
        Ok(WindowNafTable {
            curve: self.curve.clone(),
            add: self.add,
            dbl: self.dbl,
            neg: self.neg,
            point: point.clone(),
            width: self.width,
            multiples,
            negations,
        })
    }

    pub fn multiply_prepared(&self, table: &WindowNafTable, scalar: &BigUint) -> Result<Point, EcError> {
        self.multiply_prepared_traced(table, scalar, &mut Discard)
    }

    pub fn multiply_prepared_traced(
        &self,
        table: &WindowNafTable,
        scalar: &BigUint,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        self.check_table(table)?;
        if let Some(trivial) = prologue(&self.curve, "window-naf", scalar, &table.point)? {
            return Ok(trivial);
        }
        self.run(table, scalar, recorder)
    }

    /// A table is only valid for the curve, formulas and width it was
    /// precomputed with.
    fn check_table(&self, table: &WindowNafTable) -> Result<(), EcError> {
        if table.width != self.width {
            return Err(EcError::InvalidParameter(format!(
                "table of width {} used with a width {} multiplier",
                table.width, self.width
            )));
        }
        if table.curve != self.curve {
            return Err(EcError::InvalidParameter(format!(
                "table precomputed on {} used on {}",
                table.curve, self.curve
            )));
        }
        let ours = [&self.add, &self.dbl, &self.neg];
        let theirs = [&table.add, &table.dbl, &table.neg];
        if ours != theirs {
            return Err(EcError::InvalidParameter(format!(
                "table precomputed with {}, {}, {} used with {}, {}, {}",
                table.add, table.dbl, table.neg, self.add, self.dbl, self.neg
            )));
        }
        Ok(())
    }

    fn run(
        &self,
        table: &WindowNafTable,
        scalar: &BigUint,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        let mut ctx = Context::new(&self.curve, recorder);
        let mut q = self.curve.neutral().clone();
        for digit in recode(scalar, self.width) {
            q = ctx.dbl(&self.dbl, &q)?;
            if digit.is_zero() {
                continue;
            }
            let index = (digit.unsigned_abs() / 2) as usize;
            if digit > 0 {
                q = ctx.add(&self.add, &q, &table.multiples[index])?;
            } else {
                let negated = match &table.negations {
                    Some(negations) => negations[index].clone(),
                    None => ctx.neg(&self.neg, &table.multiples[index])?,
                };
                q = ctx.add(&self.add, &q, &negated)?;
            }
        }
        ctx.scale(self.scale.as_ref(), q)
    }
}

impl Multiplier for WindowNafMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "window-naf", scalar, point)? {
            return Ok(trivial);
        }
        let table = self.prepare_traced(point, recorder)?;
        self.run(&table, scalar, recorder)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curve::test_curves::{secp128r1, secp128r1_base};
    use crate::model::{CoordinateModel, CurveModel};
    use crate::modular::Mod;
    use crate::mult::LtrMultiplier;
    use crate::trace::Trace;

    fn value(digits: &[i64]) -> BigInt {
        digits
            .iter()
            .fold(BigInt::zero(), |acc, digit| (acc << 1) + BigInt::from(*digit))
    }

    #[test]
    fn naf_digits() {
        assert_eq!(naf(&BigUint::from(7u8)), [1, 0, 0, -1]);
        assert_eq!(naf(&BigUint::from(10u8)), [1, 0, 1, 0]);
        assert!(naf(&BigUint::zero()).is_empty());

        for k in [1u32, 2, 3, 255, 0xdead_beef] {
            let digits = naf(&BigUint::from(k));
            assert_eq!(value(&digits), BigInt::from(k));
            assert!(digits.windows(2).all(|pair| pair[0] == 0 || pair[1] == 0));
        }
    }

    #[test]
    fn wnaf_digits() {
        assert_eq!(wnaf(&BigUint::from(7u8), 3).unwrap(), [1, 0, 0, -1]);
        assert_eq!(wnaf(&BigUint::from(7u8), 4).unwrap(), [7]);
        let k = BigUint::parse_bytes(b"fffffffe0000000075a30d1b9038a115", 16).unwrap();
        for width in 2..=6 {
            let digits = wnaf(&k, width).unwrap();
            assert_eq!(value(&digits), BigInt::from(k.clone()));
            let bound = 1i64 << (width - 1);
            for (i, digit) in digits.iter().enumerate().filter(|(_, d)| **d != 0) {
                assert!(digit % 2 != 0 && digit.abs() < bound);
                // at most one nonzero digit in any window of `width` digits
                assert!(digits[i + 1..].iter().take(width - 1).all(|d| *d == 0));
            }
        }
        assert!(wnaf(&k, 1).is_err());
        assert!(wnaf(&k, MAX_WIDTH + 1).is_err());
        assert_eq!(wnaf(&k, 2).unwrap(), naf(&k));
    }

    fn formulas() -> (Formula, Formula, Formula, Formula) {
        let model = CoordinateModel::SHORTW_PROJECTIVE;
        (
            model.formula("add-1998-cmo").unwrap(),
            model.formula("dbl-1998-cmo").unwrap(),
            model.formula("neg").unwrap(),
            model.formula("z").unwrap(),
        )
    }

    #[test]
    fn naf_multipliers_match_ltr() {
        let curve = secp128r1();
        let g = secp128r1_base();
        let (add, dbl, neg, z) = formulas();
        let ltr = LtrMultiplier::new(&curve, add, dbl, Some(z), false).unwrap();
        let bnaf = BinaryNafMultiplier::new(&curve, add, dbl, neg, Some(z)).unwrap();
        for k in [7u32, 10, 0xdead_beef] {
            let k = BigUint::from(k);
            let expected = ltr.multiply(&k, &g).unwrap();
            assert_eq!(bnaf.multiply(&k, &g).unwrap(), expected);
            for width in 2..=5 {
                for precompute in [false, true] {
                    let wnaf = WindowNafMultiplier::new(&curve, add, dbl, neg, Some(z), width, precompute)
                        .unwrap();
                    assert_eq!(wnaf.multiply(&k, &g).unwrap(), expected, "width {}", width);
                }
            }
        }
    }

    #[test]
    fn prepared_table() {
        let curve = secp128r1();
        let g = secp128r1_base();
        let (add, dbl, neg, _) = formulas();
        let wnaf = WindowNafMultiplier::new(&curve, add, dbl, neg, None, 4, true).unwrap();

        let mut trace = Trace::new();
        let table = wnaf.prepare_traced(&g, &mut trace).unwrap();
        assert_eq!(table.multiples().len(), 4);
        assert_eq!(table.negations().map(<[Point]>::len), Some(4));
        assert_eq!(trace.count(FormulaKind::Dbl), 1);
        assert_eq!(trace.count(FormulaKind::Add), 3);
        assert_eq!(trace.count(FormulaKind::Neg), 4);

        let ltr = LtrMultiplier::new(&curve, add, dbl, None, false).unwrap();
        for (i, multiple) in table.multiples().iter().enumerate() {
            let expected = ltr.multiply(&BigUint::from(2 * i + 1), &g).unwrap();
            assert!(multiple.equals(&expected).unwrap());
        }

        // the table is reused across scalars without further precomputation
        let mut trace = Trace::new();
        let k = BigUint::from(0x7fu8);
        let prepared = wnaf.multiply_prepared_traced(&table, &k, &mut trace).unwrap();
        assert_eq!(trace.count(FormulaKind::Neg), 0);
        assert!(prepared.equals(&ltr.multiply(&k, &g).unwrap()).unwrap());

        let narrow = WindowNafMultiplier::new(&curve, add, dbl, neg, None, 3, false).unwrap();
        assert!(matches!(
            narrow.multiply_prepared(&table, &k),
            Err(EcError::InvalidParameter(_))
        ));
    }

    #[test]
    fn table_bound_to_its_multiplier() {
        let curve = secp128r1();
        let g = secp128r1_base();
        let (add, dbl, neg, _) = formulas();
        let wnaf = WindowNafMultiplier::new(&curve, add, dbl, neg, None, 3, false).unwrap();
        let k = BigUint::from(0x5au8);

        let rcb = CoordinateModel::SHORTW_PROJECTIVE.formula("add-2015-rcb").unwrap();
        let complete = WindowNafMultiplier::new(&curve, rcb, dbl, neg, None, 3, false).unwrap();
        let table = complete.prepare(&g).unwrap();
        assert!(matches!(
            wnaf.multiply_prepared(&table, &k),
            Err(EcError::InvalidParameter(_))
        ));

        let p = BigUint::from(97u8);
        let small = EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::SHORTW_PROJECTIVE,
            [("a", BigUint::from(2u8)), ("b", BigUint::from(3u8))],
            Point::from_values(
                CoordinateModel::SHORTW_PROJECTIVE,
                vec![
                    Mod::new(3u8, p.clone()).unwrap(),
                    Mod::new(6u8, p.clone()).unwrap(),
                    Mod::new(1u8, p.clone()).unwrap(),
                ],
            )
            .unwrap(),
            p,
        )
        .unwrap();
        let foreign = WindowNafMultiplier::new(&small, add, dbl, neg, None, 3, false)
            .unwrap()
            .prepare(small.generator())
            .unwrap();
        assert!(matches!(
            wnaf.multiply_prepared(&foreign, &k),
            Err(EcError::InvalidParameter(_))
        ));
    }

    #[test]
    fn one_shot_matches_prepared() {
        let curve = secp128r1();
        let g = secp128r1_base();
        let (add, dbl, neg, z) = formulas();
        let wnaf = WindowNafMultiplier::new(&curve, add, dbl, neg, Some(z), 4, true).unwrap();
        let k = BigUint::from(0xdead_beefu32);

        let mut one_shot = Trace::new();
        let direct = wnaf.multiply_traced(&k, &g, &mut one_shot).unwrap();
        let mut split = Trace::new();
        let table = wnaf.prepare_traced(&g, &mut split).unwrap();
        let prepared = wnaf.multiply_prepared_traced(&table, &k, &mut split).unwrap();
        assert_eq!(direct, prepared);
        assert_eq!(one_shot.formulas(), split.formulas());
    }
}
