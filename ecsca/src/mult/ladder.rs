use super::{check_formula, check_optional, prologue, Context, Multiplier};
use crate::curve::EllipticCurve;
use crate::error::EcError;
use crate::formula::{Formula, FormulaKind};
use crate::point::Point;
use crate::trace::Recorder;

use num_bigint::BigUint;

/// Ladder doing one addition and one doubling per bit, the bit selecting
/// which accumulator is doubled.
///
/// The addition may be a differential `dadd` formula, the two accumulators
/// always differ by the input point.
#[derive(Clone, Debug)]
pub struct SimpleLadderMultiplier {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    scale: Option<Formula>,
}

impl SimpleLadderMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        add: Formula,
        dbl: Formula,
        scale: Option<Formula>,
    ) -> Result<Self, EcError> {
        check_formula(curve, &add, &[FormulaKind::Add, FormulaKind::Dadd])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            add,
            dbl,
            scale,
        })
    }

    fn sum(&self, ctx: &mut Context, point: &Point, p0: &Point, p1: &Point) -> Result<Point, EcError> {
        match self.add.kind() {
            FormulaKind::Dadd => ctx.dadd(&self.add, point, p0, p1),
            _ => ctx.add(&self.add, p0, p1),
        }
    }
}

impl Multiplier for SimpleLadderMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "simple-ladder", scalar, point)? {
            return Ok(trivial);
        }
        let mut ctx = Context::new(&self.curve, recorder);
        let mut p0 = self.curve.neutral().clone();
        let mut p1 = point.clone();
        for i in (0..scalar.bits()).rev() {
            if scalar.bit(i) {
                p0 = self.sum(&mut ctx, point, &p0, &p1)?;
                p1 = ctx.dbl(&self.dbl, &p1)?;
            } else {
                p1 = self.sum(&mut ctx, point, &p0, &p1)?;
                p0 = ctx.dbl(&self.dbl, &p0)?;
            }
        }
        ctx.scale(self.scale.as_ref(), p0)
    }
}

/// Montgomery ladder over a combined `ladd` step.
#[derive(Clone, Debug)]
pub struct LadderMultiplier {
    curve: EllipticCurve,
    ladd: Formula,
    dbl: Formula,
    scale: Option<Formula>,
}

impl LadderMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        ladd: Formula,
        dbl: Formula,
        scale: Option<Formula>,
    ) -> Result<Self, EcError> {
        check_formula(curve, &ladd, &[FormulaKind::Ladd])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            ladd,
            dbl,
            scale,
        })
    }
}

impl Multiplier for LadderMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "ladder", scalar, point)? {
            return Ok(trivial);
        }
        let mut ctx = Context::new(&self.curve, recorder);
        // invariant: p1 - p0 == point
        let mut p0 = point.clone();
        let mut p1 = ctx.dbl(&self.dbl, point)?;
        for i in (0..scalar.bits() - 1).rev() {
            if scalar.bit(i) {
                let (double, sum) = ctx.ladd(&self.ladd, point, &p1, &p0)?;
                p1 = double;
                p0 = sum;
            } else {
                let (double, sum) = ctx.ladd(&self.ladd, point, &p0, &p1)?;
                p0 = double;
                p1 = sum;
            }
        }
        ctx.scale(self.scale.as_ref(), p0)
    }
}
