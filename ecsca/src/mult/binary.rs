//! Double-and-add over the binary expansion of the scalar.

use super::{check_formula, check_optional, prologue, Context, Multiplier};
use crate::curve::EllipticCurve;
use crate::error::EcError;
use crate::formula::{Formula, FormulaKind};
use crate::point::Point;
use crate::trace::Recorder;

use num_bigint::BigUint;

/// Left-to-right double-and-add. With `always` set a dummy addition is
/// performed on zero bits and operations on infinity are evaluated too, so
/// every bit costs one recorded doubling and one recorded addition.
#[derive(Clone, Debug)]
pub struct LtrMultiplier {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    scale: Option<Formula>,
    always: bool,
}

impl LtrMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        add: Formula,
        dbl: Formula,
        scale: Option<Formula>,
        always: bool,
    ) -> Result<Self, EcError> {
        check_formula(curve, &add, &[FormulaKind::Add])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            add,
            dbl,
            scale,
            always,
        })
    }
}

impl Multiplier for LtrMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "ltr", scalar, point)? {
            return Ok(trivial);
        }
        let mut ctx = Context::new(&self.curve, recorder);
        let mut r = self.curve.neutral().clone();
        for i in (0..scalar.bits()).rev() {
            if self.always {
                r = ctx.dbl_recorded(&self.dbl, &r)?;
                let sum = ctx.add_recorded(&self.add, &r, point)?;
                if scalar.bit(i) {
                    r = sum;
                }
            } else {
                r = ctx.dbl(&self.dbl, &r)?;
                if scalar.bit(i) {
                    r = ctx.add(&self.add, &r, point)?;
                }
            }
        }
        ctx.scale(self.scale.as_ref(), r)
    }
}

/// Right-to-left double-and-add, `always` as for [`LtrMultiplier`].
#[derive(Clone, Debug)]
pub struct RtlMultiplier {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    scale: Option<Formula>,
    always: bool,
}

impl RtlMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        add: Formula,
        dbl: Formula,
        scale: Option<Formula>,
        always: bool,
    ) -> Result<Self, EcError> {
        check_formula(curve, &add, &[FormulaKind::Add])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            add,
            dbl,
            scale,
            always,
        })
    }
}

impl Multiplier for RtlMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "rtl", scalar, point)? {
            return Ok(trivial);
        }
        let mut ctx = Context::new(&self.curve, recorder);
        let mut r = self.curve.neutral().clone();
        let mut q = point.clone();
        for i in 0..scalar.bits() {
            if self.always {
                let sum = ctx.add_recorded(&self.add, &r, &q)?;
                if scalar.bit(i) {
                    r = sum;
                }
                q = ctx.dbl_recorded(&self.dbl, &q)?;
            } else {
                if scalar.bit(i) {
                    r = ctx.add(&self.add, &r, &q)?;
                }
                q = ctx.dbl(&self.dbl, &q)?;
            }
        }
        ctx.scale(self.scale.as_ref(), r)
    }
}
