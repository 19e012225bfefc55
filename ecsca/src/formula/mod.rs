//! Point-arithmetic formulas keyed by name within a coordinate model.
//!
//! A formula is a pure function over the coordinates of its input points and
//! the curve parameters. Bodies go through an [`Evaluator`] so every field
//! operation they perform is recorded in order.

mod montgomery;
mod weierstrass;

use crate::curve::EllipticCurve;
use crate::error::EcError;
use crate::model::{CoordinateModel, CoordinateSystem, CurveModel};
use crate::modular::Mod;
use crate::point::Point;

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormulaKind {
    Add,
    Dbl,
    Neg,
    Scale,
    /// ladder step: (difference, R0, R1) -> (2*R0, R0 + R1)
    Ladd,
    /// differential addition: (difference, R0, R1) -> R0 + R1
    Dadd,
}

impl FormulaKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Dbl => "dbl",
            Self::Neg => "neg",
            Self::Scale => "scale",
            Self::Ladd => "ladd",
            Self::Dadd => "dadd",
        }
    }

    pub fn num_inputs(&self) -> usize {
        match self {
            Self::Add => 2,
            Self::Dbl | Self::Neg | Self::Scale => 1,
            Self::Ladd | Self::Dadd => 3,
        }
    }

    pub fn num_outputs(&self) -> usize {
        match self {
            Self::Ladd => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Sqr,
    Neg,
    Inv,
}

/// One field operation performed by a formula and the value it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intermediate {
    pub op: OpKind,
    pub value: Mod,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCount {
    pub add: u32,
    pub sub: u32,
    pub mul: u32,
    pub sqr: u32,
    pub neg: u32,
    pub inv: u32,
}

impl OpCount {
    pub const NONE: Self = Self {
        add: 0,
        sub: 0,
        mul: 0,
        sqr: 0,
        neg: 0,
        inv: 0,
    };

    pub fn of(intermediates: &[Intermediate]) -> Self {
        let mut count = Self::NONE;
        for intermediate in intermediates {
            count.bump(intermediate.op);
        }
        count
    }

    fn bump(&mut self, op: OpKind) {
        match op {
            OpKind::Add => self.add += 1,
            OpKind::Sub => self.sub += 1,
            OpKind::Mul => self.mul += 1,
            OpKind::Sqr => self.sqr += 1,
            OpKind::Neg => self.neg += 1,
            OpKind::Inv => self.inv += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.add + self.sub + self.mul + self.sqr + self.neg + self.inv
    }
}

impl std::ops::AddAssign for OpCount {
    fn add_assign(&mut self, rhs: Self) {
        self.add += rhs.add;
        self.sub += rhs.sub;
        self.mul += rhs.mul;
        self.sqr += rhs.sqr;
        self.neg += rhs.neg;
        self.inv += rhs.inv;
    }
}

/// Field-operation recorder handed to formula bodies.
pub(crate) struct Evaluator<'a> {
    curve: &'a EllipticCurve,
    intermediates: Vec<Intermediate>,
}

impl<'a> Evaluator<'a> {
    fn new(curve: &'a EllipticCurve) -> Self {
        Self {
            curve,
            intermediates: Vec::new(),
        }
    }

    fn record(&mut self, op: OpKind, value: Mod) -> Mod {
        self.intermediates.push(Intermediate {
            op,
            value: value.clone(),
        });
        value
    }

    pub fn add(&mut self, lhs: &Mod, rhs: &Mod) -> Result<Mod, EcError> {
        let value = lhs.add(rhs)?;
        Ok(self.record(OpKind::Add, value))
    }

    pub fn sub(&mut self, lhs: &Mod, rhs: &Mod) -> Result<Mod, EcError> {
        let value = lhs.sub(rhs)?;
        Ok(self.record(OpKind::Sub, value))
    }

    pub fn mul(&mut self, lhs: &Mod, rhs: &Mod) -> Result<Mod, EcError> {
        let value = lhs.mul(rhs)?;
        Ok(self.record(OpKind::Mul, value))
    }

    pub fn sqr(&mut self, value: &Mod) -> Result<Mod, EcError> {
        let value = value.mul(value)?;
        Ok(self.record(OpKind::Sqr, value))
    }

    pub fn neg(&mut self, value: &Mod) -> Mod {
        let value = value.neg();
        self.record(OpKind::Neg, value)
    }

    pub fn inv(&mut self, value: &Mod) -> Result<Mod, EcError> {
        let value = value.inverse()?;
        Ok(self.record(OpKind::Inv, value))
    }

    pub fn param(&self, name: &str) -> Result<Mod, EcError> {
        self.curve.parameter(name)
    }

    pub fn int(&self, value: u32) -> Result<Mod, EcError> {
        Mod::new(value, self.curve.prime().clone())
    }
}

pub(crate) type EvalFn = fn(&mut Evaluator, &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError>;

/// Result of a formula evaluation together with the operations it performed.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub outputs: Vec<Point>,
    pub intermediates: Vec<Intermediate>,
}

#[derive(Clone, Copy)]
pub struct Formula {
    name: &'static str,
    kind: FormulaKind,
    model: CoordinateModel,
    parameters: &'static [&'static str],
    ops: OpCount,
    eval: EvalFn,
}

impl Formula {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FormulaKind {
        self.kind
    }

    pub fn model(&self) -> CoordinateModel {
        self.model
    }

    /// Curve parameters the formula reads, including derived ones such as `a24`.
    pub fn parameters(&self) -> &'static [&'static str] {
        self.parameters
    }

    /// Declared operation count of one evaluation.
    pub fn op_count(&self) -> OpCount {
        self.ops
    }

    pub fn num_inputs(&self) -> usize {
        self.kind.num_inputs()
    }

    pub fn num_outputs(&self) -> usize {
        self.kind.num_outputs()
    }

    fn variable_names(&self, first: usize, count: usize) -> Vec<String> {
        (first..first + count)
            .flat_map(|index| {
                self.model
                    .variables()
                    .iter()
                    .map(move |variable| format!("{}{}", variable, index))
            })
            .collect()
    }

    /// `X1, Y1, Z1, X2, ...`
    pub fn input_variables(&self) -> Vec<String> {
        self.variable_names(1, self.num_inputs())
    }

    pub fn output_variables(&self) -> Vec<String> {
        self.variable_names(self.num_inputs() + 1, self.num_outputs())
    }

    pub fn evaluate(&self, curve: &EllipticCurve, inputs: &[&Point]) -> Result<Evaluation, EcError> {
        if curve.model() != self.model.curve_model() {
            return Err(EcError::InvalidParameter(format!(
                "formula {} works on {}, the curve is {}",
                self.name,
                self.model,
                curve.model().name()
            )));
        }
        if inputs.len() != self.num_inputs() {
            return Err(EcError::InvalidParameter(format!(
                "formula {} takes {} points, got {}",
                self.name,
                self.num_inputs(),
                inputs.len()
            )));
        }
        let mut values = Vec::with_capacity(inputs.len());
        for point in inputs {
            if point.model() != self.model {
                return Err(EcError::InvalidCoordinates(format!(
                    "formula {} in {} got a point in {}",
                    self.name,
                    self.model,
                    point.model()
                )));
            }
            values.push(point.formula_values(curve.prime())?);
        }
        for value in values.iter().flatten() {
            if value.modulus() != curve.prime() {
                return Err(EcError::ModulusMismatch(
                    value.modulus().to_string(),
                    curve.prime().to_string(),
                ));
            }
        }

        let mut evaluator = Evaluator::new(curve);
        let outputs = (self.eval)(&mut evaluator, &values)?
            .into_iter()
            .map(|output| Point::from_values(self.model, output))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Evaluation {
            outputs,
            intermediates: evaluator.intermediates,
        })
    }

    pub fn call(&self, curve: &EllipticCurve, inputs: &[&Point]) -> Result<Vec<Point>, EcError> {
        Ok(self.evaluate(curve, inputs)?.outputs)
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.model == other.model
    }
}

impl Eq for Formula {}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Formula")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("model", &self.model)
            .finish()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({} for {})", self.kind.name(), self.name, self.model)
    }
}

pub(crate) fn registry(model: CoordinateModel) -> &'static [Formula] {
    match (model.curve_model(), model.system()) {
        (CurveModel::ShortWeierstrass, CoordinateSystem::Projective) => weierstrass::PROJECTIVE,
        (CurveModel::ShortWeierstrass, CoordinateSystem::Jacobian) => weierstrass::JACOBIAN,
        (CurveModel::Montgomery, CoordinateSystem::Xz) => montgomery::XZ,
        _ => &[],
    }
}
