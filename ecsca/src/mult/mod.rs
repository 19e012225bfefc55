//! Scalar multiplication algorithms.
//!
//! Every multiplier is bound to one curve and a fixed set of formulas in the
//! curve's coordinate model. Formula calls go through a [`Context`] which
//! reports them to a [`Recorder`], so a traced run yields the exact sequence
//! of formulas and field operations the algorithm performs.

mod binary;
mod coron;
mod ladder;
mod naf;

pub use binary::{LtrMultiplier, RtlMultiplier};
pub use coron::{Blinding, CoronMultiplier, RandomProjective, ScalarOrder};
pub use ladder::{LadderMultiplier, SimpleLadderMultiplier};
pub use naf::{naf, wnaf, BinaryNafMultiplier, WindowNafMultiplier, WindowNafTable};

use crate::config::{MultiplierConfig, MultiplierKind};
use crate::curve::EllipticCurve;
use crate::error::EcError;
use crate::formula::{Formula, FormulaKind};
use crate::point::Point;
use crate::trace::{Discard, FormulaAction, Recorder};

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

pub trait Multiplier {
    fn curve(&self) -> &EllipticCurve;

    /// Computes `scalar * point`, reporting every formula call to `recorder`.
    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError>;

    fn multiply(&self, scalar: &BigUint, point: &Point) -> Result<Point, EcError> {
        self.multiply_traced(scalar, point, &mut Discard)
    }

    fn multiply_signed(&self, scalar: &BigInt, point: &Point) -> Result<Point, EcError> {
        let scalar = scalar.to_biguint().ok_or_else(|| {
            EcError::InvalidParameter(format!("scalar {} is negative", scalar))
        })?;
        self.multiply(&scalar, point)
    }
}

/// Formula evaluation for one multiplication run.
pub(crate) struct Context<'a> {
    curve: &'a EllipticCurve,
    recorder: &'a mut dyn Recorder,
}

impl<'a> Context<'a> {
    pub(crate) fn new(curve: &'a EllipticCurve, recorder: &'a mut dyn Recorder) -> Self {
        Self { curve, recorder }
    }

    fn call(&mut self, formula: &Formula, inputs: &[&Point]) -> Result<Vec<Point>, EcError> {
        let evaluation = formula.evaluate(self.curve, inputs)?;
        log::trace!(
            "{} evaluated with {} field operations",
            formula.name(),
            evaluation.intermediates.len()
        );
        let outputs = evaluation.outputs.clone();
        self.recorder.record(FormulaAction {
            formula: formula.name(),
            kind: formula.kind(),
            inputs: inputs.iter().map(|point| (*point).clone()).collect(),
            outputs: evaluation.outputs,
            intermediates: evaluation.intermediates,
        });
        Ok(outputs)
    }

    fn call_single(&mut self, formula: &Formula, inputs: &[&Point]) -> Result<Point, EcError> {
        self.call(formula, inputs)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                EcError::InvalidParameter(format!("formula {} produced no point", formula.name()))
            })
    }

    pub(crate) fn add(&mut self, add: &Formula, lhs: &Point, rhs: &Point) -> Result<Point, EcError> {
        if lhs.is_infinity() {
            return Ok(rhs.clone());
        }
        if rhs.is_infinity() {
            return Ok(lhs.clone());
        }
        self.call_single(add, &[lhs, rhs])
    }

    pub(crate) fn dbl(&mut self, dbl: &Formula, point: &Point) -> Result<Point, EcError> {
        if point.is_infinity() {
            return Ok(point.clone());
        }
        self.call_single(dbl, &[point])
    }

    /// As [`Context::add`], but the formula is evaluated and recorded even
    /// when an operand is at infinity, the result still being the other
    /// operand.
    pub(crate) fn add_recorded(
        &mut self,
        add: &Formula,
        lhs: &Point,
        rhs: &Point,
    ) -> Result<Point, EcError> {
        if lhs.is_infinity() || rhs.is_infinity() {
            self.call(add, &[lhs, rhs])?;
        }
        self.add(add, lhs, rhs)
    }

    pub(crate) fn dbl_recorded(&mut self, dbl: &Formula, point: &Point) -> Result<Point, EcError> {
        if point.is_infinity() {
            self.call(dbl, &[point])?;
        }
        self.dbl(dbl, point)
    }

    pub(crate) fn neg(&mut self, neg: &Formula, point: &Point) -> Result<Point, EcError> {
        if point.is_infinity() {
            return Ok(point.clone());
        }
        self.call_single(neg, &[point])
    }

    /// `lhs + rhs` given their difference `rhs - lhs`.
    pub(crate) fn dadd(
        &mut self,
        dadd: &Formula,
        difference: &Point,
        lhs: &Point,
        rhs: &Point,
    ) -> Result<Point, EcError> {
        if lhs.is_infinity() {
            return Ok(rhs.clone());
        }
        if rhs.is_infinity() {
            return Ok(lhs.clone());
        }
        self.call_single(dadd, &[difference, lhs, rhs])
    }

    /// `(2 * lhs, lhs + rhs)` given the difference `rhs - lhs`.
    ///
    /// No infinity guard: x-only ladder formulas take the (1:0) coordinates
    /// of infinity and still give the right pair.
    pub(crate) fn ladd(
        &mut self,
        ladd: &Formula,
        difference: &Point,
        lhs: &Point,
        rhs: &Point,
    ) -> Result<(Point, Point), EcError> {
        let mut outputs = self.call(ladd, &[difference, lhs, rhs])?.into_iter();
        match (outputs.next(), outputs.next()) {
            (Some(double), Some(sum)) => Ok((double, sum)),
            _ => Err(EcError::InvalidParameter(format!(
                "formula {} produced fewer than two points",
                ladd.name()
            ))),
        }
    }

    /// Applies the optional scaling formula, infinity passes through.
    pub(crate) fn scale(&mut self, scale: Option<&Formula>, point: Point) -> Result<Point, EcError> {
        match scale {
            Some(scale) if !point.is_infinity() => self.call_single(scale, &[&point]),
            _ => Ok(point),
        }
    }
}

pub(crate) fn check_formula(
    curve: &EllipticCurve,
    formula: &Formula,
    kinds: &[FormulaKind],
) -> Result<(), EcError> {
    if formula.model() != curve.coordinate_model() {
        return Err(EcError::InvalidParameter(format!(
            "formula {} does not match the curve's {}",
            formula,
            curve.coordinate_model()
        )));
    }
    if !kinds.contains(&formula.kind()) {
        return Err(EcError::InvalidParameter(format!(
            "formula {} used where {} is expected",
            formula,
            kinds
                .iter()
                .map(FormulaKind::name)
                .collect::<Vec<_>>()
                .join(" or ")
        )));
    }
    Ok(())
}

pub(crate) fn check_optional(
    curve: &EllipticCurve,
    formula: Option<&Formula>,
    kind: FormulaKind,
) -> Result<(), EcError> {
    formula.map_or(Ok(()), |formula| check_formula(curve, formula, &[kind]))
}

/// Validates the input and answers the cases shared by every algorithm:
/// a zero scalar or the point at infinity give the neutral point.
pub(crate) fn prologue(
    curve: &EllipticCurve,
    algorithm: &str,
    scalar: &BigUint,
    point: &Point,
) -> Result<Option<Point>, EcError> {
    if point.model() != curve.coordinate_model() {
        return Err(EcError::InvalidCoordinates(format!(
            "cannot multiply a point in {} on a curve using {}",
            point.model(),
            curve.coordinate_model()
        )));
    }
    log::debug!("{} multiplication by a {}-bit scalar", algorithm, scalar.bits());
    if scalar.is_zero() || point.is_infinity() {
        return Ok(Some(curve.neutral().clone()));
    }
    Ok(None)
}

fn required(formula: Option<Formula>, kind: MultiplierKind, role: &str) -> Result<Formula, EcError> {
    formula.ok_or_else(|| {
        EcError::InvalidParameter(format!("{} needs a {} formula", kind.name(), role))
    })
}

/// The multiplier family as one closed set of variants.
#[derive(Clone, Debug)]
pub enum ScalarMultiplier {
    Ltr(LtrMultiplier),
    Rtl(RtlMultiplier),
    Coron(CoronMultiplier),
    SimpleLadder(SimpleLadderMultiplier),
    Ladder(LadderMultiplier),
    BinaryNaf(BinaryNafMultiplier),
    WindowNaf(WindowNafMultiplier),
}

impl ScalarMultiplier {
    /// Resolves the configured formula names in the curve's coordinate model
    /// and builds the configured algorithm.
    pub fn from_config(curve: &EllipticCurve, config: &MultiplierConfig) -> Result<Self, EcError> {
        let model = curve.coordinate_model();
        let add = model.formula(&config.add)?;
        let dbl = model.formula(&config.dbl)?;
        let neg = config.neg.as_deref().map(|name| model.formula(name)).transpose()?;
        let scale = config.scale.as_deref().map(|name| model.formula(name)).transpose()?;

        let multiplier = match config.kind {
            MultiplierKind::Ltr => Self::Ltr(LtrMultiplier::new(curve, add, dbl, scale, config.always)?),
            MultiplierKind::Rtl => Self::Rtl(RtlMultiplier::new(curve, add, dbl, scale, config.always)?),
            MultiplierKind::Coron => Self::Coron(CoronMultiplier::new(curve, add, dbl, scale)?),
            MultiplierKind::SimpleLadder => {
                Self::SimpleLadder(SimpleLadderMultiplier::new(curve, add, dbl, scale)?)
            }
            MultiplierKind::Ladder => Self::Ladder(LadderMultiplier::new(curve, add, dbl, scale)?),
            MultiplierKind::BinaryNaf => {
                let neg = required(neg, config.kind, "neg")?;
                Self::BinaryNaf(BinaryNafMultiplier::new(curve, add, dbl, neg, scale)?)
            }
            MultiplierKind::WindowNaf => {
                let neg = required(neg, config.kind, "neg")?;
                Self::WindowNaf(WindowNafMultiplier::new(
                    curve,
                    add,
                    dbl,
                    neg,
                    scale,
                    config.width,
                    config.precompute_negation,
                )?)
            }
        };
        Ok(multiplier)
    }

    pub fn kind(&self) -> MultiplierKind {
        match self {
            Self::Ltr(_) => MultiplierKind::Ltr,
            Self::Rtl(_) => MultiplierKind::Rtl,
            Self::Coron(_) => MultiplierKind::Coron,
            Self::SimpleLadder(_) => MultiplierKind::SimpleLadder,
            Self::Ladder(_) => MultiplierKind::Ladder,
            Self::BinaryNaf(_) => MultiplierKind::BinaryNaf,
            Self::WindowNaf(_) => MultiplierKind::WindowNaf,
        }
    }

    fn inner(&self) -> &dyn Multiplier {
        match self {
            Self::Ltr(m) => m,
            Self::Rtl(m) => m,
            Self::Coron(m) => m,
            Self::SimpleLadder(m) => m,
            Self::Ladder(m) => m,
            Self::BinaryNaf(m) => m,
            Self::WindowNaf(m) => m,
        }
    }
}

impl Multiplier for ScalarMultiplier {
    fn curve(&self) -> &EllipticCurve {
        self.inner().curve()
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        self.inner().multiply_traced(scalar, point, recorder)
    }
}
