use super::{check_formula, check_optional, prologue, Context, Multiplier};
use crate::curve::EllipticCurve;
use crate::error::EcError;
use crate::formula::{Formula, FormulaKind};
use crate::modular::Mod;
use crate::point::Point;
use crate::trace::{Discard, Recorder};

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

/// Randomization applied to the inputs of a multiplication without changing
/// its result.
pub trait Blinding {
    fn blind<R: CryptoRng + RngCore>(
        &self,
        curve: &EllipticCurve,
        scalar: &BigUint,
        point: &Point,
        rng: &mut R,
    ) -> Result<(BigUint, Point), EcError>;
}

/// Rescales the point by a random nonzero field element.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomProjective;

impl Blinding for RandomProjective {
    fn blind<R: CryptoRng + RngCore>(
        &self,
        curve: &EllipticCurve,
        scalar: &BigUint,
        point: &Point,
        rng: &mut R,
    ) -> Result<(BigUint, Point), EcError> {
        let lambda = rng.gen_biguint_range(&BigUint::one(), curve.prime());
        let lambda = Mod::new(lambda, curve.prime().clone())?;
        Ok((scalar.clone(), point.scaled(&lambda)?))
    }
}

/// Adds a random multiple of the point's order to the scalar.
#[derive(Clone, Debug)]
pub struct ScalarOrder {
    order: BigUint,
    bits: u64,
}

impl ScalarOrder {
    pub fn new(order: BigUint) -> Result<Self, EcError> {
        if order.is_zero() {
            return Err(EcError::InvalidParameter("order must be positive".to_owned()));
        }
        Ok(Self { order, bits: 32 })
    }

    /// Bit length of the random multiplier.
    pub fn with_bits(self, bits: u64) -> Self {
        Self { bits, ..self }
    }
}

impl Blinding for ScalarOrder {
    fn blind<R: CryptoRng + RngCore>(
        &self,
        _curve: &EllipticCurve,
        scalar: &BigUint,
        point: &Point,
        rng: &mut R,
    ) -> Result<(BigUint, Point), EcError> {
        let r = rng.gen_biguint(self.bits);
        Ok((scalar + r * &self.order, point.clone()))
    }
}

/// Double-and-add-always ladder, optionally run on blinded inputs.
#[derive(Clone, Debug)]
pub struct CoronMultiplier {
    curve: EllipticCurve,
    add: Formula,
    dbl: Formula,
    scale: Option<Formula>,
}

impl CoronMultiplier {
    pub fn new(
        curve: &EllipticCurve,
        add: Formula,
        dbl: Formula,
        scale: Option<Formula>,
    ) -> Result<Self, EcError> {
        check_formula(curve, &add, &[FormulaKind::Add])?;
        check_formula(curve, &dbl, &[FormulaKind::Dbl])?;
        check_optional(curve, scale.as_ref(), FormulaKind::Scale)?;
        Ok(Self {
            curve: curve.clone(),
            add,
            dbl,
            scale,
        })
    }

    fn run(&self, ctx: &mut Context, scalar: &BigUint, point: &Point) -> Result<Point, EcError> {
        let mut p0 = point.clone();
        for i in (0..scalar.bits() - 1).rev() {
            p0 = ctx.dbl(&self.dbl, &p0)?;
            let p1 = ctx.add(&self.add, &p0, point)?;
            if scalar.bit(i) {
                p0 = p1;
            }
        }
        ctx.scale(self.scale.as_ref(), p0)
    }

    pub fn multiply_blinded<B, R>(
        &self,
        scalar: &BigUint,
        point: &Point,
        blinding: &B,
        rng: &mut R,
    ) -> Result<Point, EcError>
    where
        B: Blinding,
        R: CryptoRng + RngCore,
    {
        self.multiply_blinded_traced(scalar, point, blinding, rng, &mut Discard)
    }

    pub fn multiply_blinded_traced<B, R>(
        &self,
        scalar: &BigUint,
        point: &Point,
        blinding: &B,
        rng: &mut R,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError>
    where
        B: Blinding,
        R: CryptoRng + RngCore,
    {
        if let Some(trivial) = prologue(&self.curve, "coron", scalar, point)? {
            return Ok(trivial);
        }
        let (scalar, point) = blinding.blind(&self.curve, scalar, point, rng)?;
        log::debug!("blinded scalar has {} bits", scalar.bits());
        if scalar.is_zero() {
            return Ok(self.curve.neutral().clone());
        }
        let mut ctx = Context::new(&self.curve, recorder);
        self.run(&mut ctx, &scalar, &point)
    }
}

impl Multiplier for CoronMultiplier {
    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn multiply_traced(
        &self,
        scalar: &BigUint,
        point: &Point,
        recorder: &mut dyn Recorder,
    ) -> Result<Point, EcError> {
        if let Some(trivial) = prologue(&self.curve, "coron", scalar, point)? {
            return Ok(trivial);
        }
        let mut ctx = Context::new(&self.curve, recorder);
        self.run(&mut ctx, scalar, point)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curve::test_curves::{hex, secp128r1, secp128r1_base};
    use crate::model::CoordinateModel;
    use crate::mult::LtrMultiplier;
    use crate::trace::Trace;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coron() -> CoronMultiplier {
        let model = CoordinateModel::SHORTW_PROJECTIVE;
        CoronMultiplier::new(
            &secp128r1(),
            model.formula("add-1998-cmo").unwrap(),
            model.formula("dbl-1998-cmo").unwrap(),
            Some(model.formula("z").unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn coron_matches_ltr() {
        let curve = secp128r1();
        let g = secp128r1_base();
        let model = CoordinateModel::SHORTW_PROJECTIVE;
        let ltr = LtrMultiplier::new(
            &curve,
            model.formula("add-1998-cmo").unwrap(),
            model.formula("dbl-1998-cmo").unwrap(),
            Some(model.formula("z").unwrap()),
            false,
        )
        .unwrap();
        for k in [1u32, 2, 10, 0xdead_beef] {
            let k = BigUint::from(k);
            assert_eq!(coron().multiply(&k, &g).unwrap(), ltr.multiply(&k, &g).unwrap());
        }
    }

    #[test]
    fn operation_pattern_ignores_bits() {
        let g = secp128r1_base();
        let mut sparse = Trace::new();
        let mut dense = Trace::new();
        coron()
            .multiply_traced(&BigUint::from(0b1000_0000u32), &g, &mut sparse)
            .unwrap();
        coron()
            .multiply_traced(&BigUint::from(0b1111_1111u32), &g, &mut dense)
            .unwrap();
        assert_eq!(sparse.formulas(), dense.formulas());
        assert_eq!(sparse.count(FormulaKind::Add), 7);
    }

    #[test]
    fn blinding_does_not_change_the_result() {
        let g = secp128r1_base();
        let order = hex("fffffffe0000000075a30d1b9038a115");
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let multiplier = coron();
        let k = BigUint::from(0x1234_5678u32);
        let expected = multiplier.multiply(&k, &g).unwrap();

        let projective = multiplier
            .multiply_blinded(&k, &g, &RandomProjective, &mut rng)
            .unwrap();
        assert_eq!(projective, expected);

        let blinding = ScalarOrder::new(order).unwrap().with_bits(16);
        let mut trace = Trace::new();
        let scalar = multiplier
            .multiply_blinded_traced(&k, &g, &blinding, &mut rng, &mut trace)
            .unwrap();
        assert_eq!(scalar, expected);
        assert!(trace.len() > 2 * 32);

        assert!(ScalarOrder::new(BigUint::zero()).is_err());
        assert!(multiplier
            .multiply_blinded(&BigUint::zero(), &g, &RandomProjective, &mut rng)
            .unwrap()
            .is_infinity());
    }

    #[test]
    fn random_projective_rescales_the_input() {
        let curve = secp128r1();
        let g = secp128r1_base();
        let mut rng = StdRng::seed_from_u64(7);
        let (k, blinded) = RandomProjective
            .blind(&curve, &BigUint::from(3u8), &g, &mut rng)
            .unwrap();
        assert_eq!(k, BigUint::from(3u8));
        assert_ne!(blinded, g);
        assert!(blinded.equals(&g).unwrap());
    }
}
