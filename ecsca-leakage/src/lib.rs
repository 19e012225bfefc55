#![deny(clippy::all)]
#![deny(clippy::dbg_macro)]

use ecsca::Trace;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use rand_core::RngCore;
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LeakageError {
    #[error("model takes {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },
    #[error("only one and two argument models apply to a trace, got {0} arguments")]
    UnsupportedModel(usize),
    #[error("slice begin {0} is past its end {1}")]
    InvalidSlice(u64, u64),
    #[error("invalid noise distribution: {0}")]
    Noise(#[from] NormalError),
}

/// Maps intermediate values to what a side channel observes of them.
pub trait LeakageModel {
    fn num_args(&self) -> usize;
    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError>;
}

fn check_args(expected: usize, args: &[&BigUint]) -> Result<(), LeakageError> {
    if args.len() != expected {
        return Err(LeakageError::Arity {
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl LeakageModel for Identity {
    fn num_args(&self) -> usize {
        1
    }

    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError> {
        check_args(1, args)?;
        Ok(args[0].clone())
    }
}

/// A single bit of the value.
#[derive(Clone, Copy, Debug)]
pub struct Bit {
    which: u64,
}

impl Bit {
    pub fn new(which: u64) -> Self {
        Self { which }
    }
}

impl LeakageModel for Bit {
    fn num_args(&self) -> usize {
        1
    }

    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError> {
        check_args(1, args)?;
        Ok(BigUint::from(args[0].bit(self.which) as u8))
    }
}

/// Bits `begin..end` of the value, shifted down to bit zero.
#[derive(Clone, Debug)]
pub struct Slice {
    begin: u64,
    mask: BigUint,
}

impl Slice {
    pub fn new(begin: u64, end: u64) -> Result<Self, LeakageError> {
        if begin > end {
            return Err(LeakageError::InvalidSlice(begin, end));
        }
        let mask = (BigUint::one() << (end - begin)) - 1u8;
        Ok(Self { begin, mask })
    }
}

impl LeakageModel for Slice {
    fn num_args(&self) -> usize {
        1
    }

    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError> {
        check_args(1, args)?;
        Ok((args[0] >> self.begin) & &self.mask)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HammingWeight;

impl LeakageModel for HammingWeight {
    fn num_args(&self) -> usize {
        1
    }

    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError> {
        check_args(1, args)?;
        Ok(BigUint::from(args[0].count_ones()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HammingDistance;

impl LeakageModel for HammingDistance {
    fn num_args(&self) -> usize {
        2
    }

    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError> {
        check_args(2, args)?;
        Ok(BigUint::from((args[0] ^ args[1]).count_ones()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BitLength;

impl LeakageModel for BitLength {
    fn num_args(&self) -> usize {
        1
    }

    fn leak(&self, args: &[&BigUint]) -> Result<BigUint, LeakageError> {
        check_args(1, args)?;
        Ok(BigUint::from(args[0].bits()))
    }
}

/// Additive Gaussian noise on top of a leaked value.
#[derive(Clone, Copy, Debug)]
pub struct NormalNoise {
    distribution: Normal<f64>,
}

impl NormalNoise {
    pub fn new(mean: f64, sdev: f64) -> Result<Self, LeakageError> {
        Ok(Self {
            distribution: Normal::new(mean, sdev)?,
        })
    }

    pub fn apply<R: RngCore>(&self, value: &BigUint, rng: &mut R) -> f64 {
        value.to_f64().unwrap_or(f64::INFINITY) + self.distribution.sample(rng)
    }

    pub fn leak<M, R>(&self, model: &M, args: &[&BigUint], rng: &mut R) -> Result<f64, LeakageError>
    where
        M: LeakageModel + ?Sized,
        R: RngCore,
    {
        Ok(self.apply(&model.leak(args)?, rng))
    }
}

/// Runs every intermediate value of `trace` through `model`; two-argument
/// models see each consecutive pair of values.
pub fn trace_leakage<M>(trace: &Trace, model: &M) -> Result<Vec<BigUint>, LeakageError>
where
    M: LeakageModel + ?Sized,
{
    let values: Vec<&BigUint> = trace.intermediates().map(|value| value.value()).collect();
    match model.num_args() {
        1 => values.iter().map(|&value| model.leak(&[value])).collect(),
        2 => values.windows(2).map(|pair| model.leak(pair)).collect(),
        other => Err(LeakageError::UnsupportedModel(other)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ecsca::{
        CoordinateModel, CurveModel, EllipticCurve, Mod, Multiplier, MultiplierConfig,
        MultiplierKind, Point, ScalarMultiplier,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn n(value: u64) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn deterministic_models() {
        let value = n(0b1011_0110);
        assert_eq!(Identity.leak(&[&value]).unwrap(), value);
        assert_eq!(Bit::new(0).leak(&[&value]).unwrap(), n(0));
        assert_eq!(Bit::new(2).leak(&[&value]).unwrap(), n(1));
        assert_eq!(Bit::new(200).leak(&[&value]).unwrap(), n(0));
        assert_eq!(Slice::new(1, 5).unwrap().leak(&[&value]).unwrap(), n(0b1011));
        assert_eq!(Slice::new(3, 3).unwrap().leak(&[&value]).unwrap(), n(0));
        assert_eq!(HammingWeight.leak(&[&value]).unwrap(), n(5));
        assert_eq!(HammingDistance.leak(&[&value, &n(0b1011_0001)]).unwrap(), n(3));
        assert_eq!(BitLength.leak(&[&value]).unwrap(), n(8));
        assert_eq!(BitLength.leak(&[&n(0)]).unwrap(), n(0));
    }

    #[test]
    fn invalid_use() {
        assert_eq!(Slice::new(5, 1).unwrap_err(), LeakageError::InvalidSlice(5, 1));
        assert_eq!(
            HammingDistance.leak(&[&n(1)]).unwrap_err(),
            LeakageError::Arity {
                expected: 2,
                got: 1
            }
        );
        assert!(Identity.leak(&[&n(1), &n(2)]).is_err());
        assert!(matches!(
            NormalNoise::new(0.0, -1.0),
            Err(LeakageError::Noise(_))
        ));

        struct Majority;
        impl LeakageModel for Majority {
            fn num_args(&self) -> usize {
                3
            }
            fn leak(&self, _args: &[&BigUint]) -> Result<BigUint, LeakageError> {
                Ok(n(0))
            }
        }
        assert_eq!(
            trace_leakage(&Trace::new(), &Majority).unwrap_err(),
            LeakageError::UnsupportedModel(3)
        );
    }

    #[test]
    fn noise_is_centered() {
        let mut rng = StdRng::seed_from_u64(11);
        let exact = NormalNoise::new(0.5, 0.0).unwrap();
        assert_eq!(exact.leak(&HammingWeight, &[&n(0xff)], &mut rng).unwrap(), 8.5);

        let noise = NormalNoise::new(0.0, 1.0).unwrap();
        let samples = 2000;
        let mean = (0..samples)
            .map(|_| noise.apply(&n(100), &mut rng))
            .sum::<f64>()
            / samples as f64;
        assert!((mean - 100.0).abs() < 0.2, "mean {}", mean);
    }

    fn secp128r1() -> EllipticCurve {
        let p = BigUint::parse_bytes(b"fffffffdffffffffffffffffffffffff", 16).unwrap();
        let fe = |digits: &[u8]| {
            Mod::new(BigUint::parse_bytes(digits, 16).unwrap(), p.clone()).unwrap()
        };
        let base = Point::from_values(
            CoordinateModel::SHORTW_PROJECTIVE,
            vec![
                fe(b"161ff7528b899b2d0c28607ca52c5b86"),
                fe(b"cf5ac8395bafeb13c02da292dded7a83"),
                fe(b"1"),
            ],
        )
        .unwrap();
        EllipticCurve::new(
            CurveModel::ShortWeierstrass,
            CoordinateModel::SHORTW_PROJECTIVE,
            [
                ("a", BigUint::parse_bytes(b"fffffffdfffffffffffffffffffffffc", 16).unwrap()),
                ("b", BigUint::parse_bytes(b"e87579c11079f43dd824993c2cee5ed3", 16).unwrap()),
            ],
            base,
            p.clone(),
        )
        .unwrap()
    }

    #[test]
    fn leakage_of_a_traced_multiplication() {
        let curve = secp128r1();
        let config = MultiplierConfig::new(MultiplierKind::Ltr, "add-1998-cmo", "dbl-1998-cmo");
        let multiplier = ScalarMultiplier::from_config(&curve, &config).unwrap();
        let mut trace = Trace::new();
        multiplier
            .multiply_traced(&n(0xbeef), curve.generator(), &mut trace)
            .unwrap();
        let total = trace.op_count().total() as usize;

        let weights = trace_leakage(&trace, &HammingWeight).unwrap();
        assert_eq!(weights.len(), total);
        assert!(weights.iter().all(|weight| weight <= &n(128)));

        let distances = trace_leakage(&trace, &HammingDistance).unwrap();
        assert_eq!(distances.len(), total - 1);

        let model: &dyn LeakageModel = &Bit::new(0);
        let bits = trace_leakage(&trace, model).unwrap();
        assert!(bits.iter().all(|bit| bit <= &n(1)));
    }
}
