use crate::error::EcError;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use std::cmp::Ordering;
use std::fmt;

/// An element of the ring of integers modulo `modulus`.
///
/// The value is always held in `[0, modulus)`. Every operation returns a new
/// element; operating on elements of different rings fails with
/// [`EcError::ModulusMismatch`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mod {
    value: BigUint,
    modulus: BigUint,
}

impl Mod {
    pub fn new(value: impl Into<BigUint>, modulus: impl Into<BigUint>) -> Result<Self, EcError> {
        let modulus = modulus.into();
        if modulus.is_zero() {
            return Err(EcError::InvalidParameter(
                "modulus must be positive".to_owned(),
            ));
        }
        let value = value.into();
        let reduced = if value < modulus {
            value
        } else {
            value % &modulus
        };
        Ok(Self {
            value: reduced,
            modulus,
        })
    }

    /// Reduces a possibly negative integer into `[0, modulus)`.
    pub fn from_signed(value: &BigInt, modulus: impl Into<BigUint>) -> Result<Self, EcError> {
        let modulus = modulus.into();
        if modulus.is_zero() {
            return Err(EcError::InvalidParameter(
                "modulus must be positive".to_owned(),
            ));
        }
        let (_, reduced) = value
            .mod_floor(&BigInt::from(modulus.clone()))
            .into_parts();
        Ok(Self {
            value: reduced,
            modulus,
        })
    }

    // NOTE the caller guarantees `value < modulus`
    fn reduced(value: BigUint, modulus: &BigUint) -> Self {
        Self {
            value,
            modulus: modulus.clone(),
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Number of significant bits of the canonical representative.
    pub fn bit_length(&self) -> u64 {
        self.value.bits()
    }

    fn same_ring(&self, other: &Self) -> Result<(), EcError> {
        if self.modulus == other.modulus {
            Ok(())
        } else {
            Err(EcError::ModulusMismatch(
                self.modulus.to_string(),
                other.modulus.to_string(),
            ))
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, EcError> {
        self.same_ring(other)?;
        let sum = &self.value + &other.value;
        let sum = if sum >= self.modulus {
            sum - &self.modulus
        } else {
            sum
        };
        Ok(Self::reduced(sum, &self.modulus))
    }

    pub fn sub(&self, other: &Self) -> Result<Self, EcError> {
        self.same_ring(other)?;
        let diff = if self.value >= other.value {
            &self.value - &other.value
        } else {
            &self.value + &self.modulus - &other.value
        };
        Ok(Self::reduced(diff, &self.modulus))
    }

    pub fn mul(&self, other: &Self) -> Result<Self, EcError> {
        self.same_ring(other)?;
        let product = (&self.value * &other.value) % &self.modulus;
        Ok(Self::reduced(product, &self.modulus))
    }

    pub fn neg(&self) -> Self {
        if self.value.is_zero() {
            self.clone()
        } else {
            Self::reduced(&self.modulus - &self.value, &self.modulus)
        }
    }

    pub fn inverse(&self) -> Result<Self, EcError> {
        let modulus = BigInt::from(self.modulus.clone());
        let egcd = BigInt::from(self.value.clone()).extended_gcd(&modulus);
        if !egcd.gcd.is_one() {
            return Err(EcError::NotInvertible(
                self.value.to_string(),
                self.modulus.to_string(),
            ));
        }
        let (_, inverse) = egcd.x.mod_floor(&modulus).into_parts();
        Ok(Self::reduced(inverse, &self.modulus))
    }

    pub fn div(&self, other: &Self) -> Result<Self, EcError> {
        self.same_ring(other)?;
        self.mul(&other.inverse()?)
    }

    pub fn pow(&self, exponent: &BigUint) -> Self {
        Self::reduced(self.value.modpow(exponent, &self.modulus), &self.modulus)
    }

    /// Exponentiation by a signed exponent, negative exponents go through the inverse.
    pub fn pow_signed(&self, exponent: &BigInt) -> Result<Self, EcError> {
        let (sign, magnitude) = exponent.clone().into_parts();
        if sign == num_bigint::Sign::Minus {
            Ok(self.inverse()?.pow(&magnitude))
        } else {
            Ok(self.pow(&magnitude))
        }
    }

    /// Euler's criterion, only meaningful for an odd prime modulus.
    pub fn is_residue(&self) -> bool {
        if self.value.is_zero() || self.modulus == BigUint::from(2u8) {
            return true;
        }
        let exponent = (&self.modulus - 1u32) >> 1;
        self.pow(&exponent).is_one()
    }
}

impl PartialOrd for Mod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.modulus == other.modulus {
            Some(self.value.cmp(&other.value))
        } else {
            None
        }
    }
}

impl fmt::Display for Mod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::LowerHex for Mod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}
