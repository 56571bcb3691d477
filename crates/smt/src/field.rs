//! BN254 scalar field elements
//!
//! Every value that crosses the crate boundary (coins, nullifiers, nonces,
//! digests) is a [`FieldElement`]. Its textual form is the canonical decimal
//! representation: no sign, no leading zeros, `"0"` for zero.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Element of the BN254 scalar field
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement(Fr);

/// Errors from decoding a decimal field element
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFieldError {
    /// Nothing to parse
    #[error("empty field element")]
    Empty,
    /// A character outside `0-9`
    #[error("invalid digit {found:?} in field element {value:?}")]
    InvalidDigit {
        /// The rejected input
        value: String,
        /// First offending character
        found: char,
    },
    /// Value is not below the field modulus
    #[error("field element {0} is not below the BN254 scalar modulus")]
    OutOfRange(String),
}

impl FieldElement {
    /// The additive identity
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// Whether this is the additive identity
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Reduce big-endian bytes modulo `p`
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Canonical 32-byte big-endian encoding
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0.into_bigint().to_bytes_be());
        out
    }

    /// The underlying arkworks value
    pub const fn inner(&self) -> Fr {
        self.0
    }

    /// The field modulus `p`
    pub fn modulus() -> BigUint {
        BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
    }

    fn to_biguint(self) -> BigUint {
        BigUint::from_bytes_be(&self.to_be_bytes())
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<FieldElement> for Fr {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({self})")
    }
}

impl FromStr for FieldElement {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseFieldError::Empty);
        }
        if let Some(found) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(ParseFieldError::InvalidDigit { value: s.to_string(), found });
        }

        // digits were checked above, parse_bytes cannot fail here
        let value = BigUint::parse_bytes(s.as_bytes(), 10).unwrap_or_default();
        if value >= Self::modulus() {
            return Err(ParseFieldError::OutOfRange(s.to_string()));
        }
        Ok(Self::from_be_bytes_mod_order(&value.to_bytes_be()))
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";
    const P_MINUS_ONE: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495616";

    #[test]
    fn test_zero_is_printed() {
        assert_eq!(FieldElement::zero().to_string(), "0");
        assert_eq!(FieldElement::default(), FieldElement::zero());
    }

    #[test]
    fn test_decimal_is_canonical() {
        let fe: FieldElement = "007".parse().unwrap();
        assert_eq!(fe, FieldElement::from(7));
        assert_eq!(fe.to_string(), "7");

        let max: FieldElement = P_MINUS_ONE.parse().unwrap();
        assert_eq!(max.to_string(), P_MINUS_ONE);
        assert_eq!(FieldElement::modulus().to_string(), P);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!("".parse::<FieldElement>(), Err(ParseFieldError::Empty));
        assert!(matches!(
            "12a".parse::<FieldElement>(),
            Err(ParseFieldError::InvalidDigit { found: 'a', .. })
        ));
        assert!(matches!("-1".parse::<FieldElement>(), Err(ParseFieldError::InvalidDigit { .. })));
        assert_eq!(
            P.parse::<FieldElement>(),
            Err(ParseFieldError::OutOfRange(P.to_string()))
        );
    }

    #[test]
    fn test_bytes_match_decimal() {
        let fe = FieldElement::from(0x0102u64);
        let bytes = fe.to_be_bytes();
        assert_eq!(bytes[30..], [0x01, 0x02]);
        assert!(bytes[..30].iter().all(|b| *b == 0));
        assert_eq!(FieldElement::from_be_bytes_mod_order(&bytes), fe);
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let fe = FieldElement::from(42);
        assert_eq!(serde_json::to_string(&fe).unwrap(), "\"42\"");
        let back: FieldElement = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, fe);
        assert!(serde_json::from_str::<FieldElement>(&format!("\"{P}\"")).is_err());
    }
}
