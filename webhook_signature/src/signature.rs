use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use shared::constants::{SIGNATURE_HEX_LEN, SIGNATURE_LEN};
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("expected 64 hex characters, got {0}")]
    WrongLength(usize),
    #[error("only lowercase hex characters are allowed, found byte {byte:#04x} at position {position}")]
    InvalidCharacter { position: usize, byte: u8 },
}

/// A HMAC-SHA256 digest.
///
/// Equality is implemented on top of [`ConstantTimeEq`], comparing two signatures with `==`
/// takes the same time no matter where the first differing byte is.
#[derive(Clone, Copy)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub fn from_digest(digest: [u8; SIGNATURE_LEN]) -> Self {
        Signature(digest)
    }

    /// Parses the header representation: exactly 64 lowercase hex characters, nothing around them.
    pub fn parse(raw: &[u8]) -> Result<Self, SignatureError> {
        if raw.len() != SIGNATURE_HEX_LEN {
            return Err(SignatureError::WrongLength(raw.len()));
        }

        if let Some((position, &byte)) = raw
            .iter()
            .enumerate()
            .find(|(_, byte)| !matches!(byte, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(SignatureError::InvalidCharacter { position, byte });
        }

        let mut digest = [0u8; SIGNATURE_LEN];
        // can't fail anymore, the length and the alphabet were checked above
        hex::decode_to_slice(raw, &mut digest)
            .map_err(|_| SignatureError::WrongLength(raw.len()))?;

        Ok(Signature(digest))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl ConstantTimeEq for Signature {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Signature {}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::parse(s.as_bytes())
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const K1_DIGEST: &str = "47218758515756d868e172a5e0379a167fb10e308111f0ef13b49d5d67d6719b";

    #[test]
    fn parse_and_render() {
        let signature: Signature = K1_DIGEST.parse().unwrap();

        assert_eq!(
            signature.as_bytes(),
            &hex!("47218758515756d868e172a5e0379a167fb10e308111f0ef13b49d5d67d6719b")
        );
        assert_eq!(signature.to_string(), K1_DIGEST);
    }

    #[test]
    fn wrong_length() {
        assert_eq!(
            Signature::parse(&K1_DIGEST.as_bytes()[1..]),
            Err(SignatureError::WrongLength(63))
        );
        assert_eq!(Signature::parse(b""), Err(SignatureError::WrongLength(0)));
        assert_eq!(
            Signature::parse(format!("{K1_DIGEST}\n").as_bytes()),
            Err(SignatureError::WrongLength(65))
        );
    }

    #[test]
    fn uppercase_and_non_hex_are_rejected() {
        let upper = K1_DIGEST.to_uppercase();
        assert!(matches!(
            Signature::parse(upper.as_bytes()),
            Err(SignatureError::InvalidCharacter { .. })
        ));

        let mut garbage = K1_DIGEST.as_bytes().to_vec();
        garbage[10] = b'g';
        assert_eq!(
            Signature::parse(&garbage),
            Err(SignatureError::InvalidCharacter {
                position: 10,
                byte: b'g'
            })
        );
    }

    #[test]
    fn equality_goes_through_ct_eq() {
        let a = Signature::from_digest([0xab; SIGNATURE_LEN]);
        let mut other = [0xab; SIGNATURE_LEN];
        other[SIGNATURE_LEN - 1] = 0xac;
        let b = Signature::from_digest(other);
        let copy = a;

        assert_eq!(bool::from(a.ct_eq(&copy)), a == copy);
        assert_eq!(bool::from(a.ct_eq(&b)), a == b);
        assert!(a != b);
    }
}
