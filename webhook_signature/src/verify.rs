use hmac::Mac;
use thiserror::Error;

use crate::secret::{SecretError, SharedSecret};
use crate::signature::{Signature, SignatureError};
use crate::HmacSha256;

/// Why a delivery was rejected. Only meant for the server log, the sender always just sees
/// [`Verdict::Unauthorized`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("the request carries no signature")]
    MissingSignature,
    #[error("the signature is malformed: {0}")]
    MalformedSignature(#[from] SignatureError),
    #[error("the signature doesn't match the body")]
    SignatureMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    Unauthorized,
}

impl Verdict {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Verdict::Authorized)
    }
}

impl From<Result<(), VerifyError>> for Verdict {
    fn from(value: Result<(), VerifyError>) -> Self {
        match value {
            Ok(()) => Verdict::Authorized,
            Err(_) => Verdict::Unauthorized,
        }
    }
}

#[derive(Clone)]
pub struct Verifier {
    mac: HmacSha256,
}

impl Verifier {
    pub fn new(secret: &SharedSecret) -> Result<Self, SecretError> {
        Ok(Verifier {
            mac: secret.keyed_mac()?,
        })
    }

    /// Checks `signature` (the raw header value, if the header was present at all) against the
    /// HMAC of `body`.
    ///
    /// `body` has to be the bytes exactly as they were received. The digest comparison is done by
    /// [`Mac::verify_slice`], which runs in constant time.
    pub fn check(&self, body: &[u8], signature: Option<&[u8]>) -> Result<(), VerifyError> {
        let raw = signature.ok_or(VerifyError::MissingSignature)?;
        let presented = Signature::parse(raw)?;

        let mut mac = self.mac.clone();
        mac.update(body);

        mac.verify_slice(presented.as_bytes())
            .map_err(|_| VerifyError::SignatureMismatch)
    }

    pub fn verify(&self, body: &[u8], signature: Option<&[u8]>) -> Verdict {
        self.check(body, signature).into()
    }
}
