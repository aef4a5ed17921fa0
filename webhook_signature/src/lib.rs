//! HMAC-SHA256 signing and constant time verification of webhook bodies.
//!
//! Both sides hold the same [`SharedSecret`]. The sender signs the exact bytes it puts on the
//! wire with a [`Signer`] and ships the hex digest in the `X-Signature` header; the receiver feeds
//! the raw body and that header to a [`Verifier`] before it looks at the payload.

use hmac::Hmac;
use sha2::Sha256;

pub mod secret;
pub mod sign;
pub mod signature;
pub mod verify;

pub use secret::{SecretError, SharedSecret};
pub use sign::{SignedPayload, Signer};
pub use signature::{Signature, SignatureError};
pub use verify::{Verdict, Verifier, VerifyError};

pub(crate) type HmacSha256 = Hmac<Sha256>;
