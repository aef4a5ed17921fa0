use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use hmac::Mac;
use rand::RngCore;
use thiserror::Error;

use crate::HmacSha256;

/// Number of random bytes drawn by [`SharedSecret::generate`].
pub const GENERATED_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("the shared secret must not be empty")]
    Empty,
    #[error("the shared secret can't be used as a HMAC-SHA256 key")]
    InvalidKey,
}

/// Key material known to both the sender and the receiver of a webhook.
///
/// Cloning is cheap, all clones point to the same bytes. `Debug` never prints the key.
#[derive(Clone)]
pub struct SharedSecret {
    bytes: Arc<[u8]>,
}

impl SharedSecret {
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self, SecretError> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(SecretError::Empty);
        }

        Ok(SharedSecret {
            bytes: Arc::from(bytes),
        })
    }

    /// Draws [`GENERATED_SECRET_LEN`] bytes from the thread local CSPRNG and uses their lowercase
    /// hex rendering as the secret, so the value can be pasted into an environment variable as is.
    pub fn generate() -> Self {
        let mut raw = [0u8; GENERATED_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut raw);

        SharedSecret {
            bytes: Arc::from(hex::encode(raw).into_bytes()),
        }
    }

    pub fn expose(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn keyed_mac(&self) -> Result<HmacSha256, SecretError> {
        HmacSha256::new_from_slice(&self.bytes).map_err(|_| SecretError::InvalidKey)
    }
}

impl Debug for SharedSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(SharedSecret::new("").unwrap_err(), SecretError::Empty);
    }

    #[test]
    fn debug_does_not_leak_the_key() {
        let secret = SharedSecret::new("your-secret-key").unwrap();
        let rendered = format!("{:?}", secret);

        assert!(!rendered.contains("your-secret-key"));
        assert!(rendered.contains("len: 15"));
    }

    #[test]
    fn generated_secrets_are_hex_and_distinct() {
        let first = SharedSecret::generate();
        let second = SharedSecret::generate();

        assert_eq!(first.expose().len(), GENERATED_SECRET_LEN * 2);
        assert!(first
            .expose()
            .iter()
            .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f')));
        assert_ne!(first.expose(), second.expose());
    }
}
