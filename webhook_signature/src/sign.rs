use anyhow::Result;
use hmac::Mac;
use shared::constants::SIGNATURE_LEN;
use shared::Payload;

use crate::secret::{SecretError, SharedSecret};
use crate::signature::Signature;
use crate::HmacSha256;

/// Body bytes together with the signature computed over exactly those bytes.
#[derive(Debug, Clone)]
pub struct SignedPayload {
    pub body: Vec<u8>,
    pub signature: Signature,
}

#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    pub fn new(secret: &SharedSecret) -> Result<Self, SecretError> {
        Ok(Signer {
            mac: secret.keyed_mac()?,
        })
    }

    pub fn sign(&self, payload: &[u8]) -> Signature {
        let mut mac = self.mac.clone();
        mac.update(payload);

        let mut digest = [0u8; SIGNATURE_LEN];
        digest.copy_from_slice(&mac.finalize().into_bytes());

        Signature::from_digest(digest)
    }

    pub fn sign_payload(&self, payload: &Payload) -> Result<SignedPayload> {
        let body = payload.to_canonical_bytes()?;
        let signature = self.sign(&body);

        tracing::debug!(bytes = body.len(), event = ?payload.event(), "signed payload");

        Ok(SignedPayload { body, signature })
    }
}
