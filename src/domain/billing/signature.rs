//! Paystack webhook signature verification.
//!
//! Paystack signs each delivery with HMAC-SHA512 over the raw request body,
//! keyed with the account secret, and sends the lowercase hex digest in the
//! `x-paystack-signature` header. The digest must be computed over the bytes
//! exactly as received; a re-encoded JSON body does not reproduce them.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;

/// Header carrying the hex HMAC-SHA512 digest.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

type HmacSha512 = Hmac<Sha512>;

/// Verifier for Paystack webhook signatures.
pub struct WebhookSignatureVerifier {
    secret: SecretString,
}

impl WebhookSignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies `signature` against the raw `payload` bytes.
    ///
    /// No side effects. Header hex is accepted in either case.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - header absent or blank
    /// - `InvalidSignature` - digest mismatch; carries both digests for audit
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let received = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let expected = self.compute_signature(payload);
        let matches = hex::decode(received)
            .map(|provided| constant_time_compare(&expected, &provided))
            .unwrap_or(false);

        if matches {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature {
                expected: hex::encode(&expected),
                received: received.to_string(),
            })
        }
    }

    /// Computes the HMAC-SHA512 digest of the payload.
    pub fn compute_signature(&self, payload: &[u8]) -> Vec<u8> {
        hmac_sha512(self.secret.expose_secret().as_bytes(), payload)
    }
}

fn hmac_sha512(key: &[u8], payload: &[u8]) -> Vec<u8> {
    // An empty digest never matches, so a rejected key fails closed.
    HmacSha512::new_from_slice(key)
        .map(|mut mac| {
            mac.update(payload);
            mac.finalize().into_bytes().to_vec()
        })
        .unwrap_or_default()
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Hex HMAC-SHA512 of `payload` under `secret`, for signing test fixtures.
#[cfg(test)]
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    hex::encode(hmac_sha512(secret.as_bytes(), payload))
}
