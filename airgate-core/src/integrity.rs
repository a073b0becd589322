//! HMAC-SHA256 record signatures
//!
//! Producers sign the canonical payload of each record with a shared secret
//! and ship the lowercase hex MAC in the `signature` field. Verification
//! recomputes the MAC and compares it against the claim.
//!
//! # Security Properties
//!
//! - The comparison is constant-time (`subtle`), so response timing does not
//!   reveal how many leading bytes of a forged signature were correct
//! - The secret lives in a `SecretString`; `Debug` output is redacted and it is
//!   never logged
//! - Hex decoding uses the `hex` crate; malformed hex is a mismatch, not an error

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::canonical::canonical_payload;
use crate::errors::IntegrityError;
use crate::record::Record;

type HmacSha256 = Hmac<Sha256>;

/// Shared secret used to key every MAC in a run
#[derive(Clone, Debug)]
pub struct SecretKey(SecretString);

impl SecretKey {
    /// Wrap a secret supplied out-of-band
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    fn mac(&self, payload: &[u8]) -> Result<Vec<u8>, IntegrityError> {
        let mut mac = HmacSha256::new_from_slice(self.0.expose_secret().as_bytes())
            .map_err(|_| IntegrityError::Key)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for SecretKey {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

/// Compute the hex signature for `record`
///
/// Any signature already attached to the record is ignored.
pub fn sign(record: &Record, key: &SecretKey) -> Result<String, IntegrityError> {
    let payload = canonical_payload(record)?;
    Ok(hex::encode(key.mac(&payload)?))
}

/// Check the record's claimed signature against its canonical payload
///
/// Returns `Ok(false)` for an absent, non-hex or wrong-length signature.
/// `Err` means the MAC could not be computed at all.
pub fn verify(record: &Record, key: &SecretKey) -> Result<bool, IntegrityError> {
    let Some(claimed) = record.signature() else {
        return Ok(false);
    };
    let Ok(claimed) = hex::decode(claimed) else {
        return Ok(false);
    };

    let payload = canonical_payload(record)?;
    let computed = key.mac(&payload)?;

    Ok(computed.ct_eq(&claimed).into())
}
