//! Stateless CSRF tokens.
//!
//! A token is `{issued_unix}.{nonce}.{hex(hmac_sha256(secret, "{issued_unix}.{nonce}"))}`.
//! Nothing is stored server side; a token is accepted while its signature
//! matches and it is younger than the configured lifetime.

use anyhow::anyhow;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Tokens older than this are rejected.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Allowed clock skew for tokens issued "in the future".
const MAX_SKEW_SECS: i64 = 60;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfError {
    #[error("The CSRF token is missing.")]
    Missing,

    #[error("The CSRF token is invalid.")]
    Invalid,

    #[error("The CSRF token has expired.")]
    Expired,
}

#[derive(Clone)]
pub struct CsrfSigner {
    mac: HmacSha256,
    ttl_secs: i64,
}

impl CsrfSigner {
    pub fn new(secret_key: &str) -> anyhow::Result<Self> {
        let mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| anyhow!("invalid CSRF secret key: {e}"))?;
        Ok(Self {
            mac,
            ttl_secs: DEFAULT_TTL_SECS,
        })
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn issue(&self) -> String {
        self.issue_at(Utc::now().timestamp(), &Uuid::new_v4().simple().to_string())
    }

    pub fn verify(&self, token: Option<&str>) -> Result<(), CsrfError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn issue_at(&self, now: i64, nonce: &str) -> String {
        let payload = format!("{now}.{nonce}");
        let sig = self.sign(&payload);
        format!("{payload}.{sig}")
    }

    fn verify_at(&self, token: Option<&str>, now: i64) -> Result<(), CsrfError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Err(CsrfError::Missing);
        };

        let mut parts = token.splitn(3, '.');
        let (Some(issued), Some(nonce), Some(sig)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CsrfError::Invalid);
        };
        let issued_at: i64 = issued.parse().map_err(|_| CsrfError::Invalid)?;
        if nonce.is_empty() {
            return Err(CsrfError::Invalid);
        }

        let expected = self.sign(&format!("{issued}.{nonce}"));
        let ok: bool = expected.as_bytes().ct_eq(sig.as_bytes()).into();
        if !ok {
            return Err(CsrfError::Invalid);
        }

        let age = now - issued_at;
        if age < -MAX_SKEW_SECS {
            return Err(CsrfError::Invalid);
        }
        if age > self.ttl_secs {
            return Err(CsrfError::Expired);
        }
        Ok(())
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
