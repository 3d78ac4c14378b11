//! Request signing for the DANA API.
//!
//! Every call to DANA carries an asymmetric signature in the `X-SIGNATURE` header. The signature covers
//!
//! ```text
//! <HTTP METHOD>:<RELATIVE PATH>:<LOWERCASE_HEX(SHA256(MINIFIED_BODY))>:<X-TIMESTAMP>
//! ```
//!
//! and is computed with RSASSA-PKCS1-v1_5 over SHA-256, then base64 encoded. DANA recomputes the digest from the bytes
//! it receives, so the body must be sent exactly as it was hashed: [`canonicalize`] produces those bytes once, and the
//! same buffer is used for both the digest and the HTTP body.

use std::{fmt::Debug, sync::OnceLock};

use dpg_common::Secret;
use log::*;
use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::SigningKey,
    pkcs8::DecodePrivateKey,
    signature::{SignatureEncoding, Signer},
    RsaPrivateKey,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{timestamp::jakarta_now, DanaApiError};

/// Serializes `body` into compact JSON. Optional fields that are absent must already be excluded by the type's
/// `Serialize` implementation; nothing is reordered here, so field order is the declaration order of the wire types.
pub fn canonicalize<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>, DanaApiError> {
    serde_json::to_vec(body).map_err(|e| DanaApiError::Serialization(e.to_string()))
}

/// Lowercase hex encoded SHA-256 of the request body.
pub fn content_digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Everything that goes into the string-to-sign for a single request. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub http_method: String,
    /// Path component only, without scheme, host or query.
    pub url_path: String,
    pub timestamp: String,
    pub content_digest: String,
}

impl SigningContext {
    pub fn new(http_method: &str, url_path: &str, body: &[u8], timestamp: String) -> Self {
        Self {
            http_method: http_method.to_uppercase(),
            url_path: url_path.to_string(),
            timestamp,
            content_digest: content_digest(body),
        }
    }

    pub fn string_to_sign(&self) -> String {
        format!("{}:{}:{}:{}", self.http_method, self.url_path, self.content_digest, self.timestamp)
    }
}

/// The authentication headers for one outgoing call. The timestamp is part of the signed data, so a result can never be
/// reused for another request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    pub signature: String,
    pub timestamp: String,
    pub external_id: String,
}

/// `X-EXTERNAL-ID` values look like `sdk` followed by a random UUID with its first three characters removed.
pub fn new_external_id() -> String {
    let id = Uuid::new_v4().to_string();
    format!("sdk{}", &id[3..])
}

/// Replaces literal `\n` escapes (common when a key is pasted into an environment variable) with real newlines and
/// checks that the result looks like PEM.
pub fn normalize_private_key(pem: &str) -> Result<String, DanaApiError> {
    let normalized = pem.replace("\\n", "\n");
    if !normalized.contains("-----BEGIN") {
        return Err(DanaApiError::KeyFormat("invalid private key format: missing PEM headers".to_string()));
    }
    Ok(normalized.trim().to_string())
}

/// Parses an unencrypted RSA private key. PKCS#1 (`RSA PRIVATE KEY`) is tried first, then PKCS#8 (`PRIVATE KEY`).
pub fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, DanaApiError> {
    let pem = normalize_private_key(pem)?;
    match RsaPrivateKey::from_pkcs1_pem(&pem) {
        Ok(key) => {
            trace!("🔐️ Loaded PKCS#1 RSA private key");
            Ok(key)
        },
        Err(pkcs1_err) => {
            trace!("🔐️ Key is not PKCS#1 ({pkcs1_err}). Trying PKCS#8");
            RsaPrivateKey::from_pkcs8_pem(&pem).map_err(|e| match e {
                rsa::pkcs8::Error::PublicKey(_) => {
                    DanaApiError::KeyFormat("parsed key is not an RSA private key".to_string())
                },
                e => DanaApiError::KeyFormat(format!("failed to parse private key: {e}")),
            })
        },
    }
}

/// Signs DANA requests with the merchant's private key.
///
/// The key is parsed the first time it is needed and kept for the lifetime of the signer. Concurrent first use still
/// parses it exactly once. A key that fails to parse is remembered too, and every signing attempt reports the same
/// `KeyFormat` error.
pub struct RequestSigner {
    private_key: Secret<String>,
    signing_key: OnceLock<Result<SigningKey<Sha256>, DanaApiError>>,
    #[cfg(test)]
    key_loads: std::sync::atomic::AtomicUsize,
}

impl Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.signing_key.get() {
            None => "not loaded",
            Some(Ok(_)) => "loaded",
            Some(Err(_)) => "invalid",
        };
        write!(f, "RequestSigner(key: {state})")
    }
}

impl RequestSigner {
    pub fn new(private_key: Secret<String>) -> Self {
        Self {
            private_key,
            signing_key: OnceLock::new(),
            #[cfg(test)]
            key_loads: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn signing_key(&self) -> Result<&SigningKey<Sha256>, DanaApiError> {
        self.signing_key
            .get_or_init(|| {
                debug!("🔐️ Loading DANA signing key");
                #[cfg(test)]
                self.key_loads.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                parse_private_key(self.private_key.reveal()).map(SigningKey::<Sha256>::new)
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    /// Signs `data` with SHA256withRSA and returns the base64 encoded signature.
    pub fn sign(&self, data: &[u8]) -> Result<String, DanaApiError> {
        let key = self.signing_key()?;
        let signature = key.try_sign(data).map_err(|e| DanaApiError::Signing(e.to_string()))?;
        Ok(base64::encode(signature.to_bytes()))
    }

    /// Signs a request using the current Jakarta time as the timestamp.
    pub fn sign_request(&self, method: &str, path: &str, body: &[u8]) -> Result<SignatureResult, DanaApiError> {
        self.sign_request_at(method, path, body, jakarta_now())
    }

    pub fn sign_request_at(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp: String,
    ) -> Result<SignatureResult, DanaApiError> {
        let context = SigningContext::new(method, path, body, timestamp);
        let string_to_sign = context.string_to_sign();
        trace!("🔐️ String to sign: {string_to_sign}");
        let signature = self.sign(string_to_sign.as_bytes())?;
        Ok(SignatureResult { signature, timestamp: context.timestamp, external_id: new_external_id() })
    }
}
