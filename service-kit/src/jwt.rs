//! JWT signing and verification with keys taken from configuration.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Base64Parameter;

/// Token signing or verification failure.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Token or its signature segment cannot be decoded
    #[error("token signature cannot be decoded: {0}")]
    SignatureDecode(#[source] jsonwebtoken::errors::Error),

    /// Signature does not match the token content
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Token is past its expiry
    #[error("token has expired")]
    Expired,

    /// Key material is unusable for the requested algorithm
    #[error("token key is invalid: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    /// Any other signing or validation failure
    #[error("token processing failed: {0}")]
    Other(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                Self::SignatureDecode(err)
            }
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidAlgorithm => Self::InvalidKey(err),
            _ => Self::Other(err),
        }
    }
}

/// Signs claims and verifies tokens with one algorithm and key pair.
pub struct TokenSigner {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// HS256 signer over a shared secret.
    #[must_use]
    pub fn hmac(secret: &[u8]) -> Self {
        Self::with_keys(
            Algorithm::HS256,
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }

    /// HS256 signer over the decoded bytes of a base64 key parameter.
    #[must_use]
    pub fn from_key_parameter(key: &Base64Parameter) -> Self {
        Self::hmac(key.decoded_value())
    }

    /// Asymmetric signer from PEM-encoded keys.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] if the algorithm is symmetric or a
    /// key cannot be parsed for it.
    pub fn from_pem(
        algorithm: Algorithm,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> Result<Self, TokenError> {
        let (encoding, decoding) = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => (
                EncodingKey::from_rsa_pem(private_pem)?,
                DecodingKey::from_rsa_pem(public_pem)?,
            ),
            Algorithm::ES256 | Algorithm::ES384 => (
                EncodingKey::from_ec_pem(private_pem)?,
                DecodingKey::from_ec_pem(public_pem)?,
            ),
            Algorithm::EdDSA => (
                EncodingKey::from_ed_pem(private_pem)?,
                DecodingKey::from_ed_pem(public_pem)?,
            ),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                return Err(TokenError::InvalidKey(ErrorKind::InvalidAlgorithm.into()));
            }
        };
        Ok(Self::with_keys(algorithm, encoding, decoding))
    }

    fn with_keys(algorithm: Algorithm, encoding: EncodingKey, decoding: DecodingKey) -> Self {
        Self {
            algorithm,
            encoding,
            decoding,
            validation: Validation::new(algorithm),
        }
    }

    /// Replace the validation rules used by [`TokenSigner::verify`].
    #[must_use]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Sign claims into a compact token.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be serialized or signed.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        Ok(encode(&Header::new(self.algorithm), claims, &self.encoding)?)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// - [`TokenError::SignatureDecode`] for a malformed token
    /// - [`TokenError::InvalidSignature`] when the signature does not match
    /// - [`TokenError::Expired`] for an expired token
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        Ok(decode::<T>(token, &self.decoding, &self.validation)?.claims)
    }
}
