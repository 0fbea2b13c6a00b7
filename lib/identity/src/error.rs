//! Error types for the identity crate.
//!
//! - `TokenError`: identity token parsing, key resolution and verification
//! - `SessionError`: reading or writing the session record

use std::fmt;

/// Errors from verifying an identity token and extracting its claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a well-formed JWT.
    Malformed { reason: String },
    /// No signing key matches the token's key ID.
    UnknownKey { kid: Option<String> },
    /// The token uses an algorithm the key source does not accept.
    UnsupportedAlgorithm { algorithm: String },
    /// The provider's signing keys could not be fetched.
    KeyFetch { reason: String },
    /// Signature, audience, issuer or expiry validation failed.
    Invalid { reason: String },
    /// A required claim is absent.
    MissingClaim { claim: String },
    /// A claim is present but not a string.
    InvalidClaim { claim: String },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "malformed identity token: {reason}"),
            Self::UnknownKey { kid: Some(kid) } => write!(f, "no signing key with id '{kid}'"),
            Self::UnknownKey { kid: None } => write!(f, "token does not name a signing key"),
            Self::UnsupportedAlgorithm { algorithm } => {
                write!(f, "unsupported signing algorithm: {algorithm}")
            }
            Self::KeyFetch { reason } => write!(f, "failed to fetch signing keys: {reason}"),
            Self::Invalid { reason } => write!(f, "identity token rejected: {reason}"),
            Self::MissingClaim { claim } => write!(f, "missing required claim: {claim}"),
            Self::InvalidClaim { claim } => write!(f, "claim '{claim}' is not a string"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Errors from loading or persisting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The stored session could not be decoded.
    Load { reason: String },
    /// The session could not be encoded for storage.
    Save { reason: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { reason } => write!(f, "failed to load session: {reason}"),
            Self::Save { reason } => write!(f, "failed to save session: {reason}"),
        }
    }
}

impl std::error::Error for SessionError {}
