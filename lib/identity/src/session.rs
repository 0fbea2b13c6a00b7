//! Session records for signed-in browsers.
//!
//! A session is created on a browser's first request and carries the
//! anti-forgery state token used during sign-in. After a successful sign-in
//! it also carries the user's name and email. The record is small enough to
//! live entirely inside an encrypted cookie.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Session key holding the user's display name.
pub const NAME_KEY: &str = "name";

/// Session key holding the user's email address.
pub const EMAIL_KEY: &str = "email";

const RESERVED_KEYS: &[&str] = &["state", "authenticated"];

const STATE_TOKEN_BYTES: usize = 32;

/// Generates a random, URL-safe state token.
#[must_use]
pub fn generate_state_token() -> String {
    let bytes: [u8; STATE_TOKEN_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Per-browser session record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Anti-forgery token round-tripped through the identity provider.
    #[serde(default)]
    state: String,
    /// Whether the browser has completed sign-in.
    #[serde(default)]
    authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    /// Any other fields saved at sign-in.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, String>,
}

impl SessionData {
    /// Creates an unauthenticated session with a fresh state token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: generate_state_token(),
            ..Self::default()
        }
    }

    /// Fills in a state token if the session has none.
    ///
    /// Returns true if the session was modified.
    pub fn ensure_state(&mut self) -> bool {
        if self.state.is_empty() {
            self.state = generate_state_token();
            true
        } else {
            false
        }
    }

    /// Returns the state token, if one has been assigned.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        (!self.state.is_empty()).then_some(self.state.as_str())
    }

    /// Compares `candidate` with the stored state in constant time.
    ///
    /// A session without a state never matches.
    #[must_use]
    pub fn state_matches(&self, candidate: &str) -> bool {
        !self.state.is_empty()
            && constant_time_eq::constant_time_eq(self.state.as_bytes(), candidate.as_bytes())
    }

    /// Returns true if the browser has completed sign-in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the signed-in user's name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the signed-in user's email address.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns an additional field saved at sign-in.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// Marks the session authenticated and merges the given fields into it.
    ///
    /// `name` and `email` populate the matching accessors; other keys are
    /// kept as extra fields. The `state` and `authenticated` keys cannot be
    /// overwritten this way and are ignored.
    pub fn record_login<I, K, V>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.authenticated = true;
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                NAME_KEY => self.name = Some(value),
                EMAIL_KEY => self.email = Some(value),
                k if RESERVED_KEYS.contains(&k) => {
                    tracing::warn!(key = k, "ignoring reserved session key");
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}
