//! Sample web app that signs users in with the Microsoft identity platform.
//!
//! Users visiting `/` are sent through the OAuth2 authorization code flow.
//! The identity token returned by the provider is verified against the
//! provider's published signing keys, and the user's name and email are kept
//! in an encrypted session cookie.

pub mod app;
pub mod auth;
pub mod config;

#[cfg(test)]
mod test_support;
