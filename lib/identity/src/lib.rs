//! Identity primitives for the Entra ID sign-in sample.
//!
//! This crate provides:
//! - Session records stored in the browser cookie (`SessionData`)
//! - OAuth client settings for the Microsoft identity platform (`OAuthSettings`)
//! - Identity token verification against pluggable signing keys (`IdTokenVerifier`)
//! - Claims extracted from a verified identity token (`IdentityClaims`)
//!
//! # Example
//!
//! ```
//! use entra_samples_identity::SessionData;
//!
//! let mut session = SessionData::new();
//! assert!(!session.is_authenticated());
//!
//! let state = session.state().expect("fresh sessions carry a state").to_string();
//! assert!(session.state_matches(&state));
//!
//! session.record_login([("name", "Ada"), ("email", "ada@example.com")]);
//! assert!(session.is_authenticated());
//! assert_eq!(session.name(), Some("Ada"));
//! ```

pub mod claims;
pub mod error;
pub mod id_token;
pub mod oauth;
pub mod session;

pub use claims::IdentityClaims;
pub use error::{SessionError, TokenError};
pub use id_token::{IdTokenVerifier, SigningKeys, StaticKey};
pub use oauth::{OAuthSettings, ProviderEndpoints};
pub use session::{SessionData, generate_state_token};
