//! Profile claims taken from a verified identity token.

use crate::error::TokenError;
use crate::session::{EMAIL_KEY, NAME_KEY};
use serde_json::{Map, Value};

/// Name and email of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub name: String,
    pub email: String,
}

impl IdentityClaims {
    /// Extracts the `name` and `email` claims from a decoded token payload.
    ///
    /// # Errors
    ///
    /// Returns `MissingClaim` if either claim is absent and `InvalidClaim`
    /// if either is not a string.
    pub fn from_claims(claims: &Map<String, Value>) -> Result<Self, TokenError> {
        Ok(Self {
            name: string_claim(claims, NAME_KEY)?,
            email: string_claim(claims, EMAIL_KEY)?,
        })
    }

    /// Returns the claims as session fields.
    #[must_use]
    pub fn into_fields(self) -> [(&'static str, String); 2] {
        [(NAME_KEY, self.name), (EMAIL_KEY, self.email)]
    }
}

fn string_claim(claims: &Map<String, Value>, claim: &str) -> Result<String, TokenError> {
    match claims.get(claim) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(TokenError::InvalidClaim {
            claim: claim.to_string(),
        }),
        None => Err(TokenError::MissingClaim {
            claim: claim.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn extracts_name_and_email() {
        let claims = payload(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "sub": "abc",
        }));

        let identity = IdentityClaims::from_claims(&claims).expect("claims");
        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.email, "ada@example.com");
    }

    #[test]
    fn missing_email_is_reported() {
        let claims = payload(json!({ "name": "Ada" }));

        let err = IdentityClaims::from_claims(&claims).expect_err("should fail");
        assert_eq!(
            err,
            TokenError::MissingClaim {
                claim: "email".to_string()
            }
        );
    }

    #[test]
    fn non_string_name_is_reported() {
        let claims = payload(json!({ "name": 42, "email": "ada@example.com" }));

        let err = IdentityClaims::from_claims(&claims).expect_err("should fail");
        assert_eq!(
            err,
            TokenError::InvalidClaim {
                claim: "name".to_string()
            }
        );
    }

    #[test]
    fn into_fields_uses_session_keys() {
        let identity = IdentityClaims {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };

        let fields = identity.into_fields();
        assert_eq!(fields[0], ("name", "Ada".to_string()));
        assert_eq!(fields[1], ("email", "ada@example.com".to_string()));
    }
}
