//! Secret handling for the endpoint token
//!
//! The optional `endpoint.auth_token` is kept in a `secrecy::Secret` so it is
//! zeroed on drop, redacted in `Debug` output and only reachable through an
//! explicit `expose_secret()` call when the request header is built.
//!
//! # Example
//!
//! ```rust
//! use courier::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("s3cr3t".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "s3cr3t");
//! assert!(!format!("{token:?}").contains("s3cr3t"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String wrapper that satisfies the bounds `Secret` needs
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string type used in configuration
pub type SecretString = Secret<SecretValue>;

/// Wraps a String in a SecretString
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("token-123".to_string());
        assert_eq!(secret.expose_secret(), "token-123");
        assert_eq!(secret.expose_secret().bearer(), "Bearer token-123");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-data"));
    }

    #[test]
    fn test_secret_empty() {
        assert!(secret_string("  ".to_string()).expose_secret().is_empty());
        assert!(!secret_string("x".to_string()).expose_secret().is_empty());
    }

    #[test]
    fn test_secret_toml_round_trip() {
        #[derive(Serialize, Deserialize)]
        struct Section {
            auth_token: SecretString,
        }

        let section: Section = toml::from_str(r#"auth_token = "abc""#).unwrap();
        assert_eq!(section.auth_token.expose_secret(), "abc");
    }
}
