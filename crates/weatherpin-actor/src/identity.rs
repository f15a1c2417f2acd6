//! Caller identity attached to actor calls.
//! Issuing and verifying identities happens elsewhere; this only loads one.

use weatherpin_core::ActorConfig;

use crate::types::ActorError;

/// An opaque identity token, sent as a bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Validate a raw token. It must be non-empty visible ASCII so it fits in a header.
    pub fn parse(raw: &str) -> Result<Self, ActorError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(ActorError::InvalidIdentity("identity token is empty".into()));
        }
        if let Some(bad) = token.chars().find(|c| !c.is_ascii_graphic()) {
            return Err(ActorError::InvalidIdentity(format!(
                "identity token contains invalid character {:?}",
                bad
            )));
        }
        Ok(Self(token.to_string()))
    }

    /// Load the identity from config or environment. `None` means anonymous.
    pub fn from_config(config: &ActorConfig) -> Result<Option<Self>, ActorError> {
        config
            .resolved_identity()
            .map(|raw| Self::parse(&raw))
            .transpose()
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Identity(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_accepts() {
        let id = Identity::parse("  abc-123  ").unwrap();
        assert_eq!(id.authorization_header(), "Bearer abc-123");
    }

    #[test]
    fn test_parse_rejects_empty_and_spaces() {
        assert!(matches!(
            Identity::parse("   "),
            Err(ActorError::InvalidIdentity(_))
        ));
        assert!(matches!(
            Identity::parse("abc def"),
            Err(ActorError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let id = Identity::parse("secret").unwrap();
        assert!(!format!("{:?}", id).contains("secret"));
    }

    #[test]
    fn test_from_config_with_token() {
        let config = ActorConfig {
            identity_token: Some("principal".into()),
            ..ActorConfig::default()
        };
        let id = Identity::from_config(&config).unwrap();
        assert_eq!(id, Some(Identity::parse("principal").unwrap()));
    }
}
