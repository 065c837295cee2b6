use crate::{ConfigError, env_lookup, parse_or};

/// Access token lifetime used when `ACCESS_TOKEN_AGE` is unset, unparsable or zero.
pub const DEFAULT_ACCESS_TOKEN_AGE: i64 = 3600;

#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC secret for access tokens (`ACCESS_TOKEN_KEY`)
    pub access_secret: String,
    /// HMAC secret for refresh tokens (`REFRESH_TOKEN_KEY`)
    pub refresh_secret: String,
    /// Access token lifetime in seconds (`ACCESS_TOKEN_AGE`)
    pub access_token_expiry: i64,
}

// Secrets stay out of logs even when the whole state is Debug-printed.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = lookup("ACCESS_TOKEN_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_KEY"))?;
        let refresh_secret = lookup("REFRESH_TOKEN_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("REFRESH_TOKEN_KEY"))?;

        if access_secret == refresh_secret {
            return Err(ConfigError::Invalid(
                "REFRESH_TOKEN_KEY",
                "must differ from ACCESS_TOKEN_KEY".to_string(),
            ));
        }

        let access_token_expiry = match parse_or(&lookup, "ACCESS_TOKEN_AGE", 0i64) {
            age if age > 0 => age,
            _ => DEFAULT_ACCESS_TOKEN_AGE,
        };

        Ok(Self {
            access_secret,
            refresh_secret,
            access_token_expiry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_loads_secrets_and_age() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_KEY", "access"),
            ("REFRESH_TOKEN_KEY", "refresh"),
            ("ACCESS_TOKEN_AGE", "900"),
        ]))
        .unwrap();

        assert_eq!(config.access_secret, "access");
        assert_eq!(config.refresh_secret, "refresh");
        assert_eq!(config.access_token_expiry, 900);
    }

    #[test]
    fn test_default_access_age() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_KEY", "access"),
            ("REFRESH_TOKEN_KEY", "refresh"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_expiry, DEFAULT_ACCESS_TOKEN_AGE);

        let config = JwtConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_KEY", "access"),
            ("REFRESH_TOKEN_KEY", "refresh"),
            ("ACCESS_TOKEN_AGE", "0"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_expiry, DEFAULT_ACCESS_TOKEN_AGE);
    }

    #[test]
    fn test_missing_secret() {
        let err = JwtConfig::from_lookup(lookup_from(&[("ACCESS_TOKEN_KEY", "access")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("REFRESH_TOKEN_KEY"));

        let err = JwtConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_KEY", ""),
            ("REFRESH_TOKEN_KEY", "refresh"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("ACCESS_TOKEN_KEY"));
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let result = JwtConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_KEY", "same"),
            ("REFRESH_TOKEN_KEY", "same"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid(_, _))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN_KEY", "top-secret-access"),
            ("REFRESH_TOKEN_KEY", "top-secret-refresh"),
        ]))
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("top-secret"));
    }
}
