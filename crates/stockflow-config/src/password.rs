use crate::{env_lookup, parse_or};

/// bcrypt's default work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Clone, Debug)]
pub struct PasswordConfig {
    /// bcrypt work factor (`BCRYPT_COST`). Each increment doubles hashing time.
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cost: parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST),
        }
    }
}
