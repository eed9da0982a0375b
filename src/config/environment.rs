//! eBay API environment selection.
//!
//! This module provides the [`Environment`] enum used to pick between the
//! production and sandbox URL of a service in the endpoint table.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The eBay environment a request is sent to.
///
/// # Example
///
/// ```rust
/// use ebay_trading::Environment;
///
/// let env: Environment = "sandbox".parse().unwrap();
/// assert_eq!(env, Environment::Sandbox);
/// assert_eq!(env.as_str(), "sandbox");
/// assert_eq!(Environment::from_sandbox(false), Environment::Production);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The live marketplace.
    #[default]
    Production,
    /// The eBay developer sandbox.
    Sandbox,
}

impl Environment {
    /// Maps the `sandbox` global flag to an environment.
    #[must_use]
    pub const fn from_sandbox(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Production
        }
    }

    /// Returns the key used for this environment in the endpoint table.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            other => Err(ConfigError::UnknownName {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sandbox_flag() {
        assert_eq!(Environment::from_sandbox(true), Environment::Sandbox);
        assert_eq!(Environment::from_sandbox(false), Environment::Production);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_default_is_production() {
        assert_eq!(Environment::default(), Environment::Production);
        assert_eq!(Environment::default().to_string(), "production");
    }
}
