// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Server roles and the environment resolver.
//!
//! The active role decides which override document is merged over the base
//! document. It is read from `CFGLAYER_SERVER_ROLE` once per run; absent or
//! unrecognized values fall back to [`Role::Dev`].

use serde::Serialize;
use std::fmt;

/// Environment variable consulted for the active role.
pub const ROLE_ENV_VAR: &str = "CFGLAYER_SERVER_ROLE";

/// The role used when none is given or the given value is unrecognized.
pub const DEFAULT_ROLE: Role = Role::Dev;

/// The active deployment role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Development
    Dev,
    /// Test
    Test,
    /// Production
    Production,
}

impl Role {
    /// Get the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Dev => "dev",
            Role::Test => "test",
            Role::Production => "production",
        }
    }

    /// File name prefix of this role's override document.
    pub fn file_prefix(&self) -> &'static str {
        self.as_str()
    }

    /// Get all roles.
    pub fn all() -> &'static [Role] {
        &[Role::Dev, Role::Test, Role::Production]
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Role::Dev),
            "test" | "testing" => Ok(Role::Test),
            "prod" | "production" => Ok(Role::Production),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The role a configuration document plays in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRole {
    /// The defaults document, merged under every role.
    Base,
    /// A role-specific override document.
    Override(Role),
}

impl DocumentRole {
    const BASE_PREFIX: &'static str = "default";

    /// Tag a file by its name prefix (case-sensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.starts_with(Self::BASE_PREFIX) {
            return Some(DocumentRole::Base);
        }
        Role::all()
            .iter()
            .find(|role| name.starts_with(role.file_prefix()))
            .map(|role| DocumentRole::Override(*role))
    }

    pub fn is_base(&self) -> bool {
        matches!(self, DocumentRole::Base)
    }
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Base => write!(f, "base"),
            DocumentRole::Override(role) => write!(f, "{}", role),
        }
    }
}

/// Where a resolved role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSource {
    /// Given explicitly by the caller.
    Explicit,
    /// Read from the role environment variable.
    Environment,
    /// Fallback because the indicator was absent or unrecognized.
    Default,
}

/// Outcome of resolving the active role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleResolution {
    pub role: Role,
    pub source: RoleSource,
    /// The raw indicator value, when one was present.
    pub raw: Option<String>,
}

/// Maps the process-wide role indicator to a [`Role`].
pub struct RoleResolver;

impl RoleResolver {
    /// Resolve the role, preferring an explicit value over the environment.
    pub fn resolve(explicit: Option<Role>) -> RoleResolution {
        match explicit {
            Some(role) => RoleResolution {
                role,
                source: RoleSource::Explicit,
                raw: None,
            },
            None => Self::from_env(),
        }
    }

    /// Read the role indicator from the environment.
    pub fn from_env() -> RoleResolution {
        let raw = std::env::var(ROLE_ENV_VAR).ok();
        Self::resolve_value(raw.as_deref())
    }

    /// Apply the default policy to a raw indicator value.
    pub fn resolve_value(raw: Option<&str>) -> RoleResolution {
        let Some(value) = raw.filter(|v| !v.trim().is_empty()) else {
            tracing::debug!("{} not set, using {}", ROLE_ENV_VAR, DEFAULT_ROLE);
            return RoleResolution {
                role: DEFAULT_ROLE,
                source: RoleSource::Default,
                raw: None,
            };
        };

        match value.parse::<Role>() {
            Ok(role) => RoleResolution {
                role,
                source: RoleSource::Environment,
                raw: Some(value.to_string()),
            },
            Err(()) => {
                tracing::warn!(
                    "Unrecognized {} value '{}', using {}",
                    ROLE_ENV_VAR,
                    value,
                    DEFAULT_ROLE
                );
                RoleResolution {
                    role: DEFAULT_ROLE,
                    source: RoleSource::Default,
                    raw: Some(value.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("DEV".parse::<Role>(), Ok(Role::Dev));
        assert_eq!("development".parse::<Role>(), Ok(Role::Dev));
        assert_eq!(" Test ".parse::<Role>(), Ok(Role::Test));
        assert_eq!("PRODUCTION".parse::<Role>(), Ok(Role::Production));
        assert_eq!("prod".parse::<Role>(), Ok(Role::Production));
        assert!("staging".parse::<Role>().is_err());
    }

    #[test]
    fn test_document_role_from_file_name() {
        assert_eq!(DocumentRole::from_file_name("defaults.yaml"), Some(DocumentRole::Base));
        assert_eq!(
            DocumentRole::from_file_name("dev.yaml"),
            Some(DocumentRole::Override(Role::Dev))
        );
        assert_eq!(
            DocumentRole::from_file_name("test.toml"),
            Some(DocumentRole::Override(Role::Test))
        );
        assert_eq!(
            DocumentRole::from_file_name("production.json"),
            Some(DocumentRole::Override(Role::Production))
        );
        assert_eq!(DocumentRole::from_file_name("random.txt"), None);
        assert_eq!(DocumentRole::from_file_name("Dev.yaml"), None);
    }

    #[test]
    fn test_absent_value_defaults_to_dev() {
        let resolution = RoleResolver::resolve_value(None);
        assert_eq!(resolution.role, Role::Dev);
        assert_eq!(resolution.source, RoleSource::Default);
        assert_eq!(resolution.raw, None);
    }

    #[test]
    fn test_blank_value_defaults_to_dev() {
        let resolution = RoleResolver::resolve_value(Some("  "));
        assert_eq!(resolution.role, Role::Dev);
        assert_eq!(resolution.source, RoleSource::Default);
    }

    #[test]
    fn test_unrecognized_value_defaults_to_dev() {
        let resolution = RoleResolver::resolve_value(Some("staging"));
        assert_eq!(resolution.role, Role::Dev);
        assert_eq!(resolution.source, RoleSource::Default);
        assert_eq!(resolution.raw.as_deref(), Some("staging"));
    }

    #[test]
    fn test_recognized_value() {
        let resolution = RoleResolver::resolve_value(Some("PRODUCTION"));
        assert_eq!(resolution.role, Role::Production);
        assert_eq!(resolution.source, RoleSource::Environment);
    }

    #[test]
    fn test_explicit_role_wins() {
        let resolution = RoleResolver::resolve(Some(Role::Test));
        assert_eq!(resolution.role, Role::Test);
        assert_eq!(resolution.source, RoleSource::Explicit);
    }
}
