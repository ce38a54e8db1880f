//! Console login and role lookup.
//!
//! Credentials live in an explicit [`AuthConfig`] handed to the service at
//! construction; there is no process-wide credential state. The config can
//! be loaded from a YAML file or fall back to the built-in development
//! accounts.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub password: String,
    pub role: Role,
}

/// username -> credential/role mapping. BTreeMap keeps listings stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub users: BTreeMap<String, Credential>,
}

impl AuthConfig {
    /// Built-in development accounts: admin/admin123, user/user123.
    pub fn builtin() -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            "admin".to_string(),
            Credential {
                password: "admin123".to_string(),
                role: Role::Admin,
            },
        );
        users.insert(
            "user".to_string(),
            Credential {
                password: "user123".to_string(),
                role: Role::User,
            },
        );
        Self { users }
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("read auth config {:?}", path.as_ref()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parse auth config {:?}", path.as_ref()))
    }
}

pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.config
            .users
            .get(username)
            .is_some_and(|c| c.password == password)
    }

    /// Unknown users default to the non-privileged role.
    pub fn role(&self, username: &str) -> Role {
        self.config
            .users
            .get(username)
            .map_or(Role::User, |c| c.role)
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.role(username) == Role::Admin
    }
}
