//! # Auth Module
//!
//! The service does not manage users or sessions. It only verifies a
//! bearer token issued elsewhere and turns it into a [`Caller`] with a
//! [`Role`], which routes check against their required role.

pub mod errors;
pub mod jwt;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller roles, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}' (expected user or admin)", other)),
        }
    }
}

/// Resolved identity of an authorized caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: String,
    pub role: Role,
}

impl Caller {
    /// Pass if the caller holds `required` or a stronger role
    pub fn authorize(&self, required: Role) -> AuthResult<()> {
        if self.role >= required {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_satisfies_user() {
        let admin = Caller {
            id: "a".to_string(),
            role: Role::Admin,
        };
        assert!(admin.authorize(Role::User).is_ok());
        assert!(admin.authorize(Role::Admin).is_ok());
    }

    #[test]
    fn test_user_cannot_act_as_admin() {
        let user = Caller {
            id: "u".to_string(),
            role: Role::User,
        };
        assert!(user.authorize(Role::User).is_ok());
        assert_eq!(user.authorize(Role::Admin), Err(AuthError::Forbidden));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }
}
