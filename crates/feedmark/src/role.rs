//! Launch role resolution.
//!
//! The tool is launched from a learning platform with an opaque launch token.
//! Whoever embeds the engine supplies a [`RoleResolver`] that turns the token
//! into a [`Role`]; the role decides which landing page the user is sent to.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// LIS membership URI for learners.
pub const LEARNER_ROLE_URI: &str = "http://purl.imsglobal.org/vocab/lis/v2/membership#Learner";

/// LIS membership URI for instructors.
pub const INSTRUCTOR_ROLE_URI: &str =
    "http://purl.imsglobal.org/vocab/lis/v2/membership#Instructor";

/// Role of the launching user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Learner,
    Instructor,
    Unknown,
}

impl Role {
    /// Pick a role from the membership URIs of a launch.
    ///
    /// A user holding both roles is treated as a learner.
    pub fn from_lti_roles<S: AsRef<str>>(roles: &[S]) -> Self {
        let has = |uri: &str| roles.iter().any(|r| r.as_ref() == uri);
        if has(LEARNER_ROLE_URI) {
            Role::Learner
        } else if has(INSTRUCTOR_ROLE_URI) {
            Role::Instructor
        } else {
            Role::Unknown
        }
    }

    /// Landing page for this role, carrying the launch token along.
    pub fn landing_path(&self, token: &str) -> Option<String> {
        match self {
            Role::Learner => Some(format!("/assignments?ltik={}", token)),
            Role::Instructor => Some(format!("/admin/assignments?ltik={}", token)),
            Role::Unknown => None,
        }
    }
}

/// Resolves a launch token to a role.
pub trait RoleResolver: Send + Sync {
    /// Look up the role behind `token`.
    fn resolve_role(&self, token: &str) -> Result<Role>;
}
