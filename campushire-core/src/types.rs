//! Core domain types
//!
//! User profiles and account roles as the platform backend emits them.

use serde::{Deserialize, Serialize};

/// Account role classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// School administrator account
    School,
    /// Company recruiter account
    Company,
    /// Student account
    Student,
}

impl Role {
    /// Lowercase wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::School => "school",
            Role::Company => "company",
            Role::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "school" => Ok(Role::School),
            "company" => Ok(Role::Company),
            "student" => Ok(Role::Student),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Authenticated user profile
///
/// The JSON form matches the backend payloads: camelCase association fields,
/// omitted entirely when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique user identifier
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Account role
    pub role: Role,
    /// Company the account belongs to (company accounts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    /// School the account belongs to (school accounts only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

impl UserProfile {
    /// Create a profile with no organization association
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
            company_id: None,
            school_id: None,
        }
    }

    /// Attach a company association
    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    /// Attach a school association
    pub fn with_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    /// Human-readable identity string for logs and diagnostics
    pub fn display_string(&self) -> String {
        format!("{} <{}> ({})", self.name, self.email, self.role)
    }
}
