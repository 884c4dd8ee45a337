//! User domain types.

use serde::{Deserialize, Serialize};

/// Organizational role of a user.
///
/// Wire format is the legacy display string (e.g. `"Business owner"`,
/// `"IT support"`); the same strings are stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Employee,
    #[serde(rename = "Business owner")]
    BusinessOwner,
    #[serde(rename = "Team Leads")]
    TeamLeads,
    #[serde(rename = "HR")]
    Hr,
    Admin,
    #[serde(rename = "IT support")]
    ItSupport,
    Manager,
}

impl Role {
    /// Parse from the wire string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Employee" => Some(Self::Employee),
            "Business owner" => Some(Self::BusinessOwner),
            "Team Leads" => Some(Self::TeamLeads),
            "HR" => Some(Self::Hr),
            "Admin" => Some(Self::Admin),
            "IT support" => Some(Self::ItSupport),
            "Manager" => Some(Self::Manager),
            _ => None,
        }
    }

    /// Convert to the wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::BusinessOwner => "Business owner",
            Self::TeamLeads => "Team Leads",
            Self::Hr => "HR",
            Self::Admin => "Admin",
            Self::ItSupport => "IT support",
            Self::Manager => "Manager",
        }
    }

    /// The single authorization predicate: only `Admin` may use the admin
    /// endpoints.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Self-reported gender, constrained to the legacy value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}
