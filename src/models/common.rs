//! Common types and utilities shared across models.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// Every blood type, in the order the inventory dashboard shows them
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::BPositive,
        BloodType::AbPositive,
        BloodType::OPositive,
        BloodType::ANegative,
        BloodType::BNegative,
        BloodType::AbNegative,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|bt| bt.as_str() == normalized)
            .ok_or_else(|| format!("Unknown blood type: {}", s))
    }
}

/// Workflow status of a donation or a request.
///
/// Transitions are decided by the server; the client only displays the
/// current value and asks for a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "APPROVED")]
    Approved,
    #[serde(alias = "REJECTED")]
    Rejected,
    #[serde(alias = "FULFILLED")]
    Fulfilled,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::Approved,
        Status::Rejected,
        Status::Fulfilled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
            Status::Fulfilled => "fulfilled",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "approved" => Ok(Status::Approved),
            "rejected" => Ok(Status::Rejected),
            "fulfilled" => Ok(Status::Fulfilled),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Body of the status-transition endpoints
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: Status,
}

/// Deserialize an optional blood type, treating an empty string as absent.
///
/// Profiles created without a blood type come back as `""` rather than `null`.
pub fn optional_blood_type<'de, D>(deserializer: D) -> Result<Option<BloodType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Render a server timestamp as a calendar date.
///
/// Accepts RFC 3339, naive ISO date-times and plain dates. Anything else is
/// shown unchanged.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.to_string();
    }
    raw.to_string()
}
