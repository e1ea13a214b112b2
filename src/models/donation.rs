//! Blood donations submitted by donors.

use serde::{Deserialize, Serialize};

use super::common::{BloodType, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodDonation {
    pub id: i64,
    pub donor_id: i64,
    pub hospital_id: i64,
    pub blood_type: BloodType,
    pub quantity: i64,
    #[serde(default)]
    pub donation_date: Option<String>,
    pub status: Status,
}

/// Body of `POST /blood-donations`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub donor_id: i64,
    pub hospital_id: i64,
    pub blood_type: BloodType,
    pub quantity: i64,
    pub status: Status,
}
