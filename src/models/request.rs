//! Blood requests submitted by patients.

use serde::{Deserialize, Serialize};

use super::common::{BloodType, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: i64,
    pub patient_id: i64,
    pub hospital_id: i64,
    pub blood_type: BloodType,
    pub quantity: i64,
    #[serde(default)]
    pub request_date: Option<String>,
    pub status: Status,
}

/// Body of `POST /blood-requests`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub patient_id: i64,
    pub hospital_id: i64,
    pub blood_type: BloodType,
    pub quantity: i64,
    pub status: Status,
}
