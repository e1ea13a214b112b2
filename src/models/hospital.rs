//! Hospital records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
}

/// Body of `POST /hospitals` and `PUT /hospitals/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalPayload {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl From<Hospital> for HospitalPayload {
    fn from(h: Hospital) -> Self {
        Self {
            name: h.name,
            address: h.address,
            contact: h.contact,
        }
    }
}
