//! Blood stock counts per hospital and blood type.

use serde::{Deserialize, Serialize};

use super::common::BloodType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodInventory {
    pub id: i64,
    pub hospital_id: i64,
    pub blood_type: BloodType,
    pub quantity: i64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Total units of one blood type across every hospital
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSummary {
    pub blood_type: BloodType,
    pub units: i64,
}

/// Sum inventory units per blood type, one entry for each of the eight types.
pub fn summarize_stock(inventory: &[BloodInventory]) -> Vec<StockSummary> {
    BloodType::ALL
        .into_iter()
        .map(|blood_type| StockSummary {
            blood_type,
            units: inventory
                .iter()
                .filter(|item| item.blood_type == blood_type)
                .fold(0i64, |total, item| total.saturating_add(item.quantity)),
        })
        .collect()
}
