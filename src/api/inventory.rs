use tracing::info;

use super::{ApiClient, ClientError};
use crate::models::BloodInventory;

impl ApiClient {
    pub async fn list_inventory(&self) -> Result<Vec<BloodInventory>, ClientError> {
        self.get("/blood-inventory").await
    }

    pub async fn hospital_inventory(
        &self,
        hospital_id: i64,
    ) -> Result<Vec<BloodInventory>, ClientError> {
        self.get(&format!("/blood-inventory/hospital/{}", hospital_id))
            .await
    }

    /// Replace an inventory record; the server answers with the stored row.
    pub async fn update_inventory(
        &self,
        item: &BloodInventory,
    ) -> Result<BloodInventory, ClientError> {
        let updated: BloodInventory = self
            .put(&format!("/blood-inventory/{}", item.id), item)
            .await?;
        info!(
            inventory_id = updated.id,
            blood_type = %updated.blood_type,
            quantity = updated.quantity,
            "Inventory updated"
        );
        Ok(updated)
    }
}
