use tracing::info;

use super::{ApiClient, ClientError};
use crate::models::{BloodDonation, NewDonation, Status, StatusUpdate};

impl ApiClient {
    pub async fn list_donations(&self) -> Result<Vec<BloodDonation>, ClientError> {
        self.get("/blood-donations").await
    }

    pub async fn donor_donations(&self, donor_id: i64) -> Result<Vec<BloodDonation>, ClientError> {
        self.get(&format!("/blood-donations/donor/{}", donor_id))
            .await
    }

    pub async fn create_donation(
        &self,
        donation: &NewDonation,
    ) -> Result<BloodDonation, ClientError> {
        let created: BloodDonation = self.post("/blood-donations", donation).await?;
        info!(
            donation_id = created.id,
            donor_id = created.donor_id,
            hospital_id = created.hospital_id,
            "Donation submitted"
        );
        Ok(created)
    }

    pub async fn set_donation_status(
        &self,
        id: i64,
        status: Status,
    ) -> Result<BloodDonation, ClientError> {
        let updated = self
            .put(&format!("/blood-donations/{}", id), &StatusUpdate { status })
            .await?;
        info!(donation_id = id, status = %status, "Donation status changed");
        Ok(updated)
    }
}
