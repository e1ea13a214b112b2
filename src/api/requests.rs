use tracing::info;

use super::{ApiClient, ClientError};
use crate::models::{BloodRequest, NewRequest, Status, StatusUpdate};

impl ApiClient {
    pub async fn list_requests(&self) -> Result<Vec<BloodRequest>, ClientError> {
        self.get("/blood-requests").await
    }

    pub async fn patient_requests(&self, patient_id: i64) -> Result<Vec<BloodRequest>, ClientError> {
        self.get(&format!("/blood-requests/patient/{}", patient_id))
            .await
    }

    pub async fn create_request(&self, request: &NewRequest) -> Result<BloodRequest, ClientError> {
        let created: BloodRequest = self.post("/blood-requests", request).await?;
        info!(
            request_id = created.id,
            patient_id = created.patient_id,
            hospital_id = created.hospital_id,
            "Blood request submitted"
        );
        Ok(created)
    }

    pub async fn set_request_status(
        &self,
        id: i64,
        status: Status,
    ) -> Result<BloodRequest, ClientError> {
        let updated = self
            .put(&format!("/blood-requests/{}", id), &StatusUpdate { status })
            .await?;
        info!(request_id = id, status = %status, "Blood request status changed");
        Ok(updated)
    }
}
