use tracing::info;

use super::{hospital_label, signed_in};
use crate::models::{format_date, BloodRequest, Hospital};
use crate::ui::forms::{parse_status, RequestForm};
use crate::ui::table::{or_dash, Table};
use crate::ui::{Failure, Notice, Submission, Submitted};
use crate::AppContext;

/// Patient page: request units of blood from a hospital.
pub struct RequestPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> RequestPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    pub async fn hospitals(&self) -> Result<Vec<Hospital>, Failure> {
        self.ctx
            .api
            .list_hospitals()
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch hospitals"))
    }

    pub async fn history(&self) -> Result<Vec<BloodRequest>, Failure> {
        let patient = signed_in(self.ctx)?;
        self.ctx
            .api
            .patient_requests(patient.id)
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch blood requests"))
    }

    pub async fn submit(&self, form: &RequestForm) -> Submitted<Notice> {
        self.submission.run(self.request(form)).await
    }

    async fn request(&self, form: &RequestForm) -> Result<Notice, Failure> {
        let patient = signed_in(self.ctx)?;
        let request = form.validate(&patient)?;
        self.ctx
            .api
            .create_request(&request)
            .await
            .map(|_| Notice::success("Blood request submitted successfully"))
            .map_err(|e| Failure::from_error(e, "Failed to submit blood request"))
    }
}

/// Admin queue of blood requests.
pub struct RequestReviewPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> RequestReviewPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<BloodRequest>, Failure> {
        self.ctx
            .api
            .list_requests()
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch blood requests"))
    }

    pub async fn set_status(&self, id: i64, status: &str) -> Submitted<Notice> {
        self.submission.run(self.transition(id, status)).await
    }

    async fn transition(&self, id: i64, status: &str) -> Result<Notice, Failure> {
        let status = parse_status(status)?;
        let updated = self
            .ctx
            .api
            .set_request_status(id, status)
            .await
            .map_err(|e| Failure::from_error(e, "Failed to update blood request"))?;
        info!(request_id = id, status = %updated.status, "Blood request reviewed");
        Ok(Notice::success(format!(
            "Request #{} marked {}",
            updated.id, updated.status
        )))
    }
}

pub fn request_table(requests: &[BloodRequest], hospitals: &[Hospital]) -> String {
    Table::new("No blood requests found.")
        .column("ID", 6, |r: &BloodRequest| r.id.to_string())
        .column("Patient", 7, |r: &BloodRequest| r.patient_id.to_string())
        .column("Hospital", 24, |r: &BloodRequest| hospital_label(hospitals, r.hospital_id))
        .column("Blood Type", 10, |r: &BloodRequest| r.blood_type.to_string())
        .column("Units", 5, |r: &BloodRequest| r.quantity.to_string())
        .column("Date", 10, |r: &BloodRequest| {
            or_dash(r.request_date.as_deref().map(format_date).as_deref())
        })
        .column("Status", 9, |r: &BloodRequest| r.status.to_string())
        .render(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, Role};
    use crate::test_support::{app_context, session, FakeApi};
    use crate::ui::SubmitOutcome;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_request_defaults_to_patient_blood_type() {
        let router = Router::new().route(
            "/blood-requests",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["patientId"], 6);
                assert_eq!(body["bloodType"], "O-");
                assert_eq!(body["status"], "pending");
                let mut created = body.clone();
                created["id"] = json!(4);
                Json(created)
            }),
        );
        let api = FakeApi::start(router).await;
        let mut patient = session(6, Role::Patient);
        patient.identity.blood_type = Some(BloodType::ONegative);
        let ctx = app_context(&api, Some(patient));

        let form = RequestForm {
            hospital_id: Some("2".to_string()),
            blood_type: None,
            quantity: Some("3".to_string()),
        };
        let notice = RequestPage::new(&ctx).submit(&form).await.completed().unwrap().unwrap();
        assert_eq!(notice.message, "Blood request submitted successfully");
    }

    #[tokio::test]
    async fn test_server_failure_notice_keeps_session() {
        let router = Router::new().route(
            "/blood-requests",
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"message": "Hospital closed"}))) }),
        );
        let api = FakeApi::start(router).await;
        let ctx = app_context(&api, Some(session(6, Role::Patient)));

        let form = RequestForm {
            hospital_id: Some("2".to_string()),
            blood_type: Some("AB+".to_string()),
            quantity: Some("1".to_string()),
        };
        match RequestPage::new(&ctx).submit(&form).await {
            SubmitOutcome::Completed(Err(Failure::Notice(notice))) => {
                assert_eq!(notice.message, "Failed to submit blood request");
                assert!(notice.detail.unwrap().contains("Hospital closed"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(ctx.session.is_authenticated());
    }
}
