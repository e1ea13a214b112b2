use crate::models::Hospital;
use crate::ui::forms::HospitalForm;
use crate::ui::table::Table;
use crate::ui::{Failure, Notice, Submission, Submitted};
use crate::AppContext;

pub struct HospitalsPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> HospitalsPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Hospital>, Failure> {
        self.ctx
            .api
            .list_hospitals()
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch hospitals"))
    }

    pub async fn find(&self, id: i64) -> Result<Hospital, Failure> {
        self.ctx
            .api
            .get_hospital(id)
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch hospital"))
    }

    /// Add a hospital, or update `editing` when set.
    pub async fn save(&self, editing: Option<i64>, form: &HospitalForm) -> Submitted<Notice> {
        self.submission.run(self.persist(editing, form)).await
    }

    async fn persist(&self, editing: Option<i64>, form: &HospitalForm) -> Result<Notice, Failure> {
        let payload = form.validate()?;
        let result = match editing {
            Some(id) => self
                .ctx
                .api
                .update_hospital(id, &payload)
                .await
                .map(|_| "Hospital updated successfully"),
            None => self
                .ctx
                .api
                .create_hospital(&payload)
                .await
                .map(|_| "Hospital added successfully"),
        };
        result
            .map(Notice::success)
            .map_err(|e| Failure::from_error(e, "Operation failed"))
    }

    pub async fn delete(&self, id: i64) -> Submitted<Notice> {
        self.submission
            .run(async {
                self.ctx
                    .api
                    .delete_hospital(id)
                    .await
                    .map(|_| Notice::success("Hospital deleted successfully"))
                    .map_err(|e| Failure::from_error(e, "Failed to delete hospital"))
            })
            .await
    }

    pub fn table(hospitals: &[Hospital]) -> String {
        Table::new("No hospitals found.")
            .column("ID", 6, |h: &Hospital| h.id.to_string())
            .column("Name", 28, |h: &Hospital| h.name.clone())
            .column("Address", 36, |h: &Hospital| h.address.clone())
            .column("Contact", 18, |h: &Hospital| h.contact.clone())
            .render(hospitals)
    }
}
