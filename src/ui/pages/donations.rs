use tracing::info;

use super::{hospital_label, signed_in};
use crate::models::{format_date, BloodDonation, Hospital};
use crate::ui::forms::{parse_status, DonationForm};
use crate::ui::table::{or_dash, Table};
use crate::ui::{Failure, Notice, Submission, Submitted};
use crate::AppContext;

/// Donor page: pick a hospital and offer units of the donor's blood type.
pub struct DonationPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> DonationPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    /// Hospitals the donor can choose from
    pub async fn hospitals(&self) -> Result<Vec<Hospital>, Failure> {
        self.ctx
            .api
            .list_hospitals()
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch hospitals"))
    }

    /// The signed-in donor's past donations
    pub async fn history(&self) -> Result<Vec<BloodDonation>, Failure> {
        let donor = signed_in(self.ctx)?;
        self.ctx
            .api
            .donor_donations(donor.id)
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch donations"))
    }

    pub async fn submit(&self, form: &DonationForm) -> Submitted<Notice> {
        self.submission.run(self.donate(form)).await
    }

    async fn donate(&self, form: &DonationForm) -> Result<Notice, Failure> {
        let donor = signed_in(self.ctx)?;
        let donation = form.validate(&donor)?;
        self.ctx
            .api
            .create_donation(&donation)
            .await
            .map(|_| Notice::success("Donation request submitted successfully"))
            .map_err(|e| Failure::from_error(e, "Failed to submit donation request"))
    }
}

/// Admin queue of submitted donations.
pub struct DonationReviewPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> DonationReviewPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<BloodDonation>, Failure> {
        self.ctx
            .api
            .list_donations()
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch donations"))
    }

    pub async fn set_status(&self, id: i64, status: &str) -> Submitted<Notice> {
        self.submission.run(self.transition(id, status)).await
    }

    async fn transition(&self, id: i64, status: &str) -> Result<Notice, Failure> {
        let status = parse_status(status)?;
        let updated = self
            .ctx
            .api
            .set_donation_status(id, status)
            .await
            .map_err(|e| Failure::from_error(e, "Failed to update donation"))?;
        info!(donation_id = id, status = %updated.status, "Donation reviewed");
        Ok(Notice::success(format!(
            "Donation #{} marked {}",
            updated.id, updated.status
        )))
    }
}

pub fn donation_table(donations: &[BloodDonation], hospitals: &[Hospital]) -> String {
    Table::new("No donations found.")
        .column("ID", 6, |d: &BloodDonation| d.id.to_string())
        .column("Donor", 6, |d: &BloodDonation| d.donor_id.to_string())
        .column("Hospital", 24, |d: &BloodDonation| hospital_label(hospitals, d.hospital_id))
        .column("Blood Type", 10, |d: &BloodDonation| d.blood_type.to_string())
        .column("Units", 5, |d: &BloodDonation| d.quantity.to_string())
        .column("Date", 10, |d: &BloodDonation| {
            or_dash(d.donation_date.as_deref().map(format_date).as_deref())
        })
        .column("Status", 9, |d: &BloodDonation| d.status.to_string())
        .render(donations)
}
