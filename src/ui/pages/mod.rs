//! One page per destination.
//!
//! A page borrows the [`AppContext`](crate::AppContext) and owns a
//! [`Submission`](super::Submission) latch for its form, so a second submit
//! while the first is in flight is ignored.

mod auth;
mod donations;
mod hospitals;
mod inventory;
mod requests;
mod users;

pub use auth::{LoginPage, RegisterPage};
pub use donations::{donation_table, DonationPage, DonationReviewPage};
pub use hospitals::HospitalsPage;
pub use inventory::InventoryPage;
pub use requests::{request_table, RequestPage, RequestReviewPage};
pub use users::UsersPage;

use super::Failure;
use crate::models::{Hospital, Identity};
use crate::AppContext;

/// Identity of the signed-in user, or a redirect to login.
fn signed_in(ctx: &AppContext) -> Result<Identity, Failure> {
    ctx.session
        .current_identity()
        .ok_or_else(Failure::login_required)
}

/// Label for a hospital id, using its name when known.
fn hospital_label(hospitals: &[Hospital], id: i64) -> String {
    hospitals
        .iter()
        .find(|h| h.id == id)
        .map(|h| h.name.clone())
        .unwrap_or_else(|| format!("#{}", id))
}
