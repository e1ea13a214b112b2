//! View layer: pages, forms, tables and the navigation bar.
//!
//! Pages never surface a raw [`ClientError`]. Each failure is turned into a
//! [`Failure`] at the call site: field messages, a transient notice, or a
//! redirect when the session is gone.

pub mod forms;
pub mod navbar;
pub mod pages;
pub mod table;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::api::{ClientError, ValidationErrors};
use crate::guard::{self, AccessDecision, Destination};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message, the equivalent of a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Underlying cause, when there is one worth showing
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "[OK]",
            NoticeLevel::Error => "[ERROR]",
        };
        write!(f, "{} {}", tag, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// How a failed page action is presented
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Field-level messages; nothing was sent
    Invalid(ValidationErrors),
    Notice(Notice),
    /// The session ended while acting; show the notice on the target page
    Redirect(Destination, Notice),
}

impl Failure {
    /// Classify an error. `context` is the page's message for this action,
    /// for example "Failed to fetch hospitals".
    pub fn from_error(err: ClientError, context: &str) -> Self {
        match err {
            ClientError::Validation(errors) => Failure::Invalid(errors),
            ClientError::SessionExpired => {
                info!("Session expired, redirecting to login");
                Failure::Redirect(
                    Destination::Login,
                    Notice::error("Your session has expired. Please log in again."),
                )
            }
            ClientError::Authentication(message) => Failure::Notice(Notice::error(message)),
            other => {
                warn!(error = %other, "{}", context);
                Failure::Notice(Notice::error(context).with_detail(other.to_string()))
            }
        }
    }

    /// The session was missing when the page needed one.
    pub fn login_required() -> Self {
        Failure::Redirect(Destination::Login, Notice::error("Please log in to continue."))
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        Failure::Invalid(errors)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Invalid(errors) => {
                writeln!(f, "[ERROR] Please fix the following:")?;
                for (field, messages) in errors.iter() {
                    writeln!(f, "  {}: {}", field, messages.join(", "))?;
                }
                Ok(())
            }
            Failure::Notice(notice) => write!(f, "{}", notice),
            Failure::Redirect(destination, notice) => {
                write!(f, "{} -> {}", notice, destination.path())
            }
        }
    }
}

/// Result of submitting a form through a [`Submission`] latch
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    Completed(T),
    /// Another submission from the same page was still in flight
    Ignored,
}

impl<T> SubmitOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SubmitOutcome::Completed(value) => Some(value),
            SubmitOutcome::Ignored => None,
        }
    }
}

pub type Submitted<T> = SubmitOutcome<Result<T, Failure>>;

/// At most one in-flight submission per page.
#[derive(Debug, Default)]
pub struct Submission {
    in_flight: AtomicBool,
}

/// Held while a submission runs; releases the latch on drop.
#[derive(Debug)]
pub struct SubmissionTicket<'a> {
    latch: &'a Submission,
}

impl Drop for SubmissionTicket<'_> {
    fn drop(&mut self) {
        self.latch.in_flight.store(false, Ordering::Release);
    }
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn begin(&self) -> Option<SubmissionTicket<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionTicket { latch: self })
    }

    /// Run `action` unless another submission is in flight. The future is
    /// not polled at all when ignored, so no request goes out.
    pub async fn run<F, T>(&self, action: F) -> SubmitOutcome<T>
    where
        F: Future<Output = T>,
    {
        let Some(_ticket) = self.begin() else {
            debug!("Submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        };
        SubmitOutcome::Completed(action.await)
    }
}

/// Resolve where a navigation to `requested` actually lands.
pub fn navigate(session: &SessionStore, requested: Destination) -> Destination {
    let current = session.current();
    let decision = guard::check(current.as_ref(), requested);
    let target = decision.target(requested);
    match decision {
        AccessDecision::Allow => debug!(destination = %requested, "Navigation allowed"),
        AccessDecision::RedirectToLogin => {
            info!(destination = %requested, "Login required, redirecting")
        }
        AccessDecision::RedirectToHome => {
            debug!(destination = %requested, role = ?current.map(|s| s.role()), "Not permitted, redirecting home")
        }
    }
    target
}

/// End the session and report the outcome.
pub fn logout(session: &SessionStore) -> Result<Notice, Failure> {
    session
        .logout()
        .map(|()| Notice::success("Logged out."))
        .map_err(|e| Failure::from_error(e.into(), "Failed to clear the saved session"))
}
