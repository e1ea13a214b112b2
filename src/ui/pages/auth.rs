use tracing::info;

use crate::models::Identity;
use crate::ui::forms::{LoginForm, RegisterForm};
use crate::ui::{Failure, Notice, Submission, Submitted};
use crate::AppContext;

pub struct LoginPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> LoginPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    /// Log in; on success the caller moves on to the home page.
    pub async fn submit(&self, form: &LoginForm) -> Submitted<Identity> {
        self.submission.run(self.login(form)).await
    }

    async fn login(&self, form: &LoginForm) -> Result<Identity, Failure> {
        let credentials = form.validate()?;
        self.ctx
            .session
            .login(self.ctx.api.as_ref(), &credentials)
            .await
            .map_err(|e| Failure::from_error(e, "Login failed"))
    }
}

pub struct RegisterPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> RegisterPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    /// Create the account. On success the user is sent to the login page.
    pub async fn submit(&self, form: &RegisterForm) -> Submitted<Notice> {
        self.submission.run(self.register(form)).await
    }

    async fn register(&self, form: &RegisterForm) -> Result<Notice, Failure> {
        let request = form.validate()?;
        self.ctx
            .api
            .register(&request)
            .await
            .map_err(|e| Failure::from_error(e, "Registration failed"))?;
        info!(username = %request.username, role = %request.role, "Account registered");
        Ok(Notice::success("Registration successful! Please login."))
    }
}
