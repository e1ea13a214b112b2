use crate::models::User;
use crate::ui::forms::ProfileForm;
use crate::ui::table::{or_dash, Table};
use crate::ui::{Failure, Notice, Submission, Submitted};
use crate::AppContext;

pub struct UsersPage<'a> {
    ctx: &'a AppContext,
    submission: Submission,
}

impl<'a> UsersPage<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            submission: Submission::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<User>, Failure> {
        self.ctx
            .api
            .list_users()
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch users"))
    }

    pub async fn find(&self, id: i64) -> Result<User, Failure> {
        self.ctx
            .api
            .get_user(id)
            .await
            .map_err(|e| Failure::from_error(e, "Failed to fetch user"))
    }

    /// Apply profile edits on top of the user's current record.
    pub async fn update(&self, id: i64, form: &ProfileForm) -> Submitted<Notice> {
        self.submission.run(self.apply(id, form)).await
    }

    async fn apply(&self, id: i64, form: &ProfileForm) -> Result<Notice, Failure> {
        let current = self.find(id).await?;
        let update = form.apply(current)?;
        self.ctx
            .api
            .update_user(id, &update)
            .await
            .map(|_| Notice::success("User updated successfully"))
            .map_err(|e| Failure::from_error(e, "Failed to update user"))
    }

    pub async fn delete(&self, id: i64) -> Submitted<Notice> {
        self.submission
            .run(async {
                self.ctx
                    .api
                    .delete_user(id)
                    .await
                    .map(|_| Notice::success("User deleted successfully"))
                    .map_err(|e| Failure::from_error(e, "Failed to delete user"))
            })
            .await
    }

    pub fn table(users: &[User]) -> String {
        Table::new("No users found.")
            .column("ID", 6, |u: &User| u.id.to_string())
            .column("Username", 16, |u: &User| u.username.clone())
            .column("Email", 28, |u: &User| u.email.clone())
            .column("Full Name", 22, |u: &User| or_dash(Some(u.full_name.as_str())))
            .column("Role", 8, |u: &User| u.role.to_string())
            .column("Blood Type", 10, |u: &User| {
                u.blood_type.map_or_else(|| "-".to_string(), |b| b.to_string())
            })
            .render(users)
    }

    pub fn details(user: &User) -> String {
        let age = user.age.map(|a| a.to_string());
        let blood_type = user.blood_type.map(|b| b.to_string());
        [
            ("ID", user.id.to_string()),
            ("Username", user.username.clone()),
            ("Email", user.email.clone()),
            ("Full Name", or_dash(Some(user.full_name.as_str()))),
            ("Role", user.role.to_string()),
            ("Age", or_dash(age.as_deref())),
            ("Gender", or_dash(user.gender.as_deref())),
            ("Blood Type", or_dash(blood_type.as_deref())),
            ("Contact", or_dash(user.contact.as_deref())),
            ("Address", or_dash(user.address.as_deref())),
        ]
        .iter()
        .map(|(label, value)| format!("{:<12}{}\n", format!("{}:", label), value))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, Role};
    use crate::test_support::{app_context, identity, session, FakeApi};
    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_update_merges_edits_into_current_profile() {
        let router = Router::new().route(
            "/users/:id",
            get(|Path(id): Path<i64>| async move {
                Json(json!({"id": id, "username": "pat", "email": "pat@example.com",
                            "role": "patient", "fullName": "Pat P", "age": 40}))
            })
            .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                assert_eq!(body["fullName"], "Pat P");
                assert_eq!(body["age"], 40);
                assert_eq!(body["bloodType"], "B+");
                let mut user = body.clone();
                user["id"] = json!(id);
                Json(user)
            }),
        );
        let api = FakeApi::start(router).await;
        let ctx = app_context(&api, Some(session(1, Role::Admin)));

        let form = ProfileForm {
            blood_type: Some("B+".to_string()),
            ..ProfileForm::default()
        };
        let notice = UsersPage::new(&ctx)
            .update(5, &form)
            .await
            .completed()
            .unwrap()
            .unwrap();
        assert_eq!(notice.message, "User updated successfully");
        assert_eq!(api.request_count(), 2);
    }

    #[test]
    fn test_table_and_details() {
        let mut user = identity(5, Role::Donor);
        user.blood_type = Some(BloodType::ONegative);

        let table = UsersPage::table(&[user.clone()]);
        assert!(table.lines().nth(2).unwrap().contains("O-"));

        let details = UsersPage::details(&user);
        assert!(details.contains("Role:       donor"));
        assert!(details.contains("Contact:    -"));
        assert_eq!(UsersPage::table(&[]), "No users found.\n");
    }
}
