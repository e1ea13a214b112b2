use tracing::info;

use super::{ApiClient, ClientError};
use crate::models::{User, UserUpdate};

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/users").await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ClientError> {
        self.get(&format!("/users/{}", id)).await
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User, ClientError> {
        let user = self.put(&format!("/users/{}", id), update).await?;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/users/{}", id)).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Role, UserUpdate};
    use crate::test_support::{logged_in_store, FakeApi};
    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_update_user_round_trips_profile() {
        let router = Router::new().route(
            "/users/:id",
            get(|Path(id): Path<i64>| async move {
                Json(json!({"id": id, "username": "pat", "email": "pat@example.com", "role": "patient"}))
            })
            .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                assert_eq!(body["role"], "donor");
                assert_eq!(body["username"], "pat");
                assert!(body.get("age").is_none());
                Json(json!({"id": id, "username": "pat", "email": "pat@example.com", "role": "donor"}))
            }),
        );
        let api = FakeApi::start(router).await;
        let client = api.client(logged_in_store("tok", 1, Role::Admin));

        let user = client.get_user(4).await.unwrap();
        assert_eq!(user.role, Role::Patient);

        let mut update = UserUpdate::from(user);
        update.role = Role::Donor;
        let user = client.update_user(4, &update).await.unwrap();
        assert_eq!(user.role, Role::Donor);
    }
}
