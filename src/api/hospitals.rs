use tracing::info;

use super::{ApiClient, ClientError};
use crate::models::{Hospital, HospitalPayload};

impl ApiClient {
    pub async fn list_hospitals(&self) -> Result<Vec<Hospital>, ClientError> {
        self.get("/hospitals").await
    }

    pub async fn get_hospital(&self, id: i64) -> Result<Hospital, ClientError> {
        self.get(&format!("/hospitals/{}", id)).await
    }

    pub async fn create_hospital(&self, payload: &HospitalPayload) -> Result<Hospital, ClientError> {
        let hospital: Hospital = self.post("/hospitals", payload).await?;
        info!(hospital_id = hospital.id, name = %hospital.name, "Hospital created");
        Ok(hospital)
    }

    pub async fn update_hospital(
        &self,
        id: i64,
        payload: &HospitalPayload,
    ) -> Result<Hospital, ClientError> {
        let hospital = self.put(&format!("/hospitals/{}", id), payload).await?;
        info!(hospital_id = id, "Hospital updated");
        Ok(hospital)
    }

    pub async fn delete_hospital(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/hospitals/{}", id)).await?;
        info!(hospital_id = id, "Hospital deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{HospitalPayload, Role};
    use crate::test_support::{logged_in_store, FakeApi};
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_hospital_crud_paths() {
        let router = Router::new()
            .route(
                "/hospitals",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({"id": 7, "name": body["name"], "address": body["address"], "contact": body["contact"]}))
                }),
            )
            .route(
                "/hospitals/:id",
                get(|Path(id): Path<i64>| async move {
                    Json(json!({"id": id, "name": "General", "address": "1 Main", "contact": "555"}))
                })
                .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    Json(json!({"id": id, "name": body["name"], "address": body["address"], "contact": body["contact"]}))
                })
                .delete(|| async { StatusCode::NO_CONTENT }),
            );
        let api = FakeApi::start(router).await;
        let client = api.client(logged_in_store("tok", 1, Role::Admin));

        let payload = HospitalPayload {
            name: "St. Mary".to_string(),
            address: "2 Side St".to_string(),
            contact: "555-0100".to_string(),
        };
        let created = client.create_hospital(&payload).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(created.name, "St. Mary");

        let fetched = client.get_hospital(7).await.unwrap();
        assert_eq!(fetched.name, "General");

        let updated = client.update_hospital(7, &payload).await.unwrap();
        assert_eq!(updated.contact, "555-0100");

        client.delete_hospital(7).await.unwrap();

        let methods: Vec<(String, String)> = api
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            methods,
            vec![
                ("POST".to_string(), "/hospitals".to_string()),
                ("GET".to_string(), "/hospitals/7".to_string()),
                ("PUT".to_string(), "/hospitals/7".to_string()),
                ("DELETE".to_string(), "/hospitals/7".to_string()),
            ]
        );
    }
}
