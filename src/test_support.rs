//! Fixtures shared by the unit tests: sample identities, a session store
//! that is already logged in, and an in-process fake of the remote API.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::models::{Identity, Role};
use crate::session::{
    MemoryStorage, Session, SessionStorage, SessionStore, StorageError, IDENTITY_KEY, TOKEN_KEY,
};

pub fn identity(id: i64, role: Role) -> Identity {
    Identity {
        id,
        username: format!("{}{}", role, id),
        email: format!("{}{}@example.com", role, id),
        role,
        full_name: format!("Test {}", role),
        age: Some(30),
        gender: Some("other".to_string()),
        blood_type: None,
        contact: None,
        address: None,
    }
}

pub fn session(id: i64, role: Role) -> Session {
    Session {
        token: format!("token-{}", id),
        identity: identity(id, role),
    }
}

/// A store rehydrated from memory, as if a previous run had logged in.
pub fn logged_in_store(token: &str, id: i64, role: Role) -> Arc<SessionStore> {
    logged_in_store_as(token, identity(id, role))
}

pub fn logged_in_store_as(token: &str, identity: Identity) -> Arc<SessionStore> {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set_entries(vec![
            (TOKEN_KEY, serde_json::Value::String(token.to_string())),
            (IDENTITY_KEY, serde_json::to_value(&identity).unwrap()),
        ])
        .unwrap();
    let store = Arc::new(SessionStore::new(storage));
    store.initialize().unwrap();
    store
}

/// Storage that keeps what it is given but refuses to delete it.
#[derive(Default)]
pub struct UndeletableStorage {
    inner: MemoryStorage,
}

impl SessionStorage for UndeletableStorage {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        self.inner.get(key)
    }

    fn set_entries(&self, entries: Vec<(&str, serde_json::Value)>) -> Result<(), StorageError> {
        self.inner.set_entries(entries)
    }

    fn remove_entries(&self, _: &[&str]) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: "session.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

/// A store over `storage`, rehydrated as if a previous run had logged in.
pub fn persisted_store(storage: Arc<dyn SessionStorage>, session: &Session) -> SessionStore {
    storage
        .set_entries(vec![
            (TOKEN_KEY, serde_json::Value::String(session.token.clone())),
            (IDENTITY_KEY, serde_json::to_value(&session.identity).unwrap()),
        ])
        .unwrap();
    let store = SessionStore::new(storage);
    store.initialize().unwrap();
    store
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// A fake API server on an ephemeral local port that records every request.
pub struct FakeApi {
    pub base_url: String,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeApi {
    pub async fn start(router: Router) -> Self {
        let log: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let recorder = log.clone();
        let app = router.layer(middleware::from_fn(move |req: Request, next: Next| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().push(RecordedRequest {
                    method: req.method().to_string(),
                    path: req.uri().path().to_string(),
                    authorization: req
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                });
                let response: Response = next.run(req).await;
                response
            }
        }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            log,
        }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        }
    }

    pub fn client(&self, store: Arc<SessionStore>) -> ApiClient {
        ApiClient::new(&self.config(), store).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().len()
    }
}

/// An application context talking to `api`, optionally already logged in.
pub fn app_context(api: &FakeApi, login: Option<Session>) -> crate::AppContext {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(session) = login {
        storage
            .set_entries(vec![
                (TOKEN_KEY, serde_json::Value::String(session.token)),
                (IDENTITY_KEY, serde_json::to_value(&session.identity).unwrap()),
            ])
            .unwrap();
    }
    let config = crate::config::Config {
        api: api.config(),
        ..Default::default()
    };
    crate::AppContext::with_storage(config, storage).unwrap()
}
