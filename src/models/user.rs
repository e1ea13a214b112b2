//! User, identity and authentication payloads.

use serde::{Deserialize, Serialize};

use super::common::{optional_blood_type, BloodType};

/// Account roles known to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages hospitals, users, inventory and the review queues
    Admin,
    /// Submits blood donations
    Donor,
    /// Submits blood requests
    Patient,
    /// Registered account without a workflow of its own
    User,
}

impl Role {
    /// Roles a visitor may pick when registering. Admin accounts are
    /// provisioned server-side.
    pub const SELF_REGISTRABLE: [Role; 3] = [Role::User, Role::Donor, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Donor => "donor",
            Role::Patient => "patient",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "donor" => Ok(Role::Donor),
            "patient" => Ok(Role::Patient),
            "user" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A user account as returned by `/users` and embedded in login responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "optional_blood_type")]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The authenticated user's profile snapshot, taken at login or rehydration.
/// It is not kept in sync with later server-side edits.
pub type Identity = User;

/// Login form payload for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(alias = "user")]
    pub identity: Identity,
}

/// Registration payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub blood_type: BloodType,
    pub contact: String,
    pub address: String,
    pub role: Role,
}

/// Editable profile fields sent with `PUT /users/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// New password; omitted to keep the current one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<User> for UserUpdate {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role: user.role,
            full_name: user.full_name,
            age: user.age,
            gender: user.gender,
            blood_type: user.blood_type,
            contact: user.contact,
            address: user.address,
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Donor".parse::<Role>().unwrap(), Role::Donor);
        assert_eq!(" PATIENT ".parse::<Role>().unwrap(), Role::Patient);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_decodes_camel_case_and_empty_blood_type() {
        let json = r#"{
            "id": 7,
            "username": "ada",
            "email": "ada@example.com",
            "role": "donor",
            "fullName": "Ada Obi",
            "age": 31,
            "bloodType": ""
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Donor);
        assert_eq!(user.full_name, "Ada Obi");
        assert_eq!(user.blood_type, None);
        assert_eq!(user.contact, None);
    }

    #[test]
    fn test_user_rejects_unknown_role() {
        let json = r#"{"id": 1, "username": "x", "email": "x@y.z", "role": "root"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_login_response_accepts_aliases() {
        let json = r#"{
            "accessToken": "abc",
            "user": {"id": 1, "username": "root", "email": "r@x.io", "role": "admin"}
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "abc");
        assert_eq!(resp.identity.role, Role::Admin);
    }

    #[test]
    fn test_login_response_requires_identity() {
        let json = r#"{"token": "abc"}"#;
        assert!(serde_json::from_str::<LoginResponse>(json).is_err());
    }
}
