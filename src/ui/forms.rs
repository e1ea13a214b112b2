//! Form inputs as the user typed them, and their validation into request
//! payloads. A form that fails validation never reaches the network.

use std::str::FromStr;

use crate::api::validation::{
    parse_choice, parse_number, validate_age, validate_email, validate_gender,
    validate_password, validate_quantity, validate_required, validate_selected_id,
    validate_stock,
};
use crate::api::ValidationErrors;
use crate::models::{
    BloodType, Credentials, Hospital, HospitalPayload, Identity, NewDonation, NewRequest,
    RegisterRequest, Role, Status, User, UserUpdate,
};

fn text(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a numeric field and run `check` on it, recording any error.
fn number_field(
    errors: &mut ValidationErrors,
    field: &str,
    raw: &Option<String>,
    check: fn(Option<i64>) -> Result<(), String>,
) -> Option<i64> {
    match parse_number(raw.as_deref()) {
        Ok(value) => {
            let result = check(value);
            let valid = result.is_ok();
            errors.check(field, result);
            value.filter(|_| valid)
        }
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

fn choice_field<T>(errors: &mut ValidationErrors, field: &str, raw: &Option<String>) -> Option<T>
where
    T: FromStr<Err = String>,
{
    match parse_choice::<T>(raw.as_deref()) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .check("email", validate_email(self.email.as_deref()))
            .check("password", validate_required(self.password.as_deref()));
        errors.finish()?;

        Ok(Credentials {
            email: text(&self.email),
            password: self.password.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    /// Blank means `user`
    pub role: Option<String>,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .check("username", validate_required(self.username.as_deref()))
            .check("email", validate_email(self.email.as_deref()))
            .check("password", validate_password(self.password.as_deref()))
            .check("full_name", validate_required(self.full_name.as_deref()))
            .check("gender", validate_gender(self.gender.as_deref()))
            .check("contact", validate_required(self.contact.as_deref()))
            .check("address", validate_required(self.address.as_deref()));

        let age = number_field(&mut errors, "age", &self.age, validate_age)
            .and_then(|age| u32::try_from(age).ok());
        let blood_type = choice_field::<BloodType>(&mut errors, "blood_type", &self.blood_type);

        let role = match non_blank(&self.role) {
            None => Role::User,
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) if Role::SELF_REGISTRABLE.contains(&role) => role,
                _ => {
                    errors.add(
                        "role",
                        format!(
                            "Invalid role. Must be one of: {}",
                            Role::SELF_REGISTRABLE
                                .iter()
                                .map(Role::to_string)
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    );
                    Role::User
                }
            },
        };

        match (age, blood_type) {
            (Some(age), Some(blood_type)) if errors.is_empty() => Ok(RegisterRequest {
                username: text(&self.username),
                email: text(&self.email),
                password: self.password.clone().unwrap_or_default(),
                full_name: text(&self.full_name),
                age,
                gender: text(&self.gender).to_lowercase(),
                blood_type,
                contact: text(&self.contact),
                address: text(&self.address),
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HospitalForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
}

impl From<&Hospital> for HospitalForm {
    fn from(hospital: &Hospital) -> Self {
        Self {
            name: Some(hospital.name.clone()),
            address: Some(hospital.address.clone()),
            contact: Some(hospital.contact.clone()),
        }
    }
}

impl HospitalForm {
    /// Overlay the fields that were actually filled in.
    pub fn merge(mut self, edits: HospitalForm) -> Self {
        self.name = edits.name.or(self.name);
        self.address = edits.address.or(self.address);
        self.contact = edits.contact.or(self.contact);
        self
    }

    pub fn validate(&self) -> Result<HospitalPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors
            .check("name", validate_required(self.name.as_deref()))
            .check("address", validate_required(self.address.as_deref()))
            .check("contact", validate_required(self.contact.as_deref()));
        errors.finish()?;

        Ok(HospitalPayload {
            name: text(&self.name),
            address: text(&self.address),
            contact: text(&self.contact),
        })
    }
}

/// Donation form. The blood type is fixed to the donor's own.
#[derive(Debug, Clone, Default)]
pub struct DonationForm {
    pub hospital_id: Option<String>,
    pub quantity: Option<String>,
}

impl DonationForm {
    pub fn validate(&self, donor: &Identity) -> Result<NewDonation, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let hospital_id =
            number_field(&mut errors, "hospital_id", &self.hospital_id, validate_selected_id);
        if donor.blood_type.is_none() {
            errors.add("blood_type", "Required");
        }
        let quantity = number_field(&mut errors, "quantity", &self.quantity, validate_quantity);

        match (hospital_id, donor.blood_type, quantity) {
            (Some(hospital_id), Some(blood_type), Some(quantity)) if errors.is_empty() => {
                Ok(NewDonation {
                    donor_id: donor.id,
                    hospital_id,
                    blood_type,
                    quantity,
                    status: Status::Pending,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Blood request form. The blood type defaults to the patient's own.
#[derive(Debug, Clone, Default)]
pub struct RequestForm {
    pub hospital_id: Option<String>,
    pub blood_type: Option<String>,
    pub quantity: Option<String>,
}

impl RequestForm {
    pub fn validate(&self, patient: &Identity) -> Result<NewRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let hospital_id =
            number_field(&mut errors, "hospital_id", &self.hospital_id, validate_selected_id);
        let blood_type = match non_blank(&self.blood_type) {
            Some(raw) => choice_field::<BloodType>(&mut errors, "blood_type", &Some(raw)),
            None => {
                if patient.blood_type.is_none() {
                    errors.add("blood_type", "Required");
                }
                patient.blood_type
            }
        };
        let quantity = number_field(&mut errors, "quantity", &self.quantity, validate_quantity);

        match (hospital_id, blood_type, quantity) {
            (Some(hospital_id), Some(blood_type), Some(quantity)) if errors.is_empty() => {
                Ok(NewRequest {
                    patient_id: patient.id,
                    hospital_id,
                    blood_type,
                    quantity,
                    status: Status::Pending,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Profile edits made by an administrator. Blank fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

impl ProfileForm {
    pub fn is_empty(&self) -> bool {
        [
            &self.username,
            &self.email,
            &self.role,
            &self.full_name,
            &self.age,
            &self.gender,
            &self.blood_type,
            &self.contact,
            &self.address,
            &self.password,
        ]
        .iter()
        .all(|v| non_blank(v).is_none())
    }

    /// Apply the edits on top of the user's current profile.
    pub fn apply(&self, user: User) -> Result<UserUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut update = UserUpdate::from(user);

        if let Some(username) = non_blank(&self.username) {
            update.username = username;
        }
        if let Some(email) = non_blank(&self.email) {
            errors.check("email", validate_email(Some(email.as_str())));
            update.email = email;
        }
        if non_blank(&self.role).is_some() {
            if let Some(role) = choice_field::<Role>(&mut errors, "role", &self.role) {
                update.role = role;
            }
        }
        if let Some(full_name) = non_blank(&self.full_name) {
            update.full_name = full_name;
        }
        if non_blank(&self.age).is_some() {
            update.age = number_field(&mut errors, "age", &self.age, validate_age)
                .and_then(|age| u32::try_from(age).ok())
                .or(update.age);
        }
        if let Some(gender) = non_blank(&self.gender) {
            errors.check("gender", validate_gender(Some(gender.as_str())));
            update.gender = Some(gender.to_lowercase());
        }
        if non_blank(&self.blood_type).is_some() {
            if let Some(blood_type) =
                choice_field::<BloodType>(&mut errors, "blood_type", &self.blood_type)
            {
                update.blood_type = Some(blood_type);
            }
        }
        if let Some(contact) = non_blank(&self.contact) {
            update.contact = Some(contact);
        }
        if let Some(address) = non_blank(&self.address) {
            update.address = Some(address);
        }
        if let Some(password) = non_blank(&self.password) {
            errors.check("password", validate_password(Some(password.as_str())));
            update.password = Some(password);
        }

        errors.finish()?;
        Ok(update)
    }
}

/// New stock level for an inventory record
#[derive(Debug, Clone, Default)]
pub struct StockForm {
    pub quantity: Option<String>,
}

impl StockForm {
    pub fn validate(&self) -> Result<i64, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match number_field(&mut errors, "quantity", &self.quantity, validate_stock) {
            Some(quantity) if errors.is_empty() => Ok(quantity),
            _ => Err(errors),
        }
    }
}

/// Status transition chosen on a review page
pub fn parse_status(raw: &str) -> Result<Status, ValidationErrors> {
    parse_choice::<Status>(Some(raw)).map_err(|message| {
        let mut errors = ValidationErrors::new();
        errors.add("status", message);
        errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::identity;

    fn some(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: some("dana"),
            email: some("dana@example.com"),
            password: some("secret1"),
            full_name: some("Dana Donor"),
            age: some("30"),
            gender: some("Female"),
            blood_type: some("O+"),
            contact: some("555-0101"),
            address: some("1 Main St"),
            role: None,
        }
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(&["Required".to_string()][..]));
        assert_eq!(errors.get("password"), Some(&["Required".to_string()][..]));

        let creds = LoginForm {
            email: some(" admin@bank.org "),
            password: some("pw"),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.email, "admin@bank.org");
    }

    #[test]
    fn test_register_form_defaults_role_to_user() {
        let request = register_form().validate().unwrap();
        assert_eq!(request.role, Role::User);
        assert_eq!(request.age, 30);
        assert_eq!(request.gender, "female");
        assert_eq!(request.blood_type, BloodType::OPositive);
    }

    #[test]
    fn test_register_form_reports_every_bad_field() {
        let form = RegisterForm {
            email: some("nope"),
            password: some("123"),
            age: some("17"),
            gender: some("robot"),
            blood_type: some("Q+"),
            ..register_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email").unwrap()[0], "Invalid email");
        assert_eq!(
            errors.get("password").unwrap()[0],
            "Password must be at least 6 characters"
        );
        assert_eq!(errors.get("age").unwrap()[0], "Must be at least 18 years old");
        assert!(errors.get("gender").is_some());
        assert!(errors.get("blood_type").is_some());
        assert!(errors.get("username").is_none());
    }

    #[test]
    fn test_register_form_rejects_admin_role() {
        let form = RegisterForm {
            role: some("admin"),
            ..register_form()
        };
        assert!(form.validate().unwrap_err().get("role").is_some());

        let form = RegisterForm {
            role: some("patient"),
            ..register_form()
        };
        assert_eq!(form.validate().unwrap().role, Role::Patient);
    }

    #[test]
    fn test_hospital_form_merge_and_required() {
        let hospital = Hospital {
            id: 1,
            name: "General".to_string(),
            address: "1 Main".to_string(),
            contact: "555".to_string(),
        };
        let payload = HospitalForm::from(&hospital)
            .merge(HospitalForm {
                contact: some("555-0199"),
                ..HospitalForm::default()
            })
            .validate()
            .unwrap();
        assert_eq!(payload.name, "General");
        assert_eq!(payload.contact, "555-0199");

        let errors = HospitalForm {
            name: some("  "),
            ..HospitalForm::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_donation_form_zero_quantity() {
        let mut donor = identity(3, Role::Donor);
        donor.blood_type = Some(BloodType::APositive);
        let form = DonationForm {
            hospital_id: some("2"),
            quantity: some("0"),
        };
        let errors = form.validate(&donor).unwrap_err();
        assert_eq!(errors.get("quantity"), Some(&["Must be at least 1 unit".to_string()][..]));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_donation_form_uses_donor_identity() {
        let mut donor = identity(3, Role::Donor);
        donor.blood_type = Some(BloodType::BNegative);
        let donation = DonationForm {
            hospital_id: some("2"),
            quantity: some("2"),
        }
        .validate(&donor)
        .unwrap();
        assert_eq!(donation.donor_id, 3);
        assert_eq!(donation.blood_type, BloodType::BNegative);
        assert_eq!(donation.status, Status::Pending);
    }

    #[test]
    fn test_donation_form_requires_donor_blood_type() {
        let donor = identity(3, Role::Donor);
        let errors = DonationForm {
            hospital_id: some("2"),
            quantity: some("1"),
        }
        .validate(&donor)
        .unwrap_err();
        assert_eq!(errors.get("blood_type"), Some(&["Required".to_string()][..]));
    }

    #[test]
    fn test_request_form_blood_type_override() {
        let mut patient = identity(6, Role::Patient);
        patient.blood_type = Some(BloodType::OPositive);

        let request = RequestForm {
            hospital_id: some("1"),
            blood_type: None,
            quantity: some("3"),
        }
        .validate(&patient)
        .unwrap();
        assert_eq!(request.blood_type, BloodType::OPositive);
        assert_eq!(request.patient_id, 6);

        let request = RequestForm {
            hospital_id: some("1"),
            blood_type: some("ab-"),
            quantity: some("3"),
        }
        .validate(&patient)
        .unwrap();
        assert_eq!(request.blood_type, BloodType::AbNegative);
    }

    #[test]
    fn test_request_form_non_numeric_hospital() {
        let patient = identity(6, Role::Patient);
        let errors = RequestForm {
            hospital_id: some("general"),
            blood_type: some("O-"),
            quantity: some("1"),
        }
        .validate(&patient)
        .unwrap_err();
        assert_eq!(errors.get("hospital_id"), Some(&["Must be a number".to_string()][..]));
    }

    #[test]
    fn test_profile_form_applies_only_filled_fields() {
        let user = identity(4, Role::Patient);
        let update = ProfileForm {
            role: some("donor"),
            contact: some("555-0123"),
            ..ProfileForm::default()
        }
        .apply(user.clone())
        .unwrap();
        assert_eq!(update.role, Role::Donor);
        assert_eq!(update.contact.as_deref(), Some("555-0123"));
        assert_eq!(update.username, user.username);
        assert_eq!(update.email, user.email);

        let errors = ProfileForm {
            age: some("12"),
            ..ProfileForm::default()
        }
        .apply(user)
        .unwrap_err();
        assert!(errors.get("age").is_some());
        assert!(ProfileForm::default().is_empty());
    }

    #[test]
    fn test_profile_form_password_is_optional_but_checked() {
        let user = identity(4, Role::Donor);
        let update = ProfileForm {
            full_name: some("Dee Donor"),
            ..ProfileForm::default()
        }
        .apply(user.clone())
        .unwrap();
        assert!(update.password.is_none());

        let errors = ProfileForm {
            password: some("abc"),
            ..ProfileForm::default()
        }
        .apply(user)
        .unwrap_err();
        assert_eq!(
            errors.get("password").unwrap()[0],
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_stock_form_allows_zero_but_not_negative() {
        assert_eq!(StockForm { quantity: some("0") }.validate().unwrap(), 0);
        assert!(StockForm { quantity: some("-1") }.validate().is_err());
        assert!(StockForm { quantity: None }.validate().is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("approved").unwrap(), Status::Approved);
        assert!(parse_status("lost").unwrap_err().get("status").is_some());
    }
}
