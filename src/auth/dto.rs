use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::repo::Chef;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref COUNTRY_RE: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();
    static ref PHONE_PREFIX_RE: Regex = Regex::new(r"^\+\d{1,5}$").unwrap();
    static ref PHONE_NUMBER_RE: Regex = Regex::new(r"^\d{5,20}$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Request body for chef registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 60))]
    pub first_name: String,
    #[validate(length(min = 1, max = 60))]
    pub last_name: String,
    #[validate(regex = "COUNTRY_RE")]
    pub country_code: String,
    #[validate(regex = "PHONE_PREFIX_RE")]
    pub phone_prefix: String,
    #[validate(regex = "PHONE_NUMBER_RE")]
    pub phone_number: String,
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for the password change endpoint.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// Public part of the chef returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicChef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_prefix: String,
    pub phone_number: String,
    pub email: String,
}

impl From<&Chef> for PublicChef {
    fn from(chef: &Chef) -> Self {
        Self {
            id: chef.id,
            first_name: chef.first_name.clone(),
            last_name: chef.last_name.clone(),
            country_code: chef.country_code.clone(),
            phone_prefix: chef.phone_prefix.clone(),
            phone_number: chef.phone_number.clone(),
            email: chef.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        serde_json::from_value(serde_json::json!({
            "firstName": "Anna",
            "lastName": "Bianchi",
            "countryCode": "IT",
            "phonePrefix": "+39",
            "phoneNumber": "3331234567",
            "email": "a@b.com",
            "password": "supersecret",
        }))
        .unwrap()
    }

    #[test]
    fn accepts_a_valid_registration() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn rejects_bad_phone_prefix_and_number() {
        let mut req = valid_register();
        req.phone_prefix = "39".into();
        assert!(req.validate().is_err());

        let mut req = valid_register();
        req.phone_prefix = "+123456".into();
        assert!(req.validate().is_err());

        let mut req = valid_register();
        req.phone_number = "1234".into();
        assert!(req.validate().is_err());

        let mut req = valid_register();
        req.phone_number = "33312345a7".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_lowercase_country_code_and_short_password() {
        let mut req = valid_register();
        req.country_code = "it".into();
        assert!(req.validate().is_err());

        let mut req = valid_register();
        req.password = "short".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("chef.anna@cucina.example.it"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a @b.com"));
        assert!(!is_valid_email("a@b"));
    }
}
