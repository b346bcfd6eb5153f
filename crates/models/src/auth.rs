use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validate::{require, validate_email, ValidationError};

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LoginRequest {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Email", &self.email)?;
        require("Password", &self.password)?;
        validate_email(&self.email)
    }
}

/// Token bundle returned on successful login. Field names are the one place
/// the backend uses camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "idAccount")]
    pub account_id: i64,
    #[serde(rename = "idAnagrafica")]
    pub record_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_camel_case() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "accessToken": "jwt",
            "idAccount": 4,
            "idAnagrafica": 9
        }))
        .unwrap();
        assert_eq!(response.account_id, 4);
        assert_eq!(response.record_id, 9);
    }

    #[test]
    fn login_request_requires_both_fields() {
        let request = LoginRequest {
            email: "tutor@casagialla.it".to_string(),
            password: String::new(),
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::MissingField("Password"))
        ));
    }
}
