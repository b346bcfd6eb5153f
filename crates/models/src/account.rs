use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validate::{require, validate_email, ValidationError};

/// The login account linked to a record. Provisioned server-side; this layer
/// only reads and updates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct Account {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Id_Anagrafica")]
    pub record_id: i64,
    #[serde(rename = "Email")]
    pub email: String,
}

/// In-place update for `PUT /account`; the password is only sent when the
/// user chose a new one.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateAccount {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateAccount {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Email", &self.email)?;
        validate_email(&self.email)
    }
}
