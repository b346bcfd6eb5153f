use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::document::Document;
use crate::search::Searchable;
use crate::validate::{require, ValidationError};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sex {
    #[default]
    None,
    Male,
    Female,
}

/// A person's profile (backend entity: anagrafica).
///
/// `documents` is populated only by the detail endpoint; list responses omit
/// it and serde falls back to an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct Record {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Nome")]
    pub first_name: String,
    #[serde(rename = "Cognome")]
    pub last_name: String,
    #[serde(rename = "DataNascita")]
    pub birth_date: NaiveDate,
    #[serde(rename = "CF")]
    pub fiscal_code: String,
    #[serde(rename = "Sesso")]
    pub sex: Sex,
    #[serde(rename = "Residenza")]
    pub residence: String,
    #[serde(rename = "Ingresso")]
    pub admission_date: Option<NaiveDate>,
    #[serde(rename = "IsArchiviato")]
    pub is_archived: bool,
    #[serde(rename = "Creation")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "Timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "IsEducatore")]
    pub is_staff: bool,
    #[serde(rename = "Documenti", default)]
    pub documents: Vec<Document>,
}

/// Payload for creating a record via the detail form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateRecord {
    #[serde(rename = "Nome")]
    pub first_name: String,
    #[serde(rename = "Cognome")]
    pub last_name: String,
    #[serde(rename = "DataNascita")]
    pub birth_date: NaiveDate,
    #[serde(rename = "CF")]
    pub fiscal_code: String,
    #[serde(rename = "Sesso")]
    pub sex: Sex,
    #[serde(rename = "Residenza")]
    pub residence: String,
    #[serde(rename = "Ingresso")]
    pub admission_date: Option<NaiveDate>,
    #[serde(rename = "IsEducatore")]
    pub is_staff: bool,
}

impl CreateRecord {
    /// Required-field check performed before the payload leaves the client.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Nome", &self.first_name)?;
        require("Cognome", &self.last_name)?;
        require("CF", &self.fiscal_code)?;
        Ok(())
    }
}

/// Full-replacement payload for `PUT /anagrafica/{id}`.
pub type UpdateRecord = CreateRecord;

impl Record {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

impl Searchable for Record {
    fn search_haystack(&self) -> Vec<&str> {
        vec![&self.first_name, &self.last_name, &self.fiscal_code]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "Id": 2,
            "Nome": "Mario",
            "Cognome": "Rossi",
            "DataNascita": "2009-01-01",
            "CF": "CFCFCF00C00F000C",
            "Sesso": "male",
            "Residenza": "Busto Arsizio",
            "Ingresso": null,
            "IsArchiviato": false,
            "Creation": "2024-01-01T08:00:00Z",
            "Timestamp": "2024-01-02T08:00:00Z",
            "IsEducatore": false
        })
    }

    #[test]
    fn deserializes_wire_field_names() {
        let record: Record = serde_json::from_value(record_json()).unwrap();
        assert_eq!(record.id, 2);
        assert_eq!(record.last_name, "Rossi");
        assert_eq!(record.sex, Sex::Male);
        assert!(record.documents.is_empty());
    }

    #[test]
    fn serializes_back_to_wire_field_names() {
        let record: Record = serde_json::from_value(record_json()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Cognome"], "Rossi");
        assert_eq!(value["IsArchiviato"], false);
        assert_eq!(value["Documenti"], serde_json::json!([]));
    }

    #[test]
    fn create_payload_rejects_missing_required_fields() {
        let mut payload: CreateRecord =
            serde_json::from_value(record_json()).expect("create fields are a subset");
        payload.last_name = "  ".to_string();
        assert!(matches!(
            payload.validate(),
            Err(ValidationError::MissingField("Cognome"))
        ));
    }
}
