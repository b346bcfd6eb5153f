use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A file attached to one record. The binary content stays server-side and
/// is fetched through the download endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct Document {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Id_Anagrafica")]
    pub record_id: i64,
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Creation")]
    pub created_at: DateTime<Utc>,
}
