use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Bed/wake times for one day. Both halves are optional until filled in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
pub struct SleepTimes {
    #[serde(rename = "Letto")]
    pub bed: Option<NaiveTime>,
    #[serde(rename = "Sveglia")]
    pub wake: Option<NaiveTime>,
}

/// One outing; departure and return are recorded independently so a log can
/// hold an outing that has left but not yet come back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
pub struct Outing {
    #[serde(rename = "Data")]
    pub left_at: Option<DateTime<Utc>>,
    #[serde(rename = "DataRientro")]
    pub returned_at: Option<DateTime<Utc>>,
    #[serde(rename = "Tipologia")]
    pub kind: Option<String>,
}

impl Outing {
    pub fn is_open(&self) -> bool {
        self.left_at.is_some() && self.returned_at.is_none()
    }
}

/// Notable-events text partitioned into the three day segments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
pub struct NotableEvents {
    #[serde(rename = "Mattina")]
    pub morning: Option<String>,
    #[serde(rename = "Pomeriggio")]
    pub afternoon: Option<String>,
    #[serde(rename = "Sera")]
    pub evening: Option<String>,
}

/// One day's care log (backend entity: giornata). Unique per record + date;
/// created and deleted whole, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct DailyLog {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Id_Anagrafica")]
    pub record_id: i64,
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "Sonno")]
    pub sleep: Option<SleepTimes>,
    #[serde(rename = "Uscite", default)]
    pub outings: Vec<Outing>,
    #[serde(rename = "FattiSignificativi")]
    pub notable_events: Option<NotableEvents>,
}

/// Payload for creating a log for one record on one date.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateDailyLog {
    #[serde(rename = "Id_Anagrafica")]
    pub record_id: i64,
    #[serde(rename = "Data")]
    pub date: NaiveDate,
    #[serde(rename = "Sonno")]
    pub sleep: Option<SleepTimes>,
    #[serde(rename = "Uscite", default)]
    pub outings: Vec<Outing>,
    #[serde(rename = "FattiSignificativi")]
    pub notable_events: Option<NotableEvents>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_nested_sections() {
        let log: DailyLog = serde_json::from_value(serde_json::json!({
            "Id": 7,
            "Id_Anagrafica": 3,
            "Data": "2024-01-05",
            "Sonno": { "Letto": "13:00:00", "Sveglia": "14:30:00" },
            "Uscite": [
                { "Data": "2024-01-05T10:00:00Z", "DataRientro": null, "Tipologia": "parco" }
            ],
            "FattiSignificativi": { "Mattina": "colazione", "Pomeriggio": null, "Sera": null }
        }))
        .unwrap();

        assert_eq!(log.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(log.outings[0].is_open());
        assert_eq!(
            log.notable_events.unwrap().morning.as_deref(),
            Some("colazione")
        );
    }

    #[test]
    fn sections_may_be_absent() {
        let log: DailyLog = serde_json::from_value(serde_json::json!({
            "Id": 1,
            "Id_Anagrafica": 1,
            "Data": "2024-02-01",
            "Sonno": null,
            "FattiSignificativi": null
        }))
        .unwrap();
        assert!(log.sleep.is_none());
        assert!(log.outings.is_empty());
    }
}
