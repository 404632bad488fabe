use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use tower_api_client::{Request, RequestData};

const NAME_COLUMN: &str = "שם_ישוב";
const ENGLISH_NAME_COLUMN: &str = "שם_ישוב_לועזי";
const DISTRICT_COLUMN: &str = "שם_נפה";
const COUNCIL_COLUMN: &str = "שם_מועצה";

// Common

/// One locality from the government dataset, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub id: Option<i64>,
    pub name: String,
    pub english_name: String,
    pub district: String,
    pub council: String,
}

impl CityRecord {
    /// Normalizes a raw dataset record. Returns `None` when the record has no
    /// non-blank name; missing secondary columns become empty strings.
    pub fn from_value(record: &Value) -> Option<Self> {
        let text = |column: &str| {
            record
                .get(column)
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let name = text(NAME_COLUMN);
        if name.is_empty() {
            return None;
        }

        Some(Self {
            id: record.get("_id").and_then(Value::as_i64),
            name,
            english_name: text(ENGLISH_NAME_COLUMN),
            district: text(DISTRICT_COLUMN),
            council: text(COUNCIL_COLUMN),
        })
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct DatastoreSearch {
    resource_id: String,
}

impl DatastoreSearch {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
        }
    }
}

impl Request for DatastoreSearch {
    type Data = Self;
    type Response = DatastoreResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/datastore_search".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Query(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreResponse {
    pub success: bool,
    #[serde(default)]
    pub result: DatastoreResult,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreResult {
    /// Kept raw so a malformed record drops out alone instead of failing the page.
    #[serde(default)]
    pub records: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_is_trimmed() {
        let raw = json!({
            "_id": 7,
            "שם_ישוב": " תל אביב - יפו ",
            "שם_ישוב_לועזי": "TEL AVIV - YAFO ",
            "שם_נפה": "תל אביב ",
            "שם_מועצה": "",
        });
        let city = CityRecord::from_value(&raw).unwrap();
        assert_eq!(city.id, Some(7));
        assert_eq!(city.name, "תל אביב - יפו");
        assert_eq!(city.english_name, "TEL AVIV - YAFO");
        assert_eq!(city.district, "תל אביב");
        assert_eq!(city.council, "");
    }

    #[test]
    fn test_blank_or_missing_name_is_dropped() {
        assert!(CityRecord::from_value(&json!({"_id": 1, "שם_ישוב": "   "})).is_none());
        assert!(CityRecord::from_value(&json!({"_id": 2})).is_none());
        assert!(CityRecord::from_value(&json!({"שם_ישוב": 42})).is_none());
        assert!(CityRecord::from_value(&json!("not an object")).is_none());
    }

    #[test]
    fn test_missing_secondary_columns_default_to_empty() {
        let city = CityRecord::from_value(&json!({"שם_ישוב": "חיפה"})).unwrap();
        assert_eq!(city.id, None);
        assert_eq!(city.district, "");
    }

    #[test]
    fn test_response_without_result_parses() {
        let response: DatastoreResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.result.records.is_empty());
    }
}
