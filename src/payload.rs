// The verification payload encoded into the QR symbol.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String, // RFC 3339, UTC, millisecond precision
    pub verified: bool,
}

impl SignatureInfo {
    pub fn new(name: &str, email: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            time_stamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            verified: true,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_wire_field_names() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let info = SignatureInfo::new("  Ada Lovelace ", " ada@example.com", now);
        let v: serde_json::Value = serde_json::from_str(&info.to_json().unwrap()).unwrap();
        assert_eq!(v["name"], "Ada Lovelace");
        assert_eq!(v["email"], "ada@example.com");
        assert_eq!(v["timeStamp"], "2025-03-04T05:06:07.000Z");
        assert_eq!(v["verified"], true);
        assert_eq!(v["id"], info.id.to_string());
    }

    #[test]
    fn every_payload_gets_a_fresh_id() {
        let now = Utc::now();
        assert_ne!(SignatureInfo::new("a", "b", now).id, SignatureInfo::new("a", "b", now).id);
    }
}
