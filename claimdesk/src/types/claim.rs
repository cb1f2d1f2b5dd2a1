use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A pending request asserting ownership of a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub r: ClaimRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub venue: Venue,
    pub user: UserRef,
    /// Submission time, Unix seconds.
    pub timestamp: i64,
}

/// Venue embedded in a claim.
///
/// Only the fields the desk reads are typed; everything else (including the
/// owner the update assigns) is kept in `extra` so the whole object can be
/// sent back to the owner-update endpoint unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ownership-confirmation flag: 1 once a claim is accepted, 0 otherwise.
    #[serde(default)]
    pub event_conf_req: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference to the user who filed a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub user_doc_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRef {
    pub fn new(user_doc_id: impl Into<String>) -> Self {
        Self {
            user_doc_id: user_doc_id.into(),
            extra: Map::new(),
        }
    }
}

impl Claim {
    /// Submission time, if the timestamp is in range.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.r.timestamp, 0)
    }

    pub fn venue(&self) -> &Venue {
        &self.r.venue
    }

    pub fn user(&self) -> &UserRef {
        &self.r.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_keeps_unknown_fields() {
        let json = r#"{
            "name": "Blue Room",
            "description": "Jazz club",
            "event_conf_req": 0,
            "owner": "u-17",
            "geo": {"lat": 1.5, "lng": 2.5}
        }"#;
        let venue: Venue = serde_json::from_str(json).unwrap();
        assert_eq!(venue.extra["owner"], "u-17");

        let back = serde_json::to_value(&venue).unwrap();
        assert_eq!(back["geo"]["lat"], 1.5);
        assert_eq!(back["event_conf_req"], 0);
    }

    #[test]
    fn test_venue_flag_defaults_to_zero() {
        let venue: Venue = serde_json::from_str(r#"{"name": "Hall"}"#).unwrap();
        assert_eq!(venue.event_conf_req, 0);
        assert!(venue.description.is_empty());
    }

    #[test]
    fn test_submitted_at() {
        let claim = Claim {
            id: "c1".into(),
            r: ClaimRecord {
                venue: serde_json::from_str(r#"{"name": "Hall"}"#).unwrap(),
                user: UserRef::new("u1"),
                timestamp: 1_700_000_000,
            },
        };
        let at = claim.submitted_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
