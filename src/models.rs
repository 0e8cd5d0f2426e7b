use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Interest id → subscribed flag, as the member endpoint expects it.
pub type InterestFlags = BTreeMap<String, bool>;

/// Merge tag → value.
pub type MergeFields = BTreeMap<String, String>;

// ===== Interests =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub list_id: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub list_id: String,
    #[serde(default)]
    pub display_order: i64,
}

// ===== Segments =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub member_count: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSegment<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_segment: Option<Vec<&'a str>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMembers<'a> {
    MembersToAdd(Vec<&'a str>),
    MembersToRemove(Vec<&'a str>),
}

// ===== Members =====

/// Subscription state of a list member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Subscribed,
    Unsubscribed,
    Cleaned,
    Pending,
    Transactional,
}

impl Default for MemberStatus {
    fn default() -> Self {
        MemberStatus::Subscribed
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberStatus::Subscribed => "subscribed",
            MemberStatus::Unsubscribed => "unsubscribed",
            MemberStatus::Cleaned => "cleaned",
            MemberStatus::Pending => "pending",
            MemberStatus::Transactional => "transactional",
        })
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subscribed" => Ok(MemberStatus::Subscribed),
            "unsubscribed" => Ok(MemberStatus::Unsubscribed),
            "cleaned" => Ok(MemberStatus::Cleaned),
            "pending" => Ok(MemberStatus::Pending),
            "transactional" => Ok(MemberStatus::Transactional),
            other => Err(format!("unknown member status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTag {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub email_address: String,
    #[serde(default)]
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub merge_fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub interests: InterestFlags,
    #[serde(default)]
    pub tags: Option<Vec<MemberTag>>,
    #[serde(default)]
    pub last_changed: Option<DateTime<Utc>>,
}

/// Body of `PUT /lists/{list}/members/{hash}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberUpsert {
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    pub status_if_new: MemberStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<InterestFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_fields: Option<MergeFields>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("Subscribed".parse::<MemberStatus>(), Ok(MemberStatus::Subscribed));
        assert_eq!(MemberStatus::Unsubscribed.to_string(), "unsubscribed");
        assert!("archived".parse::<MemberStatus>().is_err());
    }

    #[test]
    fn segment_members_serialize_as_named_lists() {
        let add = serde_json::to_value(SegmentMembers::MembersToAdd(vec!["a@example.com"])).unwrap();
        assert_eq!(add, json!({"members_to_add": ["a@example.com"]}));

        let remove =
            serde_json::to_value(SegmentMembers::MembersToRemove(vec!["a@example.com"])).unwrap();
        assert_eq!(remove, json!({"members_to_remove": ["a@example.com"]}));
    }

    #[test]
    fn member_without_tags_decodes() {
        let member: Member = serde_json::from_value(json!({
            "id": "abc",
            "email_address": "a@example.com",
            "status": "pending",
            "last_changed": "2024-03-01T12:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(member.status, Some(MemberStatus::Pending));
        assert!(member.tags.is_none());
        assert!(member.interests.is_empty());
        assert!(member.last_changed.is_some());
    }

    #[test]
    fn upsert_omits_unset_fields() {
        let payload = MemberUpsert {
            email_address: "a@example.com".into(),
            status: None,
            status_if_new: MemberStatus::Subscribed,
            interests: None,
            merge_fields: None,
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"email_address": "a@example.com", "status_if_new": "subscribed"})
        );
    }
}
