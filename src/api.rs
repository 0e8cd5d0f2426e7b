//! Typed wrappers over the list endpoints the reconciliation layer uses.

use crate::error::{AudienceError, AudienceResult};
use crate::models::{
    CreateSegment, Interest, InterestCategory, Member, MemberUpsert, Segment, SegmentMembers,
};
use crate::transport::Transport;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ListsApi {
    transport: Arc<dyn Transport>,
}

impl ListsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn get(&self, path: &str) -> AudienceResult<Value> {
        self.transport.call(Method::GET, path, None).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> AudienceResult<Value> {
        let body = serde_json::to_value(payload)?;
        self.transport.call(method, path, Some(&body)).await
    }

    pub async fn interest_categories(&self, list_id: &str) -> AudienceResult<Vec<InterestCategory>> {
        let body = self
            .get(&format!("/lists/{}/interest-categories", list_id))
            .await?;
        list_field(body, "categories")
    }

    pub async fn interest_category(
        &self,
        list_id: &str,
        category_id: &str,
    ) -> AudienceResult<InterestCategory> {
        let body = self
            .get(&format!(
                "/lists/{}/interest-categories/{}",
                list_id, category_id
            ))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn interests(&self, list_id: &str, category_id: &str) -> AudienceResult<Vec<Interest>> {
        let body = self
            .get(&format!(
                "/lists/{}/interest-categories/{}/interests",
                list_id, category_id
            ))
            .await?;
        list_field(body, "interests")
    }

    pub async fn segments(&self, list_id: &str) -> AudienceResult<Vec<Segment>> {
        let body = self.get(&format!("/lists/{}/segments", list_id)).await?;
        list_field(body, "segments")
    }

    /// Create a static segment, optionally seeded with one member.
    pub async fn create_segment(
        &self,
        list_id: &str,
        name: &str,
        seed_email: Option<&str>,
    ) -> AudienceResult<Segment> {
        let payload = CreateSegment {
            name,
            static_segment: seed_email.map(|email| vec![email]),
        };
        let body = self
            .send_json(Method::POST, &format!("/lists/{}/segments", list_id), &payload)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn update_segment_members(
        &self,
        list_id: &str,
        segment_id: u64,
        members: SegmentMembers<'_>,
    ) -> AudienceResult<()> {
        self.send_json(
            Method::POST,
            &format!("/lists/{}/segments/{}", list_id, segment_id),
            &members,
        )
        .await?;
        Ok(())
    }

    pub async fn member(&self, list_id: &str, email_hash: &str) -> AudienceResult<Member> {
        let body = self
            .get(&format!("/lists/{}/members/{}", list_id, email_hash))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn upsert_member(
        &self,
        list_id: &str,
        email_hash: &str,
        payload: &MemberUpsert,
    ) -> AudienceResult<Member> {
        let body = self
            .send_json(
                Method::PUT,
                &format!("/lists/{}/members/{}", list_id, email_hash),
                payload,
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

/// Decode the list held under `field`, rejecting envelopes where it is absent or not an array.
fn list_field<T: DeserializeOwned>(mut payload: Value, field: &'static str) -> AudienceResult<Vec<T>> {
    match payload.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(AudienceError::from))
            .collect(),
        Some(other) => {
            payload[field] = other;
            Err(AudienceError::data_format(field, payload))
        }
        None => Err(AudienceError::data_format(field, payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_field_decodes_items() {
        let categories: Vec<InterestCategory> = list_field(
            json!({"categories": [{"id": "c1", "title": "Membership", "list_id": "l1"}], "total_items": 1}),
            "categories",
        )
        .unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].title, "Membership");
    }

    #[test]
    fn list_field_rejects_missing_or_scalar_field() {
        let missing = list_field::<InterestCategory>(json!({"total_items": 0}), "categories");
        assert!(matches!(
            missing,
            Err(AudienceError::DataFormat { field: "categories", .. })
        ));

        let scalar = list_field::<Interest>(json!({"interests": "nope"}), "interests");
        match scalar {
            Err(AudienceError::DataFormat { field, payload }) => {
                assert_eq!(field, "interests");
                assert_eq!(payload, json!({"interests": "nope"}));
            }
            other => panic!("expected data format error, got {other:?}"),
        }
    }

    #[test]
    fn list_field_reports_bad_items_as_decode_errors() {
        let result = list_field::<Segment>(json!({"segments": [{"name": "no id"}]}), "segments");
        assert!(matches!(result, Err(AudienceError::Decode(_))));
    }
}
