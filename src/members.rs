//! Member addressing and upserts.

use crate::api::ListsApi;
use crate::error::AudienceResult;
use crate::interests::{InterestResolver, InterestsInput};
use crate::models::{InterestFlags, Member, MemberStatus, MemberUpsert, MergeFields};
use log::info;
use md5::{Digest, Md5};

/// Trim and lower-case an address the way the platform does before hashing.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Subscriber hash used to address a member: hex MD5 of the normalized address.
pub fn email_hash(email: &str) -> String {
    let digest = Md5::digest(normalize_email(email).as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Builds and sends the single upsert that creates or updates a member.
#[derive(Clone)]
pub struct MemberUpdater {
    api: ListsApi,
    resolver: InterestResolver,
}

impl MemberUpdater {
    pub fn new(api: ListsApi, resolver: InterestResolver) -> Self {
        Self { api, resolver }
    }

    /// Create or update a member.
    ///
    /// Without an explicit `status` only `status_if_new` is sent (as
    /// `subscribed`), which leaves an existing member's status alone.
    pub async fn update_user(
        &self,
        list_id: &str,
        email: &str,
        interests: Option<InterestsInput>,
        merge_fields: Option<MergeFields>,
        status: Option<MemberStatus>,
    ) -> AudienceResult<Member> {
        let interests = match interests {
            None => None,
            Some(InterestsInput::Resolved(flags)) => Some(flags),
            Some(InterestsInput::Spec(spec)) => {
                let flags = self.resolver.resolve(list_id, Some(&spec)).await?;
                (!flags.is_empty()).then_some(flags)
            }
        };

        let payload = build_upsert(email, interests, merge_fields, status);
        let member = self
            .api
            .upsert_member(list_id, &email_hash(email), &payload)
            .await?;

        info!(
            "upserted member {} on list {} (status {})",
            member.email_address,
            list_id,
            member
                .status
                .map(|status| status.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        Ok(member)
    }

    pub async fn subscribe(
        &self,
        list_id: &str,
        email: &str,
        interests: Option<InterestsInput>,
        merge_fields: Option<MergeFields>,
    ) -> AudienceResult<Member> {
        self.update_user(
            list_id,
            email,
            interests,
            merge_fields,
            Some(MemberStatus::Subscribed),
        )
        .await
    }

    pub async fn unsubscribe(&self, list_id: &str, email: &str) -> AudienceResult<Member> {
        self.update_user(list_id, email, None, None, Some(MemberStatus::Unsubscribed))
            .await
    }

    pub async fn get_member(&self, list_id: &str, email: &str) -> AudienceResult<Member> {
        self.api.member(list_id, &email_hash(email)).await
    }
}

fn build_upsert(
    email: &str,
    interests: Option<InterestFlags>,
    merge_fields: Option<MergeFields>,
    status: Option<MemberStatus>,
) -> MemberUpsert {
    MemberUpsert {
        email_address: email.trim().to_string(),
        status,
        status_if_new: status.unwrap_or_default(),
        interests,
        merge_fields,
    }
}
