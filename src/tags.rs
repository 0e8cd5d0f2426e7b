//! Tag (static segment) membership reconciliation.

use crate::api::ListsApi;
use crate::error::{AudienceError, AudienceResult};
use crate::members::email_hash;
use crate::models::{Segment, SegmentMembers};
use futures::future::try_join_all;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of [`TagReconciler::assign_tags_to_user`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagAssignment {
    /// Pre-existing segments the member was added to.
    pub added: Vec<Segment>,
    /// Segments created with the member as their seed.
    pub created: Vec<Segment>,
}

#[derive(Clone)]
pub struct TagReconciler {
    api: ListsApi,
}

impl TagReconciler {
    pub fn new(api: ListsApi) -> Self {
        Self { api }
    }

    /// Put `email` into every segment named in `desired`.
    ///
    /// Missing segments fail the call with `TagsNotFound` before anything is
    /// changed, unless `create_if_missing` is set, in which case they are created
    /// with the member already in them and get no separate add.
    pub async fn assign_tags_to_user<S: AsRef<str>>(
        &self,
        list_id: &str,
        email: &str,
        desired: &[S],
        create_if_missing: bool,
    ) -> AudienceResult<TagAssignment> {
        let email = email.trim();
        let segments = self.api.segments(list_id).await?;
        let (matched, missing) = partition_tags(segments, desired);

        if !missing.is_empty() && !create_if_missing {
            return Err(AudienceError::TagsNotFound(missing));
        }

        let created = try_join_all(
            missing
                .iter()
                .map(|name| self.api.create_segment(list_id, name, Some(email))),
        )
        .await?;
        if !created.is_empty() {
            info!(
                "created {} tag(s) on list {} seeded with {}",
                created.len(),
                list_id,
                email
            );
        }

        try_join_all(matched.iter().map(|segment| {
            self.api.update_segment_members(
                list_id,
                segment.id,
                SegmentMembers::MembersToAdd(vec![email]),
            )
        }))
        .await?;
        debug!(
            "added {} to {} existing tag(s) on list {}",
            email,
            matched.len(),
            list_id
        );

        Ok(TagAssignment {
            added: matched,
            created,
        })
    }

    /// Take `email` out of every segment named in `names`; unknown names are ignored.
    pub async fn remove_tags<S: AsRef<str>>(
        &self,
        list_id: &str,
        email: &str,
        names: &[S],
    ) -> AudienceResult<Vec<Segment>> {
        let email = email.trim();
        let wanted: HashSet<&str> = names.iter().map(|name| name.as_ref()).collect();
        let targets: Vec<Segment> = self
            .api
            .segments(list_id)
            .await?
            .into_iter()
            .filter(|segment| wanted.contains(segment.name.as_str()))
            .collect();

        try_join_all(targets.iter().map(|segment| {
            self.api.update_segment_members(
                list_id,
                segment.id,
                SegmentMembers::MembersToRemove(vec![email]),
            )
        }))
        .await?;

        info!(
            "removed {} from {} tag(s) on list {}",
            email,
            targets.len(),
            list_id
        );
        Ok(targets)
    }

    /// Tag names on the member record, in platform order.
    pub async fn get_tags_by_user(&self, list_id: &str, email: &str) -> AudienceResult<Vec<String>> {
        let member = self.api.member(list_id, &email_hash(email)).await?;
        Ok(member
            .tags
            .map(|tags| tags.into_iter().map(|tag| tag.name).collect())
            .unwrap_or_default())
    }
}

/// Split desired names into segments that already exist and names that do not.
///
/// Repeated desired names count once; when the platform holds several segments
/// with one name, the first is used and the rest are never matched.
fn partition_tags<S: AsRef<str>>(segments: Vec<Segment>, desired: &[S]) -> (Vec<Segment>, Vec<String>) {
    let mut remaining: Vec<Option<Segment>> = segments.into_iter().map(Some).collect();
    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for name in desired.iter().map(|name| name.as_ref()) {
        if !seen.insert(name) {
            continue;
        }

        let hit = remaining
            .iter_mut()
            .find(|slot| matches!(slot, Some(segment) if segment.name == name))
            .and_then(Option::take);

        match hit {
            Some(segment) => matched.push(segment),
            None => missing.push(name.to_string()),
        }
    }

    (matched, missing)
}
