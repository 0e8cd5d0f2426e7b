use crate::api::ListsApi;
use crate::cache::{CategoryCache, InterestCache};
use crate::config::ClientConfig;
use crate::error::AudienceResult;
use crate::interests::{InterestResolver, InterestSpec, InterestsInput};
use crate::members::MemberUpdater;
use crate::models::{Interest, InterestCategory, InterestFlags, Member, MemberStatus, MergeFields, Segment};
use crate::tags::{TagAssignment, TagReconciler};
use crate::transport::{HttpTransport, LoggingTransport, Transport};
use std::sync::Arc;

/// Entry point for audience management.
///
/// Owns one transport and one interest cache; clones share both.
#[derive(Clone)]
pub struct AudienceClient {
    api: ListsApi,
    categories: CategoryCache,
    resolver: InterestResolver,
    members: MemberUpdater,
    tags: TagReconciler,
}

impl AudienceClient {
    /// HTTP client for the configured account, logging every call.
    pub fn from_config(config: &ClientConfig) -> AudienceResult<Self> {
        let http = HttpTransport::new(config)?;
        log::debug!("audience client targeting {}", http.base_url());
        Ok(Self::with_transport(Arc::new(LoggingTransport::new(http))))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_cache(transport, Arc::new(InterestCache::new()))
    }

    /// Build over an existing (possibly pre-populated) interest cache.
    pub fn with_cache(transport: Arc<dyn Transport>, cache: Arc<InterestCache>) -> Self {
        let api = ListsApi::new(transport);
        let categories = CategoryCache::new(api.clone(), cache);
        let resolver = InterestResolver::new(api.clone(), categories.clone());
        let members = MemberUpdater::new(api.clone(), resolver.clone());
        let tags = TagReconciler::new(api.clone());

        Self {
            api,
            categories,
            resolver,
            members,
            tags,
        }
    }

    pub fn cache(&self) -> &Arc<InterestCache> {
        self.categories.store()
    }

    // ===== Interests =====

    pub async fn list_interest_categories(&self, list_id: &str) -> AudienceResult<Vec<InterestCategory>> {
        self.api.interest_categories(list_id).await
    }

    pub async fn interest_category_info(
        &self,
        list_id: &str,
        category_id: &str,
    ) -> AudienceResult<InterestCategory> {
        self.api.interest_category(list_id, category_id).await
    }

    pub async fn list_interests_by_category(
        &self,
        list_id: &str,
        category_id: &str,
    ) -> AudienceResult<Vec<Interest>> {
        self.api.interests(list_id, category_id).await
    }

    pub async fn list_all_interests(&self, list_id: &str) -> AudienceResult<Arc<Vec<Interest>>> {
        self.categories.get_all_interests(list_id).await
    }

    pub async fn resolve_interests(
        &self,
        list_id: &str,
        spec: Option<&InterestSpec>,
    ) -> AudienceResult<InterestFlags> {
        self.resolver.resolve(list_id, spec).await
    }

    pub async fn resolve_interest_names(&self, list_id: &str, names: &str) -> AudienceResult<InterestFlags> {
        self.resolver.resolve_names(list_id, names).await
    }

    // ===== Members =====

    pub async fn update_user(
        &self,
        list_id: &str,
        email: &str,
        interests: Option<InterestsInput>,
        merge_fields: Option<MergeFields>,
        status: Option<MemberStatus>,
    ) -> AudienceResult<Member> {
        self.members
            .update_user(list_id, email, interests, merge_fields, status)
            .await
    }

    pub async fn subscribe(
        &self,
        list_id: &str,
        email: &str,
        interests: Option<InterestsInput>,
        merge_fields: Option<MergeFields>,
    ) -> AudienceResult<Member> {
        self.members
            .subscribe(list_id, email, interests, merge_fields)
            .await
    }

    pub async fn unsubscribe(&self, list_id: &str, email: &str) -> AudienceResult<Member> {
        self.members.unsubscribe(list_id, email).await
    }

    pub async fn get_member(&self, list_id: &str, email: &str) -> AudienceResult<Member> {
        self.members.get_member(list_id, email).await
    }

    // ===== Tags =====

    pub async fn assign_tags_to_user<S: AsRef<str>>(
        &self,
        list_id: &str,
        email: &str,
        tags: &[S],
        create_if_missing: bool,
    ) -> AudienceResult<TagAssignment> {
        self.tags
            .assign_tags_to_user(list_id, email, tags, create_if_missing)
            .await
    }

    pub async fn remove_tags<S: AsRef<str>>(
        &self,
        list_id: &str,
        email: &str,
        tags: &[S],
    ) -> AudienceResult<Vec<Segment>> {
        self.tags.remove_tags(list_id, email, tags).await
    }

    pub async fn get_tags_by_user(&self, list_id: &str, email: &str) -> AudienceResult<Vec<String>> {
        self.tags.get_tags_by_user(list_id, email).await
    }
}
