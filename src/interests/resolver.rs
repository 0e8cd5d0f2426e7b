use super::InterestSpec;
use crate::api::ListsApi;
use crate::cache::CategoryCache;
use crate::error::{AudienceError, AudienceResult};
use crate::models::InterestFlags;
use futures::future::try_join_all;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Turns name-based interest selections into the `{interestId: true}` payload.
#[derive(Clone)]
pub struct InterestResolver {
    api: ListsApi,
    categories: CategoryCache,
}

impl InterestResolver {
    pub fn new(api: ListsApi, categories: CategoryCache) -> Self {
        Self { api, categories }
    }

    /// Resolve a spec keyed by category title.
    ///
    /// Only positive matches appear in the result. Keys naming no category are
    /// skipped without error, so an unmatched spec yields an empty map.
    pub async fn resolve(
        &self,
        list_id: &str,
        spec: Option<&InterestSpec>,
    ) -> AudienceResult<InterestFlags> {
        let Some(spec) = spec else {
            return Ok(InterestFlags::new());
        };

        let requested = spec.normalize();
        if requested.is_empty() {
            return Ok(InterestFlags::new());
        }

        let categories = self.api.interest_categories(list_id).await?;
        let mut by_title: HashMap<&str, &str> = HashMap::with_capacity(categories.len());
        for category in &categories {
            by_title
                .entry(category.title.as_str())
                .or_insert(category.id.as_str());
        }

        let matched: Vec<(&str, &Vec<String>)> = requested
            .iter()
            .filter_map(|(key, values)| match by_title.get(key.as_str()) {
                Some(category_id) => Some((*category_id, values)),
                None => {
                    debug!("no interest category titled '{}' on list {}, ignoring", key, list_id);
                    None
                }
            })
            .collect();

        let fetches = matched.iter().map(|&(category_id, values)| async move {
            let interests = self.api.interests(list_id, category_id).await?;
            Ok::<_, AudienceError>(
                interests
                    .into_iter()
                    .filter(|interest| values.contains(&interest.name))
                    .map(|interest| interest.id)
                    .collect::<Vec<_>>(),
            )
        });

        let flags: InterestFlags = try_join_all(fetches)
            .await?
            .into_iter()
            .flatten()
            .map(|id| (id, true))
            .collect();

        debug!(
            "resolved {} interest(s) from {} matched categor(ies) on list {}",
            flags.len(),
            matched.len(),
            list_id
        );
        Ok(flags)
    }

    /// Resolve a comma-separated list of interest names across every category.
    ///
    /// Matching is by name alone against the cached interest graph, so a name
    /// shared by several categories selects all of them.
    pub async fn resolve_names(&self, list_id: &str, names: &str) -> AudienceResult<InterestFlags> {
        let wanted: HashSet<&str> = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if wanted.is_empty() {
            return Ok(InterestFlags::new());
        }

        let interests = self.categories.get_all_interests(list_id).await?;
        Ok(interests
            .iter()
            .filter(|interest| wanted.contains(interest.name.as_str()))
            .map(|interest| (interest.id.clone(), true))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InterestCache;
    use crate::interests::OneOrMany;
    use crate::test_support::MockTransport;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn membership_mock() -> MockTransport {
        MockTransport::new()
            .route(
                Method::GET,
                "/lists/l1/interest-categories",
                json!({"categories": [
                    {"id": "c1", "title": "Membership"},
                    {"id": "c2", "title": "Topics"}
                ]}),
            )
            .route(
                Method::GET,
                "/lists/l1/interest-categories/c1/interests",
                json!({"interests": [{"id": "id1", "name": "Free"}, {"id": "id2", "name": "Paid"}]}),
            )
            .route(
                Method::GET,
                "/lists/l1/interest-categories/c2/interests",
                json!({"interests": [{"id": "id3", "name": "Rust"}, {"id": "id4", "name": "Free"}]}),
            )
    }

    fn resolver_over(mock: &Arc<MockTransport>) -> InterestResolver {
        let api = ListsApi::new(mock.clone());
        let categories = CategoryCache::new(api.clone(), Arc::new(InterestCache::new()));
        InterestResolver::new(api, categories)
    }

    #[tokio::test]
    async fn resolves_string_spec_to_positive_flags_only() {
        let mock = Arc::new(membership_mock());
        let resolver = resolver_over(&mock);

        let flags = resolver
            .resolve("l1", Some(&InterestSpec::from("Membership:Free")))
            .await
            .unwrap();

        assert_eq!(flags, InterestFlags::from([("id1".to_string(), true)]));
        assert!(!flags.contains_key("id2"));
        // only the matched category's interests are fetched
        assert_eq!(
            mock.count(Method::GET, "/lists/l1/interest-categories/c2/interests"),
            0
        );
    }

    #[tokio::test]
    async fn resolves_map_spec_across_categories() {
        let mock = Arc::new(membership_mock());
        let resolver = resolver_over(&mock);
        let spec: InterestSpec = [
            ("Membership", OneOrMany::from(vec!["Free", "Paid"])),
            ("Topics", OneOrMany::from("Rust")),
        ]
        .into_iter()
        .collect();

        let flags = resolver.resolve("l1", Some(&spec)).await.unwrap();

        let ids: Vec<&str> = flags.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["id1", "id2", "id3"]);
        assert!(flags.values().all(|flag| *flag));
    }

    #[tokio::test]
    async fn unmatched_keys_resolve_to_empty_map() {
        let mock = Arc::new(membership_mock());
        let resolver = resolver_over(&mock);

        let flags = resolver
            .resolve("l1", Some(&InterestSpec::from("Nonexistent:Free")))
            .await
            .unwrap();

        assert!(flags.is_empty());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn absent_spec_makes_no_calls() {
        let mock = Arc::new(membership_mock());
        let resolver = resolver_over(&mock);

        assert!(resolver.resolve("l1", None).await.unwrap().is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn resolve_names_matches_across_categories_via_cache() {
        let mock = Arc::new(membership_mock());
        let resolver = resolver_over(&mock);

        let flags = resolver.resolve_names("l1", "Free, Rust").await.unwrap();
        let ids: Vec<&str> = flags.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["id1", "id3", "id4"]);

        let before = mock.calls().len();
        resolver.resolve_names("l1", "Paid").await.unwrap();
        assert_eq!(mock.calls().len(), before);
    }
}
