use super::InterestCache;
use crate::api::ListsApi;
use crate::error::{AudienceError, AudienceResult};
use crate::models::Interest;
use futures::future::try_join_all;
use log::debug;
use std::sync::Arc;

/// Answers "which interests exist on this list" with at most one full fetch per list id.
///
/// There is no single-flight: two first-time lookups of the same list id that
/// overlap will both fetch, and the later write replaces the earlier identical one.
#[derive(Clone)]
pub struct CategoryCache {
    api: ListsApi,
    store: Arc<InterestCache>,
}

impl CategoryCache {
    pub fn new(api: ListsApi, store: Arc<InterestCache>) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &Arc<InterestCache> {
        &self.store
    }

    /// Every interest of every category on the list, in category order.
    ///
    /// ## Errors
    ///
    /// Returns `AudienceError::DataFormat` when a categories or interests response
    /// lacks its list field; nothing is cached in that case. The first failed
    /// per-category fetch aborts the whole lookup.
    pub async fn get_all_interests(&self, list_id: &str) -> AudienceResult<Arc<Vec<Interest>>> {
        if let Some(hit) = self.store.get(list_id) {
            debug!("interest cache hit for list {} ({} interests)", list_id, hit.len());
            return Ok(hit);
        }

        debug!("interest cache miss for list {}, fetching categories", list_id);
        let categories = self.api.interest_categories(list_id).await?;

        let fetches = categories.iter().map(|category| async move {
            let interests = self.api.interests(list_id, &category.id).await?;
            Ok::<_, AudienceError>(
                interests
                    .into_iter()
                    .map(|mut interest| {
                        interest.category_id = category.id.clone();
                        interest
                    })
                    .collect::<Vec<_>>(),
            )
        });

        let flattened: Vec<Interest> = try_join_all(fetches).await?.into_iter().flatten().collect();

        debug!(
            "caching {} interests across {} categories for list {}",
            flattened.len(),
            categories.len(),
            list_id
        );
        Ok(self.store.put(list_id, flattened))
    }
}
