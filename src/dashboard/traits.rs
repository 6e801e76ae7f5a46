//! Common traits for dashboard resources

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::dashboard::DashboardClient;
use crate::error::Result;

/// Common trait for dashboard resources (organizations, projects)
pub trait DashboardResource {
    /// Get the resource ID
    fn id(&self) -> &str;

    /// Get the human-readable name
    fn name(&self) -> &str;

    /// Check if the resource has the given ID
    fn has_id(&self, id: &str) -> bool {
        self.id() == id
    }
}

/// Trait for list responses
///
/// The dashboard wraps every list under a resource-specific key
/// (`ProviderOrganizations`, `Projects`); implementors unwrap it.
pub trait ListResponse<T> {
    /// Consume self and return the listed items
    fn into_items(self) -> Vec<T>;
}

/// Deserialize a list field, skipping entries that do not decode as `T`
///
/// Listings are shared by every resource; an unrelated malformed entry must
/// not fail the lookup of another one.
pub fn skip_malformed<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Skipping malformed list entry: {}", e);
                None
            }
        })
        .collect())
}

impl DashboardClient {
    /// Fetch a full list from an endpoint
    pub async fn fetch_list<T, R>(&self, path: &str, error_context: &str) -> Result<Vec<T>>
    where
        R: DeserializeOwned + ListResponse<T>,
    {
        let url = self.url(path);
        debug!("Fetching {} from: {}", error_context, url);

        let response = self.get(&url).send().await?;
        let list: R = self.parse_api_response(response, error_context).await?;
        let items = list.into_items();

        debug!("Fetched {} {}", items.len(), error_context);
        Ok(items)
    }

    /// Fetch a list and pick the item with the given ID
    ///
    /// Returns `None` when the item is not listed or the endpoint answers 404.
    pub async fn find_in_list<T, R>(
        &self,
        path: &str,
        id: &str,
        error_context: &str,
    ) -> Result<Option<T>>
    where
        T: DashboardResource,
        R: DeserializeOwned + ListResponse<T>,
    {
        match self.fetch_list::<T, R>(path, error_context).await {
            Ok(items) => Ok(items.into_iter().find(|item| item.has_id(id))),
            Err(crate::error::ProviderError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
