//! Managed resource contract

use crate::config::provider;
use crate::dashboard::DashboardClient;
use crate::error::{ProviderError, Result};
use crate::provider::schema::Schema;
use crate::provider::value::ObjectValue;

/// A resource type backed by the dashboard API
///
/// Implementors translate between the Terraform object value and a typed
/// state, and perform the CRUD calls for it.
#[allow(async_fn_in_trait)]
pub trait ManagedResource {
    /// Terraform type name
    const TYPE_NAME: &'static str;

    /// Typed resource state
    type State;

    fn schema() -> Schema;

    fn decode(value: &ObjectValue) -> Result<Self::State>;

    fn encode(state: &Self::State) -> ObjectValue;

    /// Extra configuration checks beyond required/optional
    fn validate(_config: &ObjectValue) -> Result<()> {
        Ok(())
    }

    async fn create(client: &DashboardClient, planned: Self::State) -> Result<Self::State>;

    /// Refresh; `None` when the remote object no longer exists
    async fn read(client: &DashboardClient, current: Self::State) -> Result<Option<Self::State>>;

    async fn update(
        client: &DashboardClient,
        prior: Self::State,
        planned: Self::State,
    ) -> Result<Self::State>;

    async fn delete(client: &DashboardClient, current: Self::State) -> Result<()>;

    /// State seeded from an import id, refreshed by a later read
    fn import(id: &str) -> Result<Self::State>;
}

/// Resource types served by this provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Organization,
    Project,
}

impl ResourceType {
    pub const ALL: [ResourceType; 2] = [ResourceType::Organization, ResourceType::Project];

    /// Resolve a Terraform type name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            provider::ORGANIZATION_TYPE => Ok(ResourceType::Organization),
            provider::PROJECT_TYPE => Ok(ResourceType::Project),
            other => Err(ProviderError::UnknownResource(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Organization => provider::ORGANIZATION_TYPE,
            ResourceType::Project => provider::PROJECT_TYPE,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrip() {
        for ty in ResourceType::ALL {
            assert_eq!(ResourceType::from_name(ty.name()).unwrap(), ty);
        }
    }

    #[test]
    fn test_from_name_unknown() {
        let err = ResourceType::from_name("example_resource").unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(name) if name == "example_resource"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ResourceType::Project.to_string(),
            "goliatdashboard_project"
        );
    }
}
