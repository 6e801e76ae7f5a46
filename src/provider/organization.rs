//! `goliatdashboard_organization` resource

use log::{debug, info};

use crate::config::provider;
use crate::dashboard::{DashboardClient, Organization};
use crate::error::{ProviderError, Result};
use crate::provider::resource::ManagedResource;
use crate::provider::schema::{Attribute, Schema};
use crate::provider::value::{AttrValue, ObjectValue};

/// Organization resource handler
pub struct OrganizationResource;

/// Typed organization state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationState {
    pub id: Option<String>,
    pub name: String,
    /// Null right after import until the first read
    pub org_type: Option<String>,
}

impl OrganizationState {
    fn id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::value_attr("id", "organization id is not set"))
    }
}

/// Id derived from the name; a name without letters or digits has none
fn slug_id(name: &str) -> Result<String> {
    let id = Organization::id_from_name(name);
    if id.is_empty() {
        return Err(ProviderError::value_attr(
            "name",
            "must contain at least one letter or digit",
        ));
    }
    Ok(id)
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

impl ManagedResource for OrganizationResource {
    const TYPE_NAME: &'static str = provider::ORGANIZATION_TYPE;

    type State = OrganizationState;

    fn schema() -> Schema {
        Schema::new(
            "A Goliat Dashboard provider organization.",
            vec![
                Attribute::computed("id", "Organization identifier."),
                Attribute::required("name", "Display name of the organization.").force_new(),
                Attribute::required("type", "Organization type, e.g. `providerOrganizations`.")
                    .force_new(),
            ],
        )
    }

    fn decode(value: &ObjectValue) -> Result<OrganizationState> {
        Ok(OrganizationState {
            id: value.computed_string("id"),
            name: value.required_string("name")?,
            org_type: value.string("type")?,
        })
    }

    fn validate(config: &ObjectValue) -> Result<()> {
        match config.get("name") {
            AttrValue::Known(name) => slug_id(name).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn encode(state: &OrganizationState) -> ObjectValue {
        ObjectValue::new()
            .with("id", AttrValue::from_option(state.id.clone()))
            .with("name", AttrValue::known(state.name.clone()))
            .with("type", AttrValue::from_option(state.org_type.clone()))
    }

    async fn create(
        client: &DashboardClient,
        planned: OrganizationState,
    ) -> Result<OrganizationState> {
        let org_type = planned
            .org_type
            .clone()
            .ok_or_else(|| ProviderError::value_attr("type", "a value is required"))?;

        let payload = Organization {
            id: slug_id(&planned.name)?,
            name: planned.name.clone(),
            org_type,
        };

        let assigned = client.put_organization(&payload).await?;
        let id = assigned.unwrap_or(payload.id);
        info!("Created organization '{}' with id '{}'", payload.name, id);

        Ok(OrganizationState {
            id: Some(id),
            name: payload.name,
            org_type: Some(payload.org_type),
        })
    }

    async fn read(
        client: &DashboardClient,
        current: OrganizationState,
    ) -> Result<Option<OrganizationState>> {
        let id = current.id()?;

        match client.get_organization(id).await? {
            // fields missing from the listing keep their current values
            Some(org) => Ok(Some(OrganizationState {
                id: Some(org.id),
                name: non_empty_or(org.name, &current.name),
                org_type: Some(org.org_type)
                    .filter(|t| !t.is_empty())
                    .or_else(|| current.org_type.clone()),
            })),
            None => {
                debug!("Organization '{}' no longer exists", id);
                Ok(None)
            }
        }
    }

    async fn update(
        _client: &DashboardClient,
        prior: OrganizationState,
        _planned: OrganizationState,
    ) -> Result<OrganizationState> {
        Err(ProviderError::Resource(format!(
            "organization '{}' cannot be updated in place; changes to name or type replace it",
            prior.id.as_deref().unwrap_or(&prior.name)
        )))
    }

    async fn delete(client: &DashboardClient, current: OrganizationState) -> Result<()> {
        let id = current.id()?;
        client.delete_organization(id, &current.name).await?;
        info!("Deleted organization '{}'", id);
        Ok(())
    }

    fn import(id: &str) -> Result<OrganizationState> {
        if id.is_empty() {
            return Err(ProviderError::Resource(
                "import id must be the organization id".to_string(),
            ));
        }
        Ok(OrganizationState {
            id: Some(id.to_string()),
            name: id.to_string(),
            org_type: None,
        })
    }
}
