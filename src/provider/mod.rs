//! Goliat Dashboard provider model
//!
//! Holds the provider configuration and dispatches every lifecycle
//! operation to the resource handler registered for the type name.

mod organization;
mod plan;
mod project;
mod resource;
pub mod schema;
pub mod value;

use log::{debug, info};
use std::sync::{Arc, RwLock};

use crate::dashboard::{normalize_base_url, DashboardClient};
use crate::error::{ProviderError, Result};

pub use organization::{OrganizationResource, OrganizationState};
pub use plan::{plan_change, PlannedChange};
pub use project::{ProjectResource, ProjectState};
pub use resource::{ManagedResource, ResourceType};
pub use schema::{Attribute, Schema};
pub use value::{AttrValue, ObjectValue};

/// The provider instance served to Terraform
#[derive(Debug, Default)]
pub struct GoliatProvider {
    client: RwLock<Option<Arc<DashboardClient>>>,
}

impl GoliatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of the `provider "goliatdashboard"` block
    pub fn provider_schema() -> Schema {
        Schema::new(
            "Manages Goliat Dashboard organizations and projects.",
            vec![
                Attribute::required("backend_url", "Base URL of the Goliat Dashboard backend."),
                Attribute::required("token", "Bearer token for the dashboard API.").sensitive(),
            ],
        )
    }

    /// Schemas of every resource type, keyed by type name
    pub fn resource_schemas() -> Vec<(&'static str, Schema)> {
        ResourceType::ALL
            .iter()
            .map(|ty| (ty.name(), Self::resource_schema(*ty)))
            .collect()
    }

    pub fn resource_schema(ty: ResourceType) -> Schema {
        match ty {
            ResourceType::Organization => OrganizationResource::schema(),
            ResourceType::Project => ProjectResource::schema(),
        }
    }

    /// Check the provider block; unknown values pass
    pub fn validate_config(&self, config: &ObjectValue) -> Vec<ProviderError> {
        let mut errors = Vec::new();

        if let AttrValue::Known(url) = config.get("backend_url") {
            if let Err(e) = normalize_base_url(url) {
                errors.push(e);
            }
        }
        if let AttrValue::Known(token) = config.get("token") {
            if token.trim().is_empty() {
                errors.push(ProviderError::config_attr("token", "must not be empty"));
            }
        }

        errors
    }

    /// Build the dashboard client from the provider block
    pub fn configure(&self, config: &ObjectValue) -> Result<()> {
        let backend_url = known_config_string(config, "backend_url")?;
        let token = known_config_string(config, "token")?;

        let client = DashboardClient::new(&backend_url, token)?;
        info!("Provider configured for {}", client.base_url());

        let mut guard = self
            .client
            .write()
            .map_err(|_| ProviderError::Plugin("provider state lock poisoned".to_string()))?;
        *guard = Some(Arc::new(client));
        Ok(())
    }

    fn client(&self) -> Result<Arc<DashboardClient>> {
        let guard = self
            .client
            .read()
            .map_err(|_| ProviderError::Plugin("provider state lock poisoned".to_string()))?;
        guard.clone().ok_or(ProviderError::NotConfigured)
    }

    /// Validate a resource block
    pub fn validate_resource(&self, type_name: &str, config: &ObjectValue) -> Result<()> {
        let ty = ResourceType::from_name(type_name)?;
        let schema = Self::resource_schema(ty);

        if let Some(attr) = schema.empty_required(config).first() {
            return Err(ProviderError::value_attr(attr, "must not be empty"));
        }

        match ty {
            ResourceType::Organization => OrganizationResource::validate(config),
            ResourceType::Project => ProjectResource::validate(config),
        }
    }

    /// Bring a stored state up to the current schema
    pub fn upgrade_state(&self, type_name: &str, stored: &ObjectValue) -> Result<ObjectValue> {
        let ty = ResourceType::from_name(type_name)?;
        Ok(Self::resource_schema(ty).conform(stored))
    }

    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<&ObjectValue>,
        proposed: Option<ObjectValue>,
    ) -> Result<PlannedChange> {
        let ty = ResourceType::from_name(type_name)?;
        Ok(plan_change(&Self::resource_schema(ty), prior, proposed))
    }

    /// Apply a planned change, returning the new state (`None` once deleted)
    pub async fn apply(
        &self,
        type_name: &str,
        prior: Option<ObjectValue>,
        planned: Option<ObjectValue>,
    ) -> Result<Option<ObjectValue>> {
        let ty = ResourceType::from_name(type_name)?;
        let client = self.client()?;

        match ty {
            ResourceType::Organization => {
                apply_change::<OrganizationResource>(&client, prior, planned).await
            }
            ResourceType::Project => apply_change::<ProjectResource>(&client, prior, planned).await,
        }
    }

    /// Refresh a resource from the dashboard
    pub async fn read(
        &self,
        type_name: &str,
        current: Option<ObjectValue>,
    ) -> Result<Option<ObjectValue>> {
        let ty = ResourceType::from_name(type_name)?;
        let Some(current) = current else {
            return Ok(None);
        };
        let client = self.client()?;

        match ty {
            ResourceType::Organization => {
                read_resource::<OrganizationResource>(&client, &current).await
            }
            ResourceType::Project => read_resource::<ProjectResource>(&client, &current).await,
        }
    }

    /// State for an imported resource
    pub fn import(&self, type_name: &str, id: &str) -> Result<ObjectValue> {
        let ty = ResourceType::from_name(type_name)?;
        debug!("Importing {} '{}'", ty, id);

        match ty {
            ResourceType::Organization => import_resource::<OrganizationResource>(id),
            ResourceType::Project => import_resource::<ProjectResource>(id),
        }
    }
}

fn known_config_string(config: &ObjectValue, name: &str) -> Result<String> {
    match config.get(name) {
        AttrValue::Known(s) if !s.trim().is_empty() => Ok(s.clone()),
        AttrValue::Known(_) => Err(ProviderError::config_attr(name, "must not be empty")),
        AttrValue::Unknown => Err(ProviderError::config_attr(
            name,
            "value must be known when the provider is configured",
        )),
        AttrValue::Null => Err(ProviderError::config_attr(name, "a value is required")),
    }
}

async fn apply_change<R: ManagedResource>(
    client: &DashboardClient,
    prior: Option<ObjectValue>,
    planned: Option<ObjectValue>,
) -> Result<Option<ObjectValue>> {
    let schema = R::schema();

    match (prior, planned) {
        (Some(prior), None) => {
            debug!("Deleting {}", R::TYPE_NAME);
            R::delete(client, R::decode(&prior)?).await?;
            Ok(None)
        }
        (None, Some(planned)) => {
            debug!("Creating {}", R::TYPE_NAME);
            let created = R::create(client, R::decode(&planned)?).await?;
            Ok(Some(schema.conform(&R::encode(&created))))
        }
        (Some(prior), Some(planned)) => {
            debug!("Updating {}", R::TYPE_NAME);
            let updated = R::update(client, R::decode(&prior)?, R::decode(&planned)?).await?;
            Ok(Some(schema.conform(&R::encode(&updated))))
        }
        (None, None) => Ok(None),
    }
}

async fn read_resource<R: ManagedResource>(
    client: &DashboardClient,
    current: &ObjectValue,
) -> Result<Option<ObjectValue>> {
    let state = R::decode(current)?;
    let refreshed = R::read(client, state).await?;
    Ok(refreshed.map(|s| R::schema().conform(&R::encode(&s))))
}

fn import_resource<R: ManagedResource>(id: &str) -> Result<ObjectValue> {
    let state = R::import(id)?;
    Ok(R::schema().conform(&R::encode(&state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_config(url: &str) -> ObjectValue {
        ObjectValue::new()
            .with("backend_url", AttrValue::known(url))
            .with("token", AttrValue::known("secret"))
    }

    #[test]
    fn test_provider_schema() {
        let schema = GoliatProvider::provider_schema();
        assert!(schema.attribute("backend_url").unwrap().required);
        let token = schema.attribute("token").unwrap();
        assert!(token.required && token.sensitive);
    }

    #[test]
    fn test_resource_schemas_registered() {
        let names: Vec<&str> = GoliatProvider::resource_schemas()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["goliatdashboard_organization", "goliatdashboard_project"]
        );
    }

    #[test]
    fn test_validate_config_bad_url() {
        let provider = GoliatProvider::new();
        let errors = provider.validate_config(&provider_config("not a url"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute(), Some("backend_url"));
    }

    #[test]
    fn test_validate_config_unknown_passes() {
        let provider = GoliatProvider::new();
        let config = ObjectValue::new()
            .with("backend_url", AttrValue::Unknown)
            .with("token", AttrValue::Unknown);
        assert!(provider.validate_config(&config).is_empty());
    }

    #[test]
    fn test_configure_requires_known_values() {
        let provider = GoliatProvider::new();
        let config = ObjectValue::new()
            .with("backend_url", AttrValue::known("https://goliat-dashboard.com"))
            .with("token", AttrValue::Unknown);
        let err = provider.configure(&config).unwrap_err();
        assert_eq!(err.attribute(), Some("token"));
    }

    #[tokio::test]
    async fn test_apply_before_configure() {
        let provider = GoliatProvider::new();
        let result = provider
            .apply("goliatdashboard_organization", None, Some(ObjectValue::new()))
            .await;
        assert!(matches!(result, Err(ProviderError::NotConfigured)));
    }

    #[test]
    fn test_validate_resource_empty_name() {
        let provider = GoliatProvider::new();
        let config = ObjectValue::new()
            .with("name", AttrValue::known(""))
            .with("type", AttrValue::known("providerOrganizations"));
        let err = provider
            .validate_resource("goliatdashboard_organization", &config)
            .unwrap_err();
        assert_eq!(err.attribute(), Some("name"));
    }

    #[test]
    fn test_upgrade_state_conforms() {
        let provider = GoliatProvider::new();
        let stored = ObjectValue::new()
            .with("id", AttrValue::known("prj-1"))
            .with("organization", AttrValue::known("org"))
            .with("name", AttrValue::known("p"))
            .with("legacy", AttrValue::known("x"));
        let upgraded = provider
            .upgrade_state("goliatdashboard_project", &stored)
            .unwrap();
        assert!(upgraded.get("legacy").is_null());
        assert!(upgraded.get("description").is_null());
        assert_eq!(upgraded.iter().count(), 4);
    }

    #[test]
    fn test_import_unknown_type() {
        let provider = GoliatProvider::new();
        assert!(matches!(
            provider.import("example_resource", "x"),
            Err(ProviderError::UnknownResource(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_delete_organization() {
        let mock_server = MockServer::start().await;
        let provider = GoliatProvider::new();
        provider.configure(&provider_config(&mock_server.uri())).unwrap();

        Mock::given(method("DELETE"))
            .and(path("/api/public/organizations"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let prior = ObjectValue::new()
            .with("id", AttrValue::known("acme"))
            .with("name", AttrValue::known("Acme"))
            .with("type", AttrValue::known("providerOrganizations"));
        let new_state = provider
            .apply("goliatdashboard_organization", Some(prior), None)
            .await
            .unwrap();
        assert!(new_state.is_none());
    }

    #[tokio::test]
    async fn test_planned_organization_create_applies() {
        let mock_server = MockServer::start().await;
        let provider = GoliatProvider::new();
        provider.configure(&provider_config(&mock_server.uri())).unwrap();

        Mock::given(method("PUT"))
            .and(path("/api/public/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let proposed = ObjectValue::new()
            .with("name", AttrValue::known("Acme"))
            .with("type", AttrValue::known("providerOrganizations"));
        let change = provider
            .plan("goliatdashboard_organization", None, Some(proposed))
            .unwrap();
        assert!(change.planned_state.as_ref().unwrap().get("id").is_unknown());

        let new_state = provider
            .apply("goliatdashboard_organization", None, change.planned_state)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(new_state.get("id").as_str(), Some("acme"));
        assert!(!new_state.has_unknowns());
    }

    #[tokio::test]
    async fn test_planned_project_create_applies() {
        let mock_server = MockServer::start().await;
        let provider = GoliatProvider::new();
        provider.configure(&provider_config(&mock_server.uri())).unwrap();

        Mock::given(method("PUT"))
            .and(path("/api/public/provider/projects"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"project": {"id": "prj-1"}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/public/provider/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Projects": [{"id": "prj-1", "organization": "org", "name": "p"}]
            })))
            .mount(&mock_server)
            .await;

        let proposed = ObjectValue::new()
            .with("organization", AttrValue::known("org"))
            .with("name", AttrValue::known("p"));
        let change = provider
            .plan("goliatdashboard_project", None, Some(proposed))
            .unwrap();

        let new_state = provider
            .apply("goliatdashboard_project", None, change.planned_state)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(new_state.get("id").as_str(), Some("prj-1"));
        assert!(new_state.get("description").is_null());
    }

    #[tokio::test]
    async fn test_read_null_state_stays_null() {
        let provider = GoliatProvider::new();
        let result = provider.read("goliatdashboard_project", None).await.unwrap();
        assert!(result.is_none());
    }
}
