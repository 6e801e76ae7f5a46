//! `goliatdashboard_project` resource

use log::{debug, info};

use crate::config::provider;
use crate::dashboard::{DashboardClient, Project, ProjectRequest};
use crate::error::{ProviderError, Result};
use crate::provider::resource::ManagedResource;
use crate::provider::schema::{Attribute, Schema};
use crate::provider::value::{AttrValue, ObjectValue};

/// Project resource handler
pub struct ProjectResource;

/// Typed project state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectState {
    pub id: Option<String>,
    pub organization: String,
    pub name: String,
    pub description: Option<String>,
}

impl ProjectState {
    fn request(&self, id: Option<String>) -> ProjectRequest {
        ProjectRequest {
            id,
            organization: self.organization.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    /// Merge a remote project into this state
    ///
    /// An empty remote description keeps a null description null so an unset
    /// optional attribute does not show up as drift.
    fn refreshed(&self, remote: Project) -> ProjectState {
        let description = match remote.description {
            Some(d) if !d.is_empty() => Some(d),
            _ if self.description.is_none() => None,
            _ => Some(String::new()),
        };

        ProjectState {
            id: Some(remote.id),
            organization: if remote.organization.is_empty() {
                self.organization.clone()
            } else {
                remote.organization
            },
            name: if remote.name.is_empty() {
                self.name.clone()
            } else {
                remote.name
            },
            description,
        }
    }
}

/// Confirm a written project is listed
///
/// The new state is the planned one plus the assigned id; Terraform rejects
/// an apply result whose configured values differ from the plan.
async fn read_back(client: &DashboardClient, written: ProjectState) -> Result<ProjectState> {
    let id = written.id.as_deref().unwrap_or_default();
    match client.get_project(id).await? {
        Some(_) => Ok(written),
        None => Err(ProviderError::Resource(format!(
            "project '{}' was saved but is not listed by the dashboard",
            id
        ))),
    }
}

impl ManagedResource for ProjectResource {
    const TYPE_NAME: &'static str = provider::PROJECT_TYPE;

    type State = ProjectState;

    fn schema() -> Schema {
        Schema::new(
            "A project inside a Goliat Dashboard organization.",
            vec![
                Attribute::computed("id", "Project identifier assigned by the dashboard."),
                Attribute::required("organization", "Organization the project belongs to."),
                Attribute::required("name", "Project name."),
                Attribute::optional("description", "Free-form project description."),
            ],
        )
    }

    fn decode(value: &ObjectValue) -> Result<ProjectState> {
        Ok(ProjectState {
            id: value.computed_string("id"),
            organization: value.required_string("organization")?,
            name: value.required_string("name")?,
            description: value.string("description")?,
        })
    }

    fn encode(state: &ProjectState) -> ObjectValue {
        ObjectValue::new()
            .with("id", AttrValue::from_option(state.id.clone()))
            .with("organization", AttrValue::known(state.organization.clone()))
            .with("name", AttrValue::known(state.name.clone()))
            .with(
                "description",
                AttrValue::from_option(state.description.clone()),
            )
    }

    async fn create(client: &DashboardClient, planned: ProjectState) -> Result<ProjectState> {
        let id = client.put_project(&planned.request(None)).await?;
        info!(
            "Created project '{}' in organization '{}' with id '{}'",
            planned.name, planned.organization, id
        );

        read_back(
            client,
            ProjectState {
                id: Some(id),
                ..planned
            },
        )
        .await
    }

    async fn read(client: &DashboardClient, current: ProjectState) -> Result<Option<ProjectState>> {
        let Some(id) = current.id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        match client.get_project(id).await? {
            Some(remote) => Ok(Some(current.refreshed(remote))),
            None => {
                debug!("Project '{}' no longer exists", id);
                Ok(None)
            }
        }
    }

    async fn update(
        client: &DashboardClient,
        prior: ProjectState,
        planned: ProjectState,
    ) -> Result<ProjectState> {
        let id = prior
            .id
            .clone()
            .ok_or_else(|| ProviderError::value_attr("id", "project id is not set"))?;

        let id = client.put_project(&planned.request(Some(id))).await?;
        info!("Updated project '{}'", id);

        read_back(
            client,
            ProjectState {
                id: Some(id),
                ..planned
            },
        )
        .await
    }

    async fn delete(client: &DashboardClient, current: ProjectState) -> Result<()> {
        let id = current.id.as_deref().unwrap_or_default();
        client.delete_project(id, &current.organization).await?;
        info!("Deleted project '{}'", id);
        Ok(())
    }

    /// Accepts `organization/project_id`; a bare id is used for both fields
    fn import(id: &str) -> Result<ProjectState> {
        let (organization, project_id) = match id.split_once('/') {
            Some((org, prj)) if !org.is_empty() && !prj.is_empty() => (org, prj),
            Some(_) => {
                return Err(ProviderError::Resource(format!(
                    "invalid import id '{}', expected organization/project_id",
                    id
                )))
            }
            None if id.is_empty() => {
                return Err(ProviderError::Resource(
                    "import id must not be empty".to_string(),
                ))
            }
            None => (id, id),
        };

        Ok(ProjectState {
            id: Some(project_id.to_string()),
            organization: organization.to_string(),
            name: String::new(),
            description: None,
        })
    }
}
