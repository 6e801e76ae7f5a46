//! Project API operations

use log::debug;

use crate::config::api;
use crate::dashboard::traits::ListResponse;
use crate::dashboard::DashboardClient;
use crate::error::{ProviderError, Result};

use super::models::{Project, ProjectRequest, ProjectsResponse, UpsertedProject};

impl DashboardClient {
    /// Create or update a project, returning its id
    ///
    /// The same PUT serves both: a request without `id` creates.
    pub async fn put_project(&self, request: &ProjectRequest) -> Result<String> {
        let url = self.url(api::PROJECTS);
        debug!(
            "Upserting project '{}' in organization '{}' at: {}",
            request.name, request.organization, url
        );

        let response = self.put(&url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        debug!("Response from backend: {}", body);

        if status != 200 && status != 201 {
            return Err(ProviderError::Api {
                status,
                message: format!("Failed to save project '{}': {}", request.name, body),
            });
        }

        let upserted: UpsertedProject = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Json(format!("Failed to parse project response: {}", e))
        })?;

        match upserted.project_id() {
            Some(id) => Ok(id.to_string()),
            None => match &request.id {
                // Updates may answer without echoing the project
                Some(id) => Ok(id.clone()),
                None => Err(ProviderError::Resource(format!(
                    "project ID not found in response: {}",
                    body
                ))),
            },
        }
    }

    /// List all projects
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let url = self.url(api::PROJECTS);
        debug!("Fetching projects from: {}", url);

        let response = self.get(&url).send().await?;

        match response.status().as_u16() {
            200 => {
                let body = response.text().await?;
                let resp: ProjectsResponse = serde_json::from_str(&body).map_err(|e| {
                    ProviderError::Json(format!("Failed to parse projects: {}", e))
                })?;
                Ok(resp.into_items())
            }
            status => Err(ProviderError::Api {
                status,
                message: "Failed to fetch projects".to_string(),
            }),
        }
    }

    /// Look up a single project by id
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let projects = self.get_projects().await?;
        Ok(projects.into_iter().find(|p| p.id == id))
    }

    /// Delete a project
    pub async fn delete_project(&self, id: &str, organization: &str) -> Result<()> {
        if id.is_empty() {
            return Err(ProviderError::Resource("id is not set".to_string()));
        }

        let url = self.url(api::PROJECTS);
        debug!("Deleting project '{}' at: {}", id, url);

        let body = serde_json::json!({
            "id": id,
            "organization": organization,
        });

        let response = self.delete(&url).json(&body).send().await?;

        match response.status().as_u16() {
            200 => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::Api {
                    status,
                    message: format!("Failed to delete project '{}': {}", id, body),
                })
            }
        }
    }
}
