//! Organization API operations

use log::debug;

use crate::config::api;
use crate::dashboard::DashboardClient;
use crate::error::{ProviderError, Result};

use super::models::{Organization, OrganizationsResponse, UpsertedOrganization};

impl DashboardClient {
    /// Create (or overwrite) an organization
    ///
    /// Returns the id the backend assigned when its response names one.
    pub async fn put_organization(&self, org: &Organization) -> Result<Option<String>> {
        let url = self.url(api::ORGANIZATIONS);
        debug!("Creating organization '{}' at: {}", org.name, url);

        let response = self.put(&url).json(org).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        debug!("Response from backend: {}", body);

        if status != 200 {
            return Err(ProviderError::Api {
                status,
                message: format!("Failed to create organization '{}': {}", org.name, body),
            });
        }

        let assigned = serde_json::from_str::<UpsertedOrganization>(&body)
            .ok()
            .and_then(|resp| resp.assigned_id().map(str::to_string));
        Ok(assigned)
    }

    /// List all provider organizations
    pub async fn get_organizations(&self) -> Result<Vec<Organization>> {
        self.fetch_list::<Organization, OrganizationsResponse>(api::ORGANIZATIONS, "organizations")
            .await
    }

    /// Look up a single organization by id
    pub async fn get_organization(&self, id: &str) -> Result<Option<Organization>> {
        self.find_in_list::<Organization, OrganizationsResponse>(
            api::ORGANIZATIONS,
            id,
            "organizations",
        )
        .await
    }

    /// Delete an organization
    pub async fn delete_organization(&self, id: &str, name: &str) -> Result<()> {
        let url = self.url(api::ORGANIZATIONS);
        debug!("Deleting organization '{}' at: {}", id, url);

        let body = serde_json::json!({
            "id": id,
            "name": name,
        });

        let response = self.delete(&url).json(&body).send().await?;

        match response.status().as_u16() {
            200 => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::Api {
                    status,
                    message: format!("Failed to delete organization '{}': {}", id, body),
                })
            }
        }
    }
}
