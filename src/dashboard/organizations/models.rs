//! Organization data models

use serde::{Deserialize, Serialize};

use crate::dashboard::traits::{skip_malformed, DashboardResource, ListResponse};

/// Organization as sent to and listed by the dashboard API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub org_type: String,
}

/// Response wrapper for the organizations list
#[derive(Deserialize, Debug, Default)]
pub struct OrganizationsResponse {
    #[serde(
        rename = "ProviderOrganizations",
        default,
        deserialize_with = "skip_malformed"
    )]
    pub provider_organizations: Vec<Organization>,
}

/// Body returned by the organization PUT endpoint
///
/// The backend is not consistent about the shape, so every field is optional
/// and the id may sit at the top level or under `organization`.
#[derive(Deserialize, Debug, Default)]
pub struct UpsertedOrganization {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
}

/// Nested organization reference in a PUT response
#[derive(Deserialize, Debug, Default)]
pub struct OrganizationRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl UpsertedOrganization {
    /// Id assigned by the backend, if the response carries one
    pub fn assigned_id(&self) -> Option<&str> {
        self.organization
            .as_ref()
            .and_then(|o| o.id.as_deref())
            .or(self.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

impl Organization {
    /// Derive an organization id from its display name
    ///
    /// Lower-cases the name and collapses every run of non-alphanumeric
    /// characters into a single `_`, so "New Provider Organization" becomes
    /// `new_provider_organization`. The backend's own abbreviations (such as
    /// `new_provider_org`) are not reproduced; when the PUT response carries
    /// an id that one wins.
    pub fn id_from_name(name: &str) -> String {
        let mut id = String::with_capacity(name.len());
        let mut pending_sep = false;

        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_sep && !id.is_empty() {
                    id.push('_');
                }
                pending_sep = false;
                id.extend(c.to_lowercase());
            } else {
                pending_sep = true;
            }
        }

        id
    }
}

impl DashboardResource for Organization {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ListResponse<Organization> for OrganizationsResponse {
    fn into_items(self) -> Vec<Organization> {
        self.provider_organizations
    }
}
