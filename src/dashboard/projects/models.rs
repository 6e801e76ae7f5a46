//! Project data models

use serde::{Deserialize, Serialize};

use crate::dashboard::traits::{skip_malformed, DashboardResource, ListResponse};

/// Project as listed by the dashboard API
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Project {
    /// Get the project description
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Body of the project PUT request
///
/// `id` is omitted on create and carried on update.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub organization: String,
    pub name: String,
    pub description: String,
}

/// Response wrapper for the projects list
#[derive(Deserialize, Debug, Default)]
pub struct ProjectsResponse {
    #[serde(rename = "Projects", deserialize_with = "skip_malformed")]
    pub projects: Vec<Project>,
}

/// Body returned by the project PUT endpoint
#[derive(Deserialize, Debug, Default)]
pub struct UpsertedProject {
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

/// Nested project reference in a PUT response
#[derive(Deserialize, Debug, Default)]
pub struct ProjectRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl UpsertedProject {
    /// Id assigned by the backend
    pub fn project_id(&self) -> Option<&str> {
        self.project
            .as_ref()
            .and_then(|p| p.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

impl DashboardResource for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ListResponse<Project> for ProjectsResponse {
    fn into_items(self) -> Vec<Project> {
        self.projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserialization() {
        let json = r#"{
            "id": "prj-abc123",
            "organization": "provider_organization",
            "name": "Test Project",
            "description": "Initial description"
        }"#;

        let prj: Project = serde_json::from_str(json).unwrap();
        assert_eq!(prj.id, "prj-abc123");
        assert_eq!(prj.name(), "Test Project");
        assert_eq!(prj.description(), "Initial description");
    }

    #[test]
    fn test_project_deserialization_null_description() {
        let json = r#"{"id": "prj-1", "organization": "org", "name": "p", "description": null}"#;
        let prj: Project = serde_json::from_str(json).unwrap();
        assert_eq!(prj.description(), "");
    }

    #[test]
    fn test_projects_response_deserialization() {
        let json = r#"{
            "Projects": [
                {"id": "prj-1", "organization": "org", "name": "project-1"},
                {"id": "prj-2", "organization": "org", "name": "project-2"}
            ]
        }"#;

        let resp: ProjectsResponse = serde_json::from_str(json).unwrap();
        let projects = resp.into_items();
        assert_eq!(projects.len(), 2);
        assert!(projects[1].has_id("prj-2"));
    }

    #[test]
    fn test_projects_response_missing_key_is_error() {
        let json = r#"{"projects": [{"id": "prj-1", "organization": "org", "name": "p"}]}"#;
        assert!(serde_json::from_str::<ProjectsResponse>(json).is_err());
    }

    #[test]
    fn test_projects_response_skips_malformed_entries() {
        let json = r#"{
            "Projects": [
                {"id": 7, "organization": "org", "name": "numeric"},
                {"id": "prj-1", "organization": "org", "name": "project-1"}
            ]
        }"#;
        let projects = serde_json::from_str::<ProjectsResponse>(json)
            .unwrap()
            .into_items();
        assert_eq!(projects.len(), 1);
        assert!(projects[0].has_id("prj-1"));
    }

    #[test]
    fn test_request_omits_missing_id() {
        let req = ProjectRequest {
            id: None,
            organization: "org".to_string(),
            name: "p".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["description"], "");
    }

    #[test]
    fn test_upserted_project_id() {
        let resp: UpsertedProject =
            serde_json::from_str(r#"{"project": {"id": "prj-9", "name": "p"}}"#).unwrap();
        assert_eq!(resp.project_id(), Some("prj-9"));

        let resp: UpsertedProject = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(resp.project_id().is_none());
    }
}
