//! Goliat Dashboard API client module
//!
//! Typed access to the public dashboard endpoints used by the provider
//! resources.

mod client;
pub mod organizations;
pub mod projects;
pub mod traits;

pub use client::{normalize_base_url, DashboardClient};
pub use organizations::{Organization, OrganizationsResponse};
pub use projects::{Project, ProjectRequest, ProjectsResponse};
pub use traits::{DashboardResource, ListResponse};
