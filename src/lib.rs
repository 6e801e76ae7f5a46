//! Goliat Dashboard Terraform provider
//!
//! Manages Goliat Dashboard organizations and projects through the
//! Terraform plugin protocol (version 6).
//!
//! # Resources
//!
//! - `goliatdashboard_organization`
//! - `goliatdashboard_project`
//!
//! # Example
//!
//! ```hcl
//! provider "goliatdashboard" {
//!   backend_url = "https://goliat-dashboard.com"
//!   token       = var.goliat_token
//! }
//!
//! resource "goliatdashboard_project" "example" {
//!   organization = "provider_organization"
//!   name         = "Test Project"
//!   description  = "Initial description"
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod plugin;
pub mod provider;

pub use cli::Cli;
pub use dashboard::{DashboardClient, Organization, Project};
pub use error::{ProviderError, Result};
pub use plugin::{serve, PluginService, ServeOptions};
pub use provider::{GoliatProvider, ResourceType};
