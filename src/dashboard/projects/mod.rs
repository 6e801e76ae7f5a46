//! Project module

mod api;
mod models;

pub use models::{Project, ProjectRequest, ProjectsResponse, UpsertedProject};
